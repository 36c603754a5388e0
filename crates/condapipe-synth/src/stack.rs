//! The pipeline stack definition.
//!
//! Mirrors the deployable unit described by a resource-names mapping: a
//! source-pull stage from GitHub, a containerized build project, a
//! two-stage pipeline connecting them, and a read/write grant on the conda
//! channel bucket.

use condapipe_config::ResourceNames;
use condapipe_core::build::{BuildEnvironment, BuildImage, BuildProject, EnvironmentVariable};
use condapipe_core::pipeline::{Action, Artifact, Pipeline, Stage};
use condapipe_core::secret::{ParameterRef, SecretRef};
use condapipe_core::storage::{BucketPermission, BucketRef, S3_ARN_PREFIX};
use condapipe_core::template::{self, Resource, Template, sanitize_logical_id};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::assembly::CloudAssembly;
use crate::assets::{AssetManifest, ImageAsset};
use crate::SynthResult;

/// Secret holding the GitHub OAuth token, resolved at deploy time.
pub const GITHUB_TOKEN_SECRET: &str = "codepipelines-github-token";
/// Parameter-store entry for the build's SSH private key.
pub const SSH_KEY_PARAMETER: &str = "github_id_rsa";
/// Parameter-store entry for the build's SSH public key.
pub const SSH_PUB_PARAMETER: &str = "github_id_rsa.pub";
/// Build context for the project image, relative to the config file.
pub const IMAGE_CONTEXT_DIR: &str = "..";

/// Logical ID of the policy granting bucket access to the build role.
pub const BUCKET_GRANT_LOGICAL_ID: &str = "CondaChannelBucketGrant";

/// A single deployable unit: source stage, build project, pipeline, and
/// channel bucket binding.
#[derive(Debug, Clone)]
pub struct PipelineStack {
    project: BuildProject,
    image: ImageAsset,
    pipeline: Pipeline,
    bucket: BucketRef,
}

impl PipelineStack {
    /// Assemble the description graph from a mapping.
    ///
    /// Every key is resolved up front, so a missing key fails here before
    /// any construct is produced. Values are not otherwise validated;
    /// malformed ones surface when the deployment tool processes the
    /// description.
    pub fn from_names(names: &ResourceNames) -> SynthResult<Self> {
        let repo_owner = names.get("repo_owner")?;
        let repo_name = names.get("repo_name")?;
        let repo_branch = names.get("repo_branch")?;
        let project_name = names.get("project_name")?;
        let dockerfile_name = names.get("dockerfile_name")?;
        let conda_channel_bucket = names.get("conda_channel_bucket")?;
        let conda_channel_name = names.get("conda_channel_name")?;

        debug!(project = project_name, repo = repo_name, "assembling stack");

        let source_output = Artifact::source_output("GitHub");
        let source_action = Action::GitHubSource {
            action_name: "GitHub".to_string(),
            owner: repo_owner.to_string(),
            repo: repo_name.to_string(),
            branch: repo_branch.to_string(),
            oauth_token: SecretRef::secrets_manager(GITHUB_TOKEN_SECRET),
            output: source_output.clone(),
        };

        let image = ImageAsset::new(IMAGE_CONTEXT_DIR, dockerfile_name);
        let project = BuildProject::new(
            project_name,
            BuildEnvironment::new(BuildImage::FromAsset {
                directory: IMAGE_CONTEXT_DIR.to_string(),
                dockerfile: dockerfile_name.to_string(),
            })
            .privileged(),
        )
        .with_variable(
            "ssh_key",
            EnvironmentVariable::parameter_store(ParameterRef::new(SSH_KEY_PARAMETER)),
        )
        .with_variable(
            "ssh_pub",
            EnvironmentVariable::parameter_store(ParameterRef::new(SSH_PUB_PARAMETER)),
        )
        .with_variable(
            "conda_channel_bucket",
            EnvironmentVariable::plaintext(conda_channel_bucket),
        )
        .with_variable(
            "conda_channel_name",
            EnvironmentVariable::plaintext(conda_channel_name),
        );

        let mut pipeline = Pipeline::new(format!("{project_name}Pipeline"));
        pipeline.add_stage(Stage::new("Source", vec![source_action]));
        pipeline.add_stage(Stage::new(
            "Build",
            vec![Action::CodeBuild {
                action_name: "Build".to_string(),
                project_name: project_name.to_string(),
                input: source_output,
            }],
        ));

        let bucket =
            BucketRef::from_bucket_arn(format!("{S3_ARN_PREFIX}{conda_channel_bucket}"));

        Ok(Self {
            project,
            image,
            pipeline,
            bucket,
        })
    }

    pub fn project(&self) -> &BuildProject {
        &self.project
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn bucket(&self) -> &BucketRef {
        &self.bucket
    }

    pub fn image(&self) -> &ImageAsset {
        &self.image
    }

    /// Render the description graph into a cloud assembly.
    pub fn synth(&self) -> SynthResult<CloudAssembly> {
        let project_id = sanitize_logical_id(&self.project.name);
        let role_id = format!("{project_id}Role");
        let pipeline_id = sanitize_logical_id(&self.pipeline.name);
        let pipeline_role_id = format!("{pipeline_id}Role");
        let artifacts_bucket_id = format!("{pipeline_id}ArtifactsBucket");
        let image_id = format!("{project_id}DockerImage");

        let mut template = Template::new().with_description(format!(
            "CI pipeline for {}: source pull, containerized build, conda channel publish",
            self.project.name
        ));

        template.add_resource(
            &role_id,
            Resource::new(
                "AWS::IAM::Role",
                json!({ "AssumeRolePolicyDocument": assume_role_policy("codebuild.amazonaws.com") }),
            ),
        )?;

        template.add_resource(&project_id, self.render_project(&role_id))?;

        template.add_resource(
            &artifacts_bucket_id,
            Resource::new("AWS::S3::Bucket", json!({})),
        )?;

        template.add_resource(
            &pipeline_role_id,
            Resource::new(
                "AWS::IAM::Role",
                json!({ "AssumeRolePolicyDocument": assume_role_policy("codepipeline.amazonaws.com") }),
            ),
        )?;

        template.add_resource(
            &pipeline_id,
            self.render_pipeline(&project_id, &pipeline_role_id, &artifacts_bucket_id)
                .depends_on(&project_id),
        )?;

        template.add_resource(
            BUCKET_GRANT_LOGICAL_ID,
            self.render_bucket_grant(&role_id),
        )?;

        let mut assets = AssetManifest::default();
        assets.add_image(&image_id, &self.image);

        info!(
            resources = template.len(),
            pipeline = %self.pipeline.name,
            "synthesized stack description"
        );

        Ok(CloudAssembly { template, assets })
    }

    fn render_project(&self, role_id: &str) -> Resource {
        let environment_variables: Vec<Value> = self
            .project
            .environment_variables
            .iter()
            .map(|(name, var)| {
                json!({
                    "Name": name,
                    "Type": var.kind.as_str(),
                    "Value": var.value,
                })
            })
            .collect();

        let image = match &self.project.environment.image {
            BuildImage::FromAsset { .. } => template::sub(&self.image.image_uri()),
            BuildImage::Reference(uri) => Value::String(uri.clone()),
        };

        Resource::new(
            "AWS::CodeBuild::Project",
            json!({
                "Name": self.project.name,
                "ServiceRole": template::get_att(role_id, "Arn"),
                "Source": { "Type": "CODEPIPELINE" },
                "Artifacts": { "Type": "CODEPIPELINE" },
                "Environment": {
                    "Type": "LINUX_CONTAINER",
                    "ComputeType": self.project.environment.compute_type.as_str(),
                    "Image": image,
                    "PrivilegedMode": self.project.environment.privileged,
                    "EnvironmentVariables": environment_variables,
                },
            }),
        )
    }

    fn render_pipeline(
        &self,
        project_id: &str,
        pipeline_role_id: &str,
        artifacts_bucket_id: &str,
    ) -> Resource {
        let stages: Vec<Value> = self
            .pipeline
            .stages
            .iter()
            .map(|stage| {
                let actions: Vec<Value> = stage
                    .actions
                    .iter()
                    .map(|action| render_action(action, project_id))
                    .collect();
                json!({ "Name": stage.name, "Actions": actions })
            })
            .collect();

        Resource::new(
            "AWS::CodePipeline::Pipeline",
            json!({
                "Name": self.pipeline.name,
                "RoleArn": template::get_att(pipeline_role_id, "Arn"),
                "ArtifactStore": {
                    "Type": "S3",
                    "Location": template::reference(artifacts_bucket_id),
                },
                "Stages": stages,
            }),
        )
    }

    fn render_bucket_grant(&self, role_id: &str) -> Resource {
        Resource::new(
            "AWS::IAM::Policy",
            json!({
                "PolicyName": BUCKET_GRANT_LOGICAL_ID,
                "Roles": [template::reference(role_id)],
                "PolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Effect": "Allow",
                        "Action": BucketPermission::ReadWrite.actions(),
                        "Resource": [self.bucket.arn(), self.bucket.objects_arn()],
                    }],
                },
            }),
        )
    }
}

fn render_action(action: &Action, project_id: &str) -> Value {
    match action {
        Action::GitHubSource {
            action_name,
            owner,
            repo,
            branch,
            oauth_token,
            output,
        } => json!({
            "Name": action_name,
            "ActionTypeId": {
                "Category": "Source",
                "Owner": "ThirdParty",
                "Provider": "GitHub",
                "Version": "1",
            },
            "Configuration": {
                "Owner": owner,
                "Repo": repo,
                "Branch": branch,
                "OAuthToken": oauth_token.resolve_expression(),
                "PollForSourceChanges": true,
            },
            "OutputArtifacts": [{ "Name": output.name() }],
            "RunOrder": 1,
        }),
        Action::CodeBuild {
            action_name, input, ..
        } => json!({
            "Name": action_name,
            "ActionTypeId": {
                "Category": "Build",
                "Owner": "AWS",
                "Provider": "CodeBuild",
                "Version": "1",
            },
            "Configuration": { "ProjectName": template::reference(project_id) },
            "InputArtifacts": [{ "Name": input.name() }],
            "RunOrder": 1,
        }),
    }
}

fn assume_role_policy(service: &str) -> Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": service },
            "Action": "sts:AssumeRole",
        }],
    })
}
