//! End-to-end synthesis tests against the emitted template.

use condapipe_config::{ConfigError, ResourceNames};
use condapipe_synth::{CloudAssembly, PipelineStack, SynthError};
use serde_json::Value;

fn example_names() -> ResourceNames {
    ResourceNames::from_pairs([
        ("repo_owner", "acme"),
        ("repo_name", "pkg"),
        ("repo_branch", "main"),
        ("project_name", "Build1"),
        ("dockerfile_name", "Dockerfile"),
        ("conda_channel_bucket", "my-bucket"),
        ("conda_channel_name", "main"),
    ])
}

fn synth_example() -> CloudAssembly {
    PipelineStack::from_names(&example_names())
        .unwrap()
        .synth()
        .unwrap()
}

fn template_value(assembly: &CloudAssembly) -> Value {
    serde_json::to_value(&assembly.template).unwrap()
}

#[test]
fn pipeline_has_source_then_build() {
    let value = template_value(&synth_example());
    let pipeline = &value["Resources"]["Build1Pipeline"];

    assert_eq!(pipeline["Type"], "AWS::CodePipeline::Pipeline");
    assert_eq!(pipeline["Properties"]["Name"], "Build1Pipeline");

    let stages = pipeline["Properties"]["Stages"].as_array().unwrap();
    let names: Vec<&str> = stages
        .iter()
        .map(|s| s["Name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Source", "Build"]);
}

#[test]
fn build_input_matches_source_output() {
    let value = template_value(&synth_example());
    let stages = value["Resources"]["Build1Pipeline"]["Properties"]["Stages"]
        .as_array()
        .unwrap();

    let source_output = stages[0]["Actions"][0]["OutputArtifacts"][0]["Name"]
        .as_str()
        .unwrap();
    let build_input = stages[1]["Actions"][0]["InputArtifacts"][0]["Name"]
        .as_str()
        .unwrap();
    assert_eq!(source_output, build_input);
}

#[test]
fn project_is_privileged_with_declared_variables() {
    let value = template_value(&synth_example());
    let project = &value["Resources"]["Build1"];

    assert_eq!(project["Type"], "AWS::CodeBuild::Project");
    assert_eq!(project["Properties"]["Name"], "Build1");
    assert_eq!(project["Properties"]["Environment"]["PrivilegedMode"], true);

    let vars = project["Properties"]["Environment"]["EnvironmentVariables"]
        .as_array()
        .unwrap();
    let find = |name: &str| {
        vars.iter()
            .find(|v| v["Name"] == name)
            .unwrap_or_else(|| panic!("variable {name} not emitted"))
    };

    assert_eq!(find("ssh_key")["Type"], "PARAMETER_STORE");
    assert_eq!(find("ssh_key")["Value"], "github_id_rsa");
    assert_eq!(find("ssh_pub")["Type"], "PARAMETER_STORE");
    assert_eq!(find("ssh_pub")["Value"], "github_id_rsa.pub");
    assert_eq!(find("conda_channel_bucket")["Type"], "PLAINTEXT");
    assert_eq!(find("conda_channel_bucket")["Value"], "my-bucket");
    assert_eq!(find("conda_channel_name")["Type"], "PLAINTEXT");
    assert_eq!(find("conda_channel_name")["Value"], "main");
    assert_eq!(vars.len(), 4);
}

#[test]
fn oauth_token_is_a_deferred_reference() {
    let value = template_value(&synth_example());
    let config = &value["Resources"]["Build1Pipeline"]["Properties"]["Stages"][0]["Actions"][0]
        ["Configuration"];

    assert_eq!(config["Owner"], "acme");
    assert_eq!(config["Repo"], "pkg");
    assert_eq!(config["Branch"], "main");
    assert_eq!(
        config["OAuthToken"],
        "{{resolve:secretsmanager:codepipelines-github-token}}"
    );
}

#[test]
fn bucket_grant_targets_channel_bucket_arn() {
    let value = template_value(&synth_example());
    let grant = &value["Resources"]["CondaChannelBucketGrant"];

    assert_eq!(grant["Type"], "AWS::IAM::Policy");
    let statement = &grant["Properties"]["PolicyDocument"]["Statement"][0];
    let resources = statement["Resource"].as_array().unwrap();
    assert!(resources.contains(&Value::from("arn:aws:s3:::my-bucket")));
    assert!(resources.contains(&Value::from("arn:aws:s3:::my-bucket/*")));

    let actions = statement["Action"].as_array().unwrap();
    assert!(actions.contains(&Value::from("s3:GetObject*")));
    assert!(actions.contains(&Value::from("s3:PutObject*")));
}

#[test]
fn template_declares_one_pipeline_and_one_project() {
    let assembly = synth_example();

    let pipelines: Vec<&str> = assembly
        .template
        .resources_of_type("AWS::CodePipeline::Pipeline")
        .collect();
    assert_eq!(pipelines, vec!["Build1Pipeline"]);

    let projects: Vec<&str> = assembly
        .template
        .resources_of_type("AWS::CodeBuild::Project")
        .collect();
    assert_eq!(projects, vec!["Build1"]);
}

#[test]
fn asset_manifest_lists_the_project_image() {
    let assembly = synth_example();
    assert_eq!(assembly.assets.docker_images.len(), 1);

    let image = &assembly.assets.docker_images[0];
    assert_eq!(image.id, "Build1DockerImage");
    assert_eq!(image.dockerfile, "Dockerfile");
    assert!(!image.source_hash.is_empty());
}

#[test]
fn missing_key_produces_no_partial_graph() {
    for dropped in condapipe_config::REQUIRED_KEYS {
        let full = example_names();
        let names = ResourceNames::from_pairs(
            full.keys()
                .filter(|key| key != dropped)
                .map(|key| (key.to_string(), full.get(key).unwrap().to_string())),
        );

        let err = PipelineStack::from_names(&names).unwrap_err();
        assert!(
            matches!(
                &err,
                SynthError::Config(ConfigError::MissingField(key)) if key == dropped
            ),
            "dropping {dropped} should fail with MissingField, got: {err}"
        );
    }
}
