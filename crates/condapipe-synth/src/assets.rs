//! Docker image assets.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// A container image built from a local Dockerfile.
///
/// Synthesis only computes a source hash and records the asset in the
/// manifest; building and pushing the image is the external builder's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub directory: String,
    pub dockerfile: String,
    source_hash: String,
}

impl ImageAsset {
    pub fn new(directory: impl Into<String>, dockerfile: impl Into<String>) -> Self {
        let directory = directory.into();
        let dockerfile = dockerfile.into();
        let source_hash = source_hash(&directory, &dockerfile);
        Self {
            directory,
            dockerfile,
            source_hash,
        }
    }

    pub fn source_hash(&self) -> &str {
        &self.source_hash
    }

    /// Registry reference for the built image, with pseudo parameters left
    /// for the provider to substitute.
    pub fn image_uri(&self) -> String {
        format!(
            "${{AWS::AccountId}}.dkr.ecr.${{AWS::Region}}.amazonaws.com/condapipe-assets:{}",
            self.source_hash
        )
    }
}

/// Hash over the build context path, the dockerfile name, and the Dockerfile
/// bytes when the file is readable. Synthesis stays deterministic and
/// offline when it is not.
fn source_hash(directory: &str, dockerfile: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(directory.as_bytes());
    hasher.update([0u8]);
    hasher.update(dockerfile.as_bytes());
    if let Ok(bytes) = std::fs::read(Path::new(directory).join(dockerfile)) {
        hasher.update([0u8]);
        hasher.update(&bytes);
    }
    hex::encode(&hasher.finalize()[..16])
}

/// Manifest of assets the external builder must materialize before the
/// template can be deployed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    pub docker_images: Vec<DockerImageAsset>,
}

/// One Docker image entry in the manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockerImageAsset {
    /// Logical ID of the asset within the stack.
    pub id: String,
    pub directory: String,
    pub dockerfile: String,
    pub source_hash: String,
    pub image_uri: String,
}

impl AssetManifest {
    pub fn add_image(&mut self, id: impl Into<String>, asset: &ImageAsset) {
        self.docker_images.push(DockerImageAsset {
            id: id.into(),
            directory: asset.directory.clone(),
            dockerfile: asset.dockerfile.clone(),
            source_hash: asset.source_hash.clone(),
            image_uri: asset.image_uri(),
        });
    }
}
