//! Bucket references and permission grants.

use serde::{Deserialize, Serialize};

/// ARN prefix for buckets.
pub const S3_ARN_PREFIX: &str = "arn:aws:s3:::";

/// Non-owning reference to a bucket that exists outside the stack's
/// lifecycle. The stack only attaches permission grants to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRef {
    bucket_name: String,
    arn: String,
}

impl BucketRef {
    pub fn from_bucket_name(name: impl Into<String>) -> Self {
        let bucket_name = name.into();
        let arn = format!("{S3_ARN_PREFIX}{bucket_name}");
        Self { bucket_name, arn }
    }

    /// A malformed ARN is carried through untouched; the deployment tool
    /// reports it when the description is submitted.
    pub fn from_bucket_arn(arn: impl Into<String>) -> Self {
        let arn = arn.into();
        let bucket_name = arn
            .rsplit(':')
            .next()
            .unwrap_or_default()
            .to_string();
        Self { bucket_name, arn }
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn arn(&self) -> &str {
        &self.arn
    }

    /// ARN matching every object in the bucket.
    pub fn objects_arn(&self) -> String {
        format!("{}/*", self.arn)
    }
}

/// Access level granted on a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketPermission {
    Read,
    Write,
    ReadWrite,
}

const READ_ACTIONS: &[&str] = &["s3:GetObject*", "s3:GetBucket*", "s3:List*"];
const WRITE_ACTIONS: &[&str] = &["s3:DeleteObject*", "s3:PutObject*", "s3:Abort*"];

impl BucketPermission {
    /// IAM actions this permission expands to.
    pub fn actions(&self) -> Vec<&'static str> {
        match self {
            BucketPermission::Read => READ_ACTIONS.to_vec(),
            BucketPermission::Write => WRITE_ACTIONS.to_vec(),
            BucketPermission::ReadWrite => READ_ACTIONS
                .iter()
                .chain(WRITE_ACTIONS.iter())
                .copied()
                .collect(),
        }
    }
}
