use crate::domain::ports::ModelStore;
use crate::utils::error::{EtlError, Result};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::Client as S3Client;

/// Model bucket on S3.
#[derive(Debug, Clone)]
pub struct S3ModelStore {
    client: S3Client,
    bucket: String,
}

impl S3ModelStore {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

impl ModelStore for S3ModelStore {
    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        tracing::info!("Downloading s3://{}/{}", self.bucket, key);

        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let message = match e.as_service_error() {
                    Some(GetObjectError::NoSuchKey(_)) => {
                        format!("s3://{}/{} does not exist", self.bucket, key)
                    }
                    _ => format!(
                        "Failed to read s3://{}/{}: {}",
                        self.bucket,
                        key,
                        DisplayErrorContext(&e)
                    ),
                };
                EtlError::ObjectStoreError { message }
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| EtlError::ObjectStoreError {
                message: format!("Failed to collect S3 data: {}", e),
            })?;

        Ok(data.into_bytes().to_vec())
    }
}
