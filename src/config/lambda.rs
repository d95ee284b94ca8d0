use crate::config::JobConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;

/// Shared AWS configuration; the region from the job config wins over the default chain.
pub async fn load_sdk_config(config: &JobConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    loader.load().await
}

pub fn s3_client(sdk_config: &SdkConfig) -> S3Client {
    S3Client::new(sdk_config)
}

/// Source and destination tables share one endpoint, `DYNAMO_URL` when set.
pub fn dynamo_client(sdk_config: &SdkConfig, config: &JobConfig) -> DynamoClient {
    let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);
    if let Some(endpoint) = &config.source_endpoint {
        tracing::debug!("Using DynamoDB endpoint override: {}", endpoint);
        builder = builder.endpoint_url(endpoint);
    }
    DynamoClient::from_conf(builder.build())
}
