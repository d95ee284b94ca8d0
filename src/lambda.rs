#[cfg(feature = "lambda")]
use cocktail_etl::config::lambda::{dynamo_client, load_sdk_config, s3_client};
#[cfg(feature = "lambda")]
use cocktail_etl::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use cocktail_etl::{
    BatchSummary, DynamoCocktailSink, DynamoDescriptionSource, EnrichmentHandler, JobConfig,
    ModelProvisioner, PatternModelLoader, S3ModelStore, StreamEvent,
};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

#[cfg(feature = "lambda")]
type StreamHandler =
    EnrichmentHandler<S3ModelStore, DynamoDescriptionSource, DynamoCocktailSink, PatternModelLoader>;

#[cfg(feature = "lambda")]
async fn function_handler(
    handler: &StreamHandler,
    event: LambdaEvent<StreamEvent>,
) -> Result<BatchSummary, Error> {
    tracing::info!(
        request_id = %event.context.request_id,
        "Starting cocktail enrichment for {} records",
        event.payload.records.len()
    );

    let summary = handler.handle(&event.payload).await.map_err(|e| {
        tracing::error!("Cocktail enrichment failed: {} (Category: {:?})", e, e.category());
        Box::new(e) as Box<dyn std::error::Error + Send + Sync>
    })?;

    tracing::info!("Cocktail enrichment completed successfully");
    Ok(summary)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = JobConfig::from_env()?;
    config.validate()?;

    let sdk_config = load_sdk_config(&config).await;
    let dynamo = dynamo_client(&sdk_config, &config);
    let model_store = S3ModelStore::new(s3_client(&sdk_config), config.dest_bucket.clone());

    let handler: StreamHandler = EnrichmentHandler::new(
        ModelProvisioner::new(model_store, &config),
        DynamoDescriptionSource::new(dynamo.clone(), config.source_table.clone()),
        DynamoCocktailSink::new(dynamo, config.dest_table.clone()),
        PatternModelLoader,
    );
    let handler = &handler;

    run(service_fn(move |event| async move {
        function_handler(handler, event).await
    }))
    .await
}
