use crate::core::extractor::CocktailExtractor;
use crate::core::loader::CocktailLoader;
use crate::core::provisioner::ModelProvisioner;
use crate::domain::event::StreamEvent;
use crate::domain::model::{BatchSummary, DescriptionLookup};
use crate::domain::ports::{CocktailSink, DescriptionSource, ModelLoader, ModelStore};
use crate::utils::error::Result;

/// Reacts to one change-stream batch: provision the model, then
/// fetch, extract and load every inserted or modified description in order.
pub struct EnrichmentHandler<M, D, K, L>
where
    M: ModelStore,
    D: DescriptionSource,
    K: CocktailSink,
    L: ModelLoader,
{
    provisioner: ModelProvisioner<M>,
    descriptions: D,
    loader: CocktailLoader<K>,
    model_loader: L,
}

impl<M, D, K, L> EnrichmentHandler<M, D, K, L>
where
    M: ModelStore,
    D: DescriptionSource,
    K: CocktailSink,
    L: ModelLoader,
{
    pub fn new(provisioner: ModelProvisioner<M>, descriptions: D, sink: K, model_loader: L) -> Self {
        Self {
            provisioner,
            descriptions,
            loader: CocktailLoader::new(sink),
            model_loader,
        }
    }

    pub async fn handle(&self, event: &StreamEvent) -> Result<BatchSummary> {
        tracing::info!("Received batch with {} records", event.records.len());

        let provisioned = self.provisioner.provision().await?;
        tracing::info!("Loading model from {}", provisioned.model_dir.display());
        let model = self.model_loader.load(&provisioned.model_dir)?;
        let extractor = CocktailExtractor::new(&model);

        let mut summary = BatchSummary {
            model: provisioned.model_id.clone(),
            records_seen: event.records.len(),
            ..Default::default()
        };

        for record in &event.records {
            if !record.is_upsert() {
                tracing::debug!("Ignoring {:?} event", record.event_name);
                summary.ignored += 1;
                continue;
            }

            let id = record.key_id()?;
            let description = match self.descriptions.get_description(id).await {
                DescriptionLookup::Found(description) => description,
                DescriptionLookup::NotFound => {
                    tracing::warn!("Description {} not found, skipping", id);
                    summary.skipped += 1;
                    continue;
                }
                DescriptionLookup::Failed(message) => {
                    tracing::error!("Could not fetch description {}: {}", id, message);
                    summary.skipped += 1;
                    continue;
                }
            };

            tracing::info!("Parsing description {}", id);
            let cocktails = extractor.extract(&description.description)?;
            tracing::info!(
                "Description {} yielded {} cocktails: {:?}",
                id,
                cocktails.len(),
                cocktails.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
            );

            summary.cocktails_loaded += self.loader.load(&cocktails).await?;
            summary.processed += 1;
        }

        tracing::info!(
            "Batch done: {} processed, {} skipped, {} ignored, {} cocktails loaded",
            summary.processed,
            summary.skipped,
            summary.ignored,
            summary.cocktails_loaded
        );
        Ok(summary)
    }
}
