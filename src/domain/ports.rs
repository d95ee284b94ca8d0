use crate::domain::model::{Cocktail, DescriptionLookup, Entity};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Object storage holding model archives.
pub trait ModelStore: Send + Sync {
    fn get_object(&self, key: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

#[async_trait]
pub trait DescriptionSource: Send + Sync {
    async fn get_description(&self, id: &str) -> DescriptionLookup;
}

#[async_trait]
pub trait CocktailSink: Send + Sync {
    /// Whole-item upsert of one cocktail.
    async fn put_cocktail(&self, cocktail: &Cocktail) -> Result<()>;
}

/// Named-entity model run over a single sentence.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>>;
}

/// Loads a recognizer from a provisioned model directory.
pub trait ModelLoader: Send + Sync {
    type Model: EntityRecognizer;

    fn load(&self, model_dir: &Path) -> Result<Self::Model>;
}
