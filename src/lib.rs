pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::local::LocalModelStore;
pub use adapters::pattern_model::{PatternModel, PatternModelLoader};
#[cfg(feature = "lambda")]
pub use adapters::{
    dynamo::{DynamoCocktailSink, DynamoDescriptionSource},
    s3::S3ModelStore,
};
pub use config::{JobConfig, ProvisionPolicy};
pub use core::{
    extractor::CocktailExtractor,
    handler::EnrichmentHandler,
    loader::CocktailLoader,
    provisioner::{ModelProvisioner, ProvisionOutcome, ProvisionedModel},
};
pub use domain::event::{EventName, StreamEvent, StreamRecord};
pub use domain::model::{
    BatchSummary, Cocktail, Description, DescriptionLookup, Entity, EntityLabel, Ingredient,
};
pub use utils::error::{EtlError, Result};
