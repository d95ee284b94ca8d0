// Adapters layer: concrete implementations of the domain ports.

#[cfg(feature = "lambda")]
pub mod dynamo;
pub mod local;
pub mod pattern_model;
#[cfg(feature = "lambda")]
pub mod s3;
