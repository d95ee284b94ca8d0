pub mod extractor;
pub mod handler;
pub mod loader;
pub mod provisioner;
