use crate::domain::ports::ModelStore;
use crate::utils::error::{EtlError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// A directory laid out like the model bucket (`<root>/models/<model>.tar.gz`).
#[derive(Debug, Clone)]
pub struct LocalModelStore {
    root: PathBuf,
}

impl LocalModelStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ModelStore for LocalModelStore {
    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let full_path = self.root.join(key);
        tracing::debug!("Reading model object from {}", full_path.display());

        fs::read(&full_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => EtlError::ObjectStoreError {
                message: format!("{} does not exist", full_path.display()),
            },
            _ => EtlError::IoError(e),
        })
    }
}
