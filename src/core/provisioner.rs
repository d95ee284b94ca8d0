use crate::config::{JobConfig, ProvisionPolicy};
use crate::domain::ports::ModelStore;
use crate::utils::error::{EtlError, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tar::Archive;

/// Directory the model archive unpacks to, relative to scratch space.
pub const MODEL_DIR_NAME: &str = "model";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Downloaded,
    Reused,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedModel {
    pub model_id: String,
    pub model_dir: PathBuf,
    pub outcome: ProvisionOutcome,
}

/// Materializes `models/<model>.tar.gz` from object storage into scratch space.
pub struct ModelProvisioner<S: ModelStore> {
    store: S,
    model_id: String,
    scratch_dir: PathBuf,
    policy: ProvisionPolicy,
}

impl<S: ModelStore> ModelProvisioner<S> {
    pub fn new(store: S, config: &JobConfig) -> Self {
        Self {
            store,
            model_id: config.model_id.clone(),
            scratch_dir: config.scratch_dir.clone(),
            policy: config.provision_policy,
        }
    }

    pub fn object_key(&self) -> String {
        format!("models/{}.tar.gz", self.model_id)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.scratch_dir.join(format!("{}.tar.gz", self.model_id))
    }

    pub fn model_dir(&self) -> PathBuf {
        self.scratch_dir.join(MODEL_DIR_NAME)
    }

    // Holds the id of the model last unpacked into `model/`. Written only after a
    // complete unpack, so a crashed extraction is never reused.
    fn marker_path(&self) -> PathBuf {
        self.scratch_dir.join(format!(".{}.provisioned", MODEL_DIR_NAME))
    }

    pub fn is_provisioned(&self) -> bool {
        self.model_dir().is_dir()
            && fs::read_to_string(self.marker_path())
                .map(|id| id == self.model_id)
                .unwrap_or(false)
    }

    pub async fn provision(&self) -> Result<ProvisionedModel> {
        fs::create_dir_all(&self.scratch_dir)?;

        if self.policy == ProvisionPolicy::IfAbsent && self.is_provisioned() {
            tracing::info!(
                "Model {} already present in {}, skipping download",
                self.model_id,
                self.scratch_dir.display()
            );
            return Ok(self.provisioned(ProvisionOutcome::Reused));
        }

        let key = self.object_key();
        tracing::info!("Downloading model {} ({})", self.model_id, key);
        let data = self.store.get_object(&key).await?;

        let archive_path = self.archive_path();
        fs::write(&archive_path, &data)?;
        tracing::debug!(
            "Wrote {} bytes to {}",
            data.len(),
            archive_path.display()
        );

        match fs::remove_file(self.marker_path()) {
            Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }
        // Files from a previous model must not shadow the new archive's layout.
        match fs::remove_dir_all(self.model_dir()) {
            Err(e) if e.kind() != ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }

        tracing::info!("Unpacking {}", archive_path.display());
        unpack_archive(&archive_path, &self.scratch_dir)?;

        if !self.model_dir().is_dir() {
            return Err(EtlError::model(format!(
                "archive {} did not contain a '{}/' directory",
                key, MODEL_DIR_NAME
            )));
        }
        fs::write(self.marker_path(), self.model_id.as_bytes())?;

        tracing::info!("Model unpacked to {}", self.model_dir().display());
        Ok(self.provisioned(ProvisionOutcome::Downloaded))
    }

    fn provisioned(&self, outcome: ProvisionOutcome) -> ProvisionedModel {
        ProvisionedModel {
            model_id: self.model_id.clone(),
            model_dir: self.model_dir(),
            outcome,
        }
    }
}

/// Extracts every entry of a gzip tarball into `dest`.
pub fn unpack_archive(archive_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive_path)?;
    let mut archive = Archive::new(GzDecoder::new(file));
    archive.unpack(dest)?;
    Ok(())
}
