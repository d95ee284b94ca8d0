#![allow(dead_code)]

use async_trait::async_trait;
use cocktail_etl::domain::ports::{CocktailSink, DescriptionSource, ModelStore};
use cocktail_etl::{Cocktail, Description, DescriptionLookup, EtlError, JobConfig, ProvisionPolicy, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const MODEL_ID: &str = "cocktail-ner";

pub const PATTERNS: &str = r#"{"label": "COCKTAIL", "pattern": "Margarita"}
{"label": "COCKTAIL", "pattern": "Mojito"}
{"label": "ING", "pattern": [{"LOWER": {"IN": ["tequila", "rum", "mint", "lime"]}}]}
{"label": "QUANTITY", "pattern": [{"TEXT": {"REGEX": "^\\d+(ml|cl|oz)$"}}]}
{"label": "STEP", "pattern": [{"LOWER": {"IN": ["shake", "muddle", "stir"]}}]}
"#;

/// Gzip tarball with the given `(path, contents)` entries.
pub fn tar_gz(entries: &[(&str, &str)]) -> Vec<u8> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, path, contents.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

pub fn model_archive() -> Vec<u8> {
    tar_gz(&[
        ("model/meta.json", r#"{"name": "cocktail_ner", "version": "0.1.0"}"#),
        ("model/entity_ruler/patterns.jsonl", PATTERNS),
    ])
}

pub fn job_config(scratch_dir: &Path, policy: ProvisionPolicy) -> JobConfig {
    JobConfig {
        model_id: MODEL_ID.to_string(),
        scratch_dir: scratch_dir.to_path_buf(),
        source_endpoint: None,
        source_table: "descriptions".to_string(),
        dest_table: "cocktails".to_string(),
        dest_bucket: "cocktail-models".to_string(),
        region: None,
        provision_policy: policy,
    }
}

#[derive(Clone, Default)]
pub struct MemoryModelStore {
    objects: Arc<std::sync::Mutex<HashMap<String, Vec<u8>>>>,
    fetches: Arc<AtomicUsize>,
}

impl MemoryModelStore {
    pub fn with_object(key: &str, data: Vec<u8>) -> Self {
        let store = Self::default();
        store.objects.lock().unwrap().insert(key.to_string(), data);
        store
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl ModelStore for MemoryModelStore {
    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| EtlError::ObjectStoreError {
                message: format!("{} does not exist", key),
            })
    }
}

#[derive(Clone, Default)]
pub struct MemoryDescriptions {
    items: Arc<HashMap<String, String>>,
    failing: Arc<Vec<String>>,
}

impl MemoryDescriptions {
    pub fn new(items: &[(&str, &str)]) -> Self {
        Self {
            items: Arc::new(
                items
                    .iter()
                    .map(|(id, text)| (id.to_string(), text.to_string()))
                    .collect(),
            ),
            failing: Arc::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, id: &str) -> Self {
        self.failing = Arc::new(vec![id.to_string()]);
        self
    }
}

#[async_trait]
impl DescriptionSource for MemoryDescriptions {
    async fn get_description(&self, id: &str) -> DescriptionLookup {
        if self.failing.iter().any(|f| f == id) {
            return DescriptionLookup::Failed("Requested resource not found".to_string());
        }
        match self.items.get(id) {
            Some(text) => DescriptionLookup::Found(Description {
                id: id.to_string(),
                description: text.clone(),
            }),
            None => DescriptionLookup::NotFound,
        }
    }
}

#[derive(Clone, Default)]
pub struct MemorySink {
    pub written: Arc<Mutex<Vec<Cocktail>>>,
}

#[async_trait]
impl CocktailSink for MemorySink {
    async fn put_cocktail(&self, cocktail: &Cocktail) -> Result<()> {
        self.written.lock().await.push(cocktail.clone());
        Ok(())
    }
}
