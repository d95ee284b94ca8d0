#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_SCRATCH_DIR: &str = "/tmp";

/// Whether the model archive is fetched again when scratch space already holds it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProvisionPolicy {
    #[default]
    Always,
    IfAbsent,
}

impl FromStr for ProvisionPolicy {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(ProvisionPolicy::Always),
            "if-absent" | "if_absent" => Ok(ProvisionPolicy::IfAbsent),
            other => Err(EtlError::InvalidConfigValueError {
                field: "provision_policy".to_string(),
                value: other.to_string(),
                reason: "Expected 'always' or 'if-absent'".to_string(),
            }),
        }
    }
}

/// Settings shared by every component of the job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    pub model_id: String,
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    #[serde(default)]
    pub source_endpoint: Option<String>,
    pub source_table: String,
    pub dest_table: String,
    pub dest_bucket: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub provision_policy: ProvisionPolicy,
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SCRATCH_DIR)
}

impl JobConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            optional(key).ok_or_else(|| EtlError::MissingConfigError {
                field: key.to_string(),
            })
        };

        Ok(Self {
            model_id: required("MODEL")?,
            scratch_dir: optional("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_scratch_dir),
            source_endpoint: optional("DYNAMO_URL"),
            source_table: required("DESCRIPTIONS_DYNAMO_TABLE")?,
            dest_table: required("COCKTAILS_DYNAMO_TABLE")?,
            dest_bucket: required("S3_BUCKET")?,
            region: optional("AWS_REGION"),
            provision_policy: optional("MODEL_CACHE")
                .map(|v| v.parse::<ProvisionPolicy>())
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("model_id", &self.model_id)?;
        if self.model_id.contains('/') {
            return Err(EtlError::InvalidConfigValueError {
                field: "model_id".to_string(),
                value: self.model_id.clone(),
                reason: "Model id cannot contain '/'".to_string(),
            });
        }

        validation::validate_path("scratch_dir", &self.scratch_dir.to_string_lossy())?;
        if let Some(endpoint) = &self.source_endpoint {
            validation::validate_url("source_endpoint", endpoint)?;
        }
        validation::validate_table_name("source_table", &self.source_table)?;
        validation::validate_table_name("dest_table", &self.dest_table)?;
        validation::validate_s3_bucket_name("dest_bucket", &self.dest_bucket)?;

        tracing::debug!("Job configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base_vars() -> HashMap<String, String> {
        vars(&[
            ("MODEL", "cocktail-ner"),
            ("S3_BUCKET", "cocktail-models"),
            ("DESCRIPTIONS_DYNAMO_TABLE", "descriptions"),
            ("COCKTAILS_DYNAMO_TABLE", "cocktails"),
        ])
    }

    #[test]
    fn test_from_lookup_defaults() {
        let env = base_vars();
        let config = JobConfig::from_lookup(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.model_id, "cocktail-ner");
        assert_eq!(config.scratch_dir, PathBuf::from("/tmp"));
        assert_eq!(config.source_endpoint, None);
        assert_eq!(config.provision_policy, ProvisionPolicy::Always);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let mut env = base_vars();
        env.extend(vars(&[
            ("DYNAMO_URL", "http://localhost:8000"),
            ("SCRATCH_DIR", "/var/scratch"),
            ("MODEL_CACHE", "if-absent"),
            ("AWS_REGION", "eu-west-1"),
        ]));
        let config = JobConfig::from_lookup(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.source_endpoint.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.scratch_dir, PathBuf::from("/var/scratch"));
        assert_eq!(config.provision_policy, ProvisionPolicy::IfAbsent);
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_missing_required_variable() {
        let mut env = base_vars();
        env.remove("S3_BUCKET");
        let err = JobConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, EtlError::MissingConfigError { field } if field == "S3_BUCKET"));

        let mut env = base_vars();
        env.insert("MODEL".to_string(), "  ".to_string());
        assert!(JobConfig::from_lookup(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn test_invalid_policy() {
        let mut env = base_vars();
        env.insert("MODEL_CACHE".to_string(), "sometimes".to_string());
        assert!(JobConfig::from_lookup(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let env = base_vars();
        let config = JobConfig::from_lookup(|k| env.get(k).cloned()).unwrap();

        let mut bad = config.clone();
        bad.dest_bucket = "Cocktail_Models".to_string();
        assert!(bad.validate().is_err());

        let mut bad = config.clone();
        bad.source_table = "x".to_string();
        assert!(bad.validate().is_err());

        let mut bad = config.clone();
        bad.model_id = "../etc".to_string();
        assert!(bad.validate().is_err());

        let mut bad = config;
        bad.source_endpoint = Some("not a url".to_string());
        assert!(bad.validate().is_err());
    }
}
