use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Object storage error: {message}")]
    ObjectStoreError { message: String },

    #[error("Model error: {message}")]
    ModelError { message: String },

    #[error("Key-value store error: {message}")]
    StoreError { message: String },

    #[error("Event error: {message}")]
    EventError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Provisioning,
    Lookup,
    Extraction,
    Load,
    Event,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::TomlError(_) => ErrorCategory::Configuration,
            EtlError::ObjectStoreError { .. } | EtlError::IoError(_) => {
                ErrorCategory::Provisioning
            }
            EtlError::ModelError { .. } | EtlError::SerializationError(_) => {
                ErrorCategory::Extraction
            }
            EtlError::StoreError { .. } => ErrorCategory::Load,
            EtlError::EventError { .. } => ErrorCategory::Event,
        }
    }

    pub(crate) fn model(message: impl Into<String>) -> Self {
        EtlError::ModelError {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
