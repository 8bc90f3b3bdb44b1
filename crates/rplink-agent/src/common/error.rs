use thiserror::Error;

use crate::common::error::AgentError::GenericError;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),
    #[error("Provider error: {0}")]
    ProviderError(#[from] rplink::Error),
    #[error("Error: {0}")]
    GenericError(String),
}

impl From<serde_json::error::Error> for AgentError {
    fn from(e: serde_json::error::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

impl From<toml::de::Error> for AgentError {
    fn from(error: toml::de::Error) -> Self {
        Self::ConfigurationError(error.to_string())
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(error: anyhow::Error) -> Self {
        Self::GenericError(error.to_string())
    }
}

impl From<String> for AgentError {
    fn from(e: String) -> Self {
        GenericError(e)
    }
}
