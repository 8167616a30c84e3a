use std::path::PathBuf;

use common::ErrorLocation;
use thiserror::Error;

/// Failures reading or writing `config.yaml` / `.fizzy.yaml`.
///
/// Read and parse failures are logged and the file is skipped; the rest reach
/// the envelope through `auth login` and `auth logout`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config Read Error: {path}: {source} {location}")]
    ReadError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config Parse Error: {path} is not valid YAML: {reason} {location}")]
    ParseError {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    #[error("Config Write Error: {path}: {source} {location}")]
    WriteError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config Path Error: {reason} {location}")]
    PathUnavailable {
        location: ErrorLocation,
        reason: String,
    },

    #[error("Config Serialization Error: {reason} {location}")]
    SerializeError {
        location: ErrorLocation,
        reason: String,
    },
}

impl ConfigError {
    /// Message without the location suffix, for the response envelope.
    pub fn reason(&self) -> String {
        match self {
            ConfigError::ReadError { path, source, .. } => {
                format!("Failed to read config {}: {source}", path.display())
            }
            ConfigError::ParseError { path, reason, .. } => {
                format!("Failed to parse config {}: {reason}", path.display())
            }
            ConfigError::WriteError { path, source, .. } => {
                format!("Failed to write config {}: {source}", path.display())
            }
            ConfigError::PathUnavailable { reason, .. } => reason.clone(),
            ConfigError::SerializeError { reason, .. } => {
                format!("Failed to serialize config: {reason}")
            }
        }
    }
}
