#![deny(warnings)]

//! Persistence boundary: encoding and decoding of stored configuration records.
//!
//! Storage itself belongs to the host; this crate turns a [`RealTimeConfig`]
//! into bytes and back. Every record coming out of [`decode`] has already been
//! migrated and validated.

use realtime_config::{RealTimeConfig, STORAGE_ID};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Encoding of a stored record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Pretty-printed JSON.
    Json,
    /// YAML document.
    Yaml,
    /// Compact bincode blob.
    Binary,
}

impl Format {
    /// Picks the format from a file extension, defaulting to JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Format::from_name)
            .unwrap_or(Format::Json)
    }

    /// Parses a format name or file extension.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "bin" | "binary" => Some(Format::Binary),
            _ => None,
        }
    }
}

/// Errors raised while encoding or decoding a record.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Malformed JSON or a value of the wrong type.
    #[error("json codec error: {0}")]
    Json(#[from] serde_json::Error),
    /// Malformed YAML or a value of the wrong type.
    #[error("yaml codec error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Truncated or corrupt binary blob.
    #[error("binary codec error: {0}")]
    Binary(#[from] bincode::Error),
}

/// Encodes a record.
pub fn encode(config: &RealTimeConfig, format: Format) -> Result<Vec<u8>, PersistenceError> {
    let bytes = match format {
        Format::Json => serde_json::to_vec_pretty(config)?,
        Format::Yaml => serde_yaml::to_string(config)?.into_bytes(),
        Format::Binary => bincode::serialize(config)?,
    };
    debug!(storage_id = STORAGE_ID, ?format, len = bytes.len(), "encoded configuration");
    Ok(bytes)
}

/// Decodes a record without migrating or validating it.
///
/// Missing fields take the zero value of their type, unknown fields are ignored.
pub fn decode_raw(bytes: &[u8], format: Format) -> Result<RealTimeConfig, PersistenceError> {
    let config: RealTimeConfig = match format {
        Format::Json => serde_json::from_slice(bytes)?,
        Format::Yaml => serde_yaml::from_slice(bytes)?,
        Format::Binary => bincode::deserialize(bytes)?,
    };
    Ok(config)
}

/// Decodes a record and brings it up to date: migration first, then validation.
pub fn decode(bytes: &[u8], format: Format) -> Result<RealTimeConfig, PersistenceError> {
    let mut config = decode_raw(bytes, format)?;
    debug!(storage_id = STORAGE_ID, version = config.version, "decoded configuration");
    prepare_loaded(&mut config);
    Ok(config)
}

/// Decodes stored state if there is any, otherwise starts from the latest defaults.
pub fn load_or_default(
    stored: Option<&[u8]>,
    format: Format,
) -> Result<RealTimeConfig, PersistenceError> {
    match stored {
        Some(bytes) => decode(bytes, format),
        None => Ok(RealTimeConfig::with_latest_version()),
    }
}

/// The post-load sequence every loaded record must go through before use.
pub fn prepare_loaded(config: &mut RealTimeConfig) {
    config.migrate_when_necessary();
    config.validate();
}
