//! Error types for asset loading and scene assembly.
//!
//! Geometry never fails: degenerate cases (single-card hands, horizontal
//! connectors) are handled by explicit branches where they occur.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// An atlas or required image file is missing or cannot be decoded.
    #[error("unable to load image {}: {source}", .path.display())]
    FatalAsset {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An atlas index record lacks a required field.
    #[error("index record {record} is missing required field `{field}`")]
    MalformedIndex { record: usize, field: &'static str },

    #[error("unknown sprite `{id}`")]
    UnknownSprite { id: String },

    #[error("unknown resolution `{0}`")]
    UnknownResolution(String),
}
