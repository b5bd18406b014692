//! Error types for loading node records and themes

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::theme::ThemeError;

/// Errors that can occur while decoding a node input record
#[derive(Error, Debug)]
pub enum NodeDataError {
    #[error("Failed to read node file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse node JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to parse node TOML: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("unsupported node file extension for '{}' (expected .json or .toml)", path.display())]
    UnsupportedFormat { path: PathBuf },
}

impl NodeDataError {
    pub fn unsupported(path: &Path) -> Self {
        Self::UnsupportedFormat {
            path: path.to_path_buf(),
        }
    }
}

/// Top-level error for the crate's fallible entry points
#[derive(Debug, Error)]
pub enum Error {
    /// Error decoding a node record
    #[error("node data error: {0}")]
    NodeData(#[from] NodeDataError),

    /// Error loading a theme
    #[error("theme error: {0}")]
    Theme(#[from] ThemeError),
}
