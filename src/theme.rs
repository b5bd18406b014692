//! Default node styles per shape kind
//!
//! A theme holds a `[base]` style table shared by every node and one table
//! per shape kind (`[rect]`, `[circle]`, ...). A node's effective style is the
//! base table, overlaid with its kind's table, overlaid with the node's own
//! style overrides.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::node::StyleMap;

/// Errors that can occur when loading or parsing themes
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("Failed to read theme file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse theme TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Style defaults keyed by shape kind
#[derive(Debug, Clone)]
pub struct Theme {
    /// Optional name for the theme
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Styles applied to every node
    pub base: StyleMap,
    /// Per-kind overrides of the base styles
    pub shapes: HashMap<String, StyleMap>,
}

/// TOML structure for deserializing themes
#[derive(Deserialize)]
struct TomlTheme {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    base: StyleMap,
    #[serde(flatten)]
    shapes: HashMap<String, StyleMap>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

const DEFAULT_THEME: &str = r##"
[base]
fill = "#ffffff"
stroke = "#000000"
strokeWidth = 2

[rect]
radius = 0

[circle]

[ellipse]

[diamond]

[polygon]

[text]
fill = "transparent"
stroke = "transparent"
fontSize = 12
"##;

impl Theme {
    /// Load theme from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load theme from TOML string
    pub fn from_str(content: &str) -> Result<Self, ThemeError> {
        let parsed: TomlTheme = toml::from_str(content)?;

        Ok(Theme {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            base: parsed.base,
            shapes: parsed.shapes,
        })
    }

    /// Effective default style for a shape kind (base overlaid with the kind table)
    pub fn style_for(&self, kind: &str) -> StyleMap {
        let mut style = self.base.clone();
        if let Some(overrides) = self.shapes.get(kind) {
            for (key, value) in overrides {
                style.insert(key.clone(), value.clone());
            }
        }
        style
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_str(DEFAULT_THEME).expect("Default theme should be valid TOML")
    }
}
