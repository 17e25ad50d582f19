//! Serializable composer configuration.
//!
//! A [`ComposerConfig`] collects the constants that shape new layers, the
//! canvas and exports. Every field has a default, so a partial JSON document
//! (or `{}`) is a valid configuration.
//!
//! # Example
//!
//! ```
//! use icon_composer::ComposerConfig;
//!
//! let config = ComposerConfig::from_json(r#"{ "canvasSize": 1024 }"#).unwrap();
//! assert_eq!(config.canvas_size, 1024.0);
//! assert_eq!(config.default_export_name, "mvp-icon");
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Side length of the square canvas, in canvas units.
pub const DEFAULT_CANVAS_SIZE: f64 = 512.0;

/// Side length of the local box every glyph is drawn in.
pub const GLYPH_BOX: f64 = 24.0;

/// Stroke width baked into every rendered glyph.
pub const GLYPH_STROKE_WIDTH: f64 = 2.0;

// ============================================================================
// ComposerConfig
// ============================================================================

/// Tunable defaults for the editor session and the composition engine.
///
/// # JSON Format
///
/// ```json
/// {
///   "canvasSize": 512,
///   "defaultExportName": "mvp-icon",
///   "addedLayerScale": 4,
///   "initialLayerScale": 10,
///   "initialIcon": "square",
///   "defaultColor": "#000000",
///   "duplicateOffset": 20,
///   "selectionMargin": 2,
///   "highlightColor": "#3b82f6"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ComposerConfig {
    /// Side of the square canvas; also the size of exported documents.
    pub canvas_size: f64,

    /// Base file name offered when exporting.
    pub default_export_name: String,

    /// Scale given to layers added from the catalog.
    pub added_layer_scale: f64,

    /// Scale given to the single layer of a fresh project.
    pub initial_layer_scale: f64,

    /// Icon placed in a fresh project.
    pub initial_icon: String,

    /// Color given to new layers.
    pub default_color: String,

    /// Offset applied on both axes when duplicating a layer.
    pub duplicate_offset: f64,

    /// Margin around the glyph box of the selection rectangle, in glyph units.
    pub selection_margin: f64,

    /// Stroke color of the selection rectangle.
    pub highlight_color: String,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            default_export_name: "mvp-icon".to_string(),
            added_layer_scale: 4.0,
            initial_layer_scale: 10.0,
            initial_icon: "square".to_string(),
            default_color: "#000000".to_string(),
            duplicate_offset: 20.0,
            selection_margin: 2.0,
            highlight_color: "#3b82f6".to_string(),
        }
    }
}

impl ComposerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Center of the canvas, where new layers are placed.
    pub fn canvas_center(&self) -> (f64, f64) {
        (self.canvas_size / 2.0, self.canvas_size / 2.0)
    }

    /// Serializes the configuration to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the configuration to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::from_json(&json)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
