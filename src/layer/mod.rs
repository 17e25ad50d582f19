//! Layer model.
//!
//! A [`Layer`] is one placed icon instance. Collections of layers are plain
//! `Vec<Layer>` in insertion order; paint order is derived on demand by
//! [`paint_order`] and never stored.
//!
//! # Ordering
//!
//! ```text
//! insertion order   [A z=1] [B z=0] [C z=1]
//! paint order       [B z=0] [A z=1] [C z=1]   (ties keep insertion order)
//! ```

pub mod transform;

pub use transform::{LayerTransform, format_number};

use serde::{Deserialize, Serialize};

use crate::config::ComposerConfig;
use crate::id::generate_id;

// ============================================================================
// Layer
// ============================================================================

/// One placed, transformable icon instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify), tsify(into_wasm_abi, from_wasm_abi))]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// Opaque identifier, unique within its collection.
    pub id: String,

    /// Identifier of the icon in the catalog.
    pub icon_id: String,

    /// Canvas position of the glyph center.
    pub x: f64,
    pub y: f64,

    /// Uniform scale of the 24-unit glyph box.
    pub scale: f64,

    /// Rotation in degrees; any value, interpreted mod 360.
    pub rotate: f64,

    /// Opacity multiplier in `[0, 1]`.
    pub opacity: f64,

    /// Stroke color; any string the rendering surface accepts.
    pub color: String,

    /// Paint order key, lowest painted first.
    pub z_index: i64,
}

impl Layer {
    /// Creates a layer centered on the canvas with the configured defaults.
    pub fn new(icon_id: impl Into<String>, scale: f64, z_index: i64, config: &ComposerConfig) -> Self {
        let (x, y) = config.canvas_center();
        Self {
            id: generate_id(),
            icon_id: icon_id.into(),
            x,
            y,
            scale,
            rotate: 0.0,
            opacity: 1.0,
            color: config.default_color.clone(),
            z_index,
        }
    }

    /// The placement transform of this layer, with rotation folded into
    /// `[0, 360)`.
    pub fn transform(&self) -> LayerTransform {
        LayerTransform::new(self.x, self.y, self.normalized_rotation(), self.scale)
    }

    /// Rotation folded into `[0, 360)`.
    pub fn normalized_rotation(&self) -> f64 {
        self.rotate.rem_euclid(360.0)
    }

    /// Returns a copy with a fresh identifier, shifted by `offset` on both
    /// axes and placed at `z_index`.
    pub fn duplicate(&self, offset: f64, z_index: i64) -> Self {
        Self {
            id: generate_id(),
            x: self.x + offset,
            y: self.y + offset,
            z_index,
            ..self.clone()
        }
    }
}

// ============================================================================
// LayerPatch
// ============================================================================

/// A partial update of a layer's editable fields.
///
/// Unset fields are left untouched. Non-finite numbers are ignored, opacity
/// is clamped to `[0, 1]` and non-positive scales are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify), tsify(into_wasm_abi, from_wasm_abi))]
#[serde(rename_all = "camelCase")]
pub struct LayerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl LayerPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_icon(mut self, icon_id: impl Into<String>) -> Self {
        self.icon_id = Some(icon_id.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_rotate(mut self, rotate: f64) -> Self {
        self.rotate = Some(rotate);
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Returns true if the patch sets no field.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the patch in place.
    pub fn apply(&self, layer: &mut Layer) {
        if let Some(icon_id) = &self.icon_id {
            layer.icon_id = icon_id.clone();
        }
        if let Some(x) = self.x.filter(|v| v.is_finite()) {
            layer.x = x;
        }
        if let Some(y) = self.y.filter(|v| v.is_finite()) {
            layer.y = y;
        }
        if let Some(scale) = self.scale.filter(|v| v.is_finite() && *v > 0.0) {
            layer.scale = scale;
        }
        if let Some(rotate) = self.rotate.filter(|v| v.is_finite()) {
            layer.rotate = rotate;
        }
        if let Some(opacity) = self.opacity.filter(|v| v.is_finite()) {
            layer.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(color) = &self.color {
            layer.color = color.clone();
        }
    }
}

// ============================================================================
// Ordering
// ============================================================================

/// Direction of a single reorder step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderDirection {
    /// Toward the front (painted later).
    Up,
    /// Toward the back (painted earlier).
    Down,
}

/// Indices of `layers` in paint order: `z_index` ascending, ties in
/// insertion order.
pub fn paint_order_indices(layers: &[Layer]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..layers.len()).collect();
    // `sort_by_key` is stable
    order.sort_by_key(|&i| layers[i].z_index);
    order
}

/// Layers in paint order, back to front.
pub fn paint_order(layers: &[Layer]) -> Vec<&Layer> {
    paint_order_indices(layers)
        .into_iter()
        .map(|i| &layers[i])
        .collect()
}

/// The `z_index` for a new layer: one above the current maximum, or 0 for
/// an empty collection.
pub fn next_z_index(layers: &[Layer]) -> i64 {
    layers
        .iter()
        .map(|l| l.z_index)
        .max()
        .map_or(0, |max| max + 1)
}

/// Swaps the `z_index` of the layer `id` with its neighbour in paint order.
///
/// Only the two swapped layers change. Returns false (and changes nothing)
/// when the layer is unknown or already at the end it is moving toward.
pub fn swap_with_neighbour(layers: &mut [Layer], id: &str, direction: ReorderDirection) -> bool {
    let order = paint_order_indices(layers);
    let Some(rank) = order.iter().position(|&i| layers[i].id == id) else {
        return false;
    };

    let neighbour_rank = match direction {
        ReorderDirection::Up if rank + 1 < order.len() => rank + 1,
        ReorderDirection::Down if rank > 0 => rank - 1,
        _ => return false,
    };

    let (current, neighbour) = (order[rank], order[neighbour_rank]);
    let z = layers[current].z_index;
    layers[current].z_index = layers[neighbour].z_index;
    layers[neighbour].z_index = z;
    true
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(id: &str, z_index: i64) -> Layer {
        let mut layer = Layer::new("square", 4.0, z_index, &ComposerConfig::default());
        layer.id = id.to_string();
        layer
    }

    fn ids(layers: &[&Layer]) -> Vec<String> {
        layers.iter().map(|l| l.id.clone()).collect()
    }

    #[test]
    fn new_layer_defaults() {
        let layer = Layer::new("circle", 4.0, 3, &ComposerConfig::default());
        assert_eq!((layer.x, layer.y), (256.0, 256.0));
        assert_eq!(layer.rotate, 0.0);
        assert_eq!(layer.opacity, 1.0);
        assert_eq!(layer.color, "#000000");
        assert_eq!(layer.z_index, 3);
        assert!(!layer.id.is_empty());
    }

    #[test]
    fn paint_order_is_stable_on_ties() {
        let layers = vec![layer("a", 1), layer("b", 0), layer("c", 1), layer("d", -5)];
        assert_eq!(ids(&paint_order(&layers)), vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn next_z_index_handles_empty_and_gaps() {
        assert_eq!(next_z_index(&[]), 0);
        assert_eq!(next_z_index(&[layer("a", 3), layer("b", 9)]), 10);
        assert_eq!(next_z_index(&[layer("a", -4)]), -3);
    }

    #[test]
    fn swap_up_exchanges_exactly_two_values() {
        let mut layers = vec![layer("a", 0), layer("b", 5), layer("c", 9)];
        assert!(swap_with_neighbour(&mut layers, "a", ReorderDirection::Up));

        let z: Vec<_> = layers.iter().map(|l| l.z_index).collect();
        assert_eq!(z, vec![5, 0, 9]);
    }

    #[test]
    fn swap_at_ends_is_noop() {
        let mut layers = vec![layer("a", 0), layer("b", 1)];
        let before = layers.clone();

        assert!(!swap_with_neighbour(&mut layers, "b", ReorderDirection::Up));
        assert!(!swap_with_neighbour(&mut layers, "a", ReorderDirection::Down));
        assert!(!swap_with_neighbour(&mut layers, "zzz", ReorderDirection::Up));
        assert_eq!(layers, before);
    }

    #[test]
    fn swap_with_tied_neighbour_uses_insertion_rank() {
        // Equal values swap to equal values; ranks come from insertion order
        let mut layers = vec![layer("a", 1), layer("b", 1), layer("c", 2)];
        assert!(swap_with_neighbour(&mut layers, "b", ReorderDirection::Up));
        let z: Vec<_> = layers.iter().map(|l| l.z_index).collect();
        assert_eq!(z, vec![1, 2, 1]);
        assert_eq!(ids(&paint_order(&layers)), vec!["a", "c", "b"]);
    }

    #[test]
    fn patch_applies_only_set_fields() {
        let mut target = layer("a", 0);
        LayerPatch::new()
            .with_position(10.0, 20.0)
            .with_color("#ff0000")
            .apply(&mut target);

        assert_eq!((target.x, target.y), (10.0, 20.0));
        assert_eq!(target.color, "#ff0000");
        assert_eq!(target.scale, 4.0);
        assert_eq!(target.id, "a");
    }

    #[test]
    fn patch_sanitizes_numbers() {
        let mut target = layer("a", 0);
        LayerPatch::new()
            .with_opacity(1.7)
            .with_scale(-2.0)
            .with_rotate(f64::NAN)
            .apply(&mut target);

        assert_eq!(target.opacity, 1.0);
        assert_eq!(target.scale, 4.0);
        assert_eq!(target.rotate, 0.0);
    }

    #[test]
    fn rotation_is_interpreted_mod_360() {
        let mut target = layer("a", 0);
        target.rotate = -90.0;
        assert_eq!(target.normalized_rotation(), 270.0);
        target.rotate = 725.0;
        assert_eq!(target.normalized_rotation(), 5.0);
        assert_eq!(target.transform().rotate, 5.0);
    }

    #[test]
    fn duplicate_offsets_and_renames() {
        let original = layer("a", 0);
        let copy = original.duplicate(20.0, 7);
        assert_ne!(copy.id, original.id);
        assert_eq!((copy.x, copy.y), (276.0, 276.0));
        assert_eq!(copy.z_index, 7);
        assert_eq!(copy.icon_id, original.icon_id);
    }

    #[test]
    fn layer_json_uses_camel_case() {
        let json = serde_json::to_string(&layer("a", 2)).unwrap();
        assert!(json.contains("\"iconId\":\"square\""));
        assert!(json.contains("\"zIndex\":2"));

        let back: Layer = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "a");
    }
}
