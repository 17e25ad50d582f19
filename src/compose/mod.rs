//! Composition engine.
//!
//! Turns an insertion-ordered layer collection into a paint-ordered
//! [`RenderSequence`] of plain data for interactive display, and into a
//! standalone SVG document for export (see [`svg`]).
//!
//! Nothing here fails: a layer whose icon does not resolve is left out of
//! both outputs.

pub mod svg;

pub use svg::{export_svg, render_preview_svg};

use crate::config::{ComposerConfig, GLYPH_BOX};
use crate::icon::{Glyph, IconCatalog};
use crate::layer::{Layer, LayerTransform, paint_order};
use crate::swatch::to_css_rgba;

/// Dash pattern of the selection rectangle.
pub const HIGHLIGHT_DASH: [f64; 2] = [4.0, 2.0];

/// Alpha of the glow drawn around the selected glyph.
pub const GLOW_ALPHA: f32 = 0.8;

// ============================================================================
// SelectionHighlight
// ============================================================================

/// Decoration drawn on the selected layer only.
///
/// The rectangle is expressed in glyph-local units, so it follows the
/// layer's own transform.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionHighlight {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rectangle stroke color.
    pub stroke: String,
    /// Dash and gap length of the rectangle stroke.
    pub dash: [f64; 2],
    /// CSS color of the glow around the glyph.
    pub glow: String,
}

impl SelectionHighlight {
    /// The glyph box grown by `config.selection_margin` on every side.
    pub fn new(config: &ComposerConfig) -> Self {
        let margin = config.selection_margin;
        Self {
            x: -margin,
            y: -margin,
            width: GLYPH_BOX + 2.0 * margin,
            height: GLYPH_BOX + 2.0 * margin,
            stroke: config.highlight_color.clone(),
            dash: HIGHLIGHT_DASH,
            glow: to_css_rgba(&config.highlight_color, GLOW_ALPHA),
        }
    }
}

// ============================================================================
// RenderItem
// ============================================================================

/// One layer ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem<'a> {
    pub layer_id: &'a str,
    pub icon_id: &'a str,
    pub glyph: &'a Glyph,
    pub transform: LayerTransform,
    pub opacity: f64,
    pub color: &'a str,
    /// Present on the selected layer only.
    pub highlight: Option<SelectionHighlight>,
}

impl RenderItem<'_> {
    pub fn is_selected(&self) -> bool {
        self.highlight.is_some()
    }
}

// ============================================================================
// RenderSequence
// ============================================================================

/// Drawable layers, back to front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSequence<'a> {
    items: Vec<RenderItem<'a>>,
}

impl<'a> RenderSequence<'a> {
    pub fn items(&self) -> &[RenderItem<'a>] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderItem<'a>> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The selected item, if it is drawable.
    pub fn selected(&self) -> Option<&RenderItem<'a>> {
        self.items.iter().find(|item| item.is_selected())
    }

    /// The frontmost item whose glyph box contains the canvas point.
    pub fn hit_test(&self, point: (f64, f64)) -> Option<&RenderItem<'a>> {
        self.items
            .iter()
            .rev()
            .find(|item| item.transform.contains(point, 0.0))
    }
}

/// Builds the paint-ordered render sequence.
///
/// `selection` marks at most one layer for highlighting; an identifier that
/// matches no drawable layer highlights nothing.
pub fn render_sequence<'a>(
    layers: &'a [Layer],
    catalog: &'a IconCatalog,
    selection: Option<&str>,
    config: &ComposerConfig,
) -> RenderSequence<'a> {
    let items = paint_order(layers)
        .into_iter()
        .filter_map(|layer| {
            let icon = catalog.lookup(&layer.icon_id)?;
            let selected = selection == Some(layer.id.as_str());
            Some(RenderItem {
                layer_id: &layer.id,
                icon_id: &layer.icon_id,
                glyph: &icon.glyph,
                transform: layer.transform(),
                opacity: layer.opacity,
                color: &layer.color,
                highlight: selected.then(|| SelectionHighlight::new(config)),
            })
        })
        .collect();

    RenderSequence { items }
}

// ============================================================================
// Tests
// ============================================================================
