//! SVG serialization of compositions.
//!
//! [`export_svg`] produces the standalone document written to disk;
//! [`render_preview_svg`] produces the same document plus selection
//! decorations for interactive display.

use std::fmt::Write;

use super::{RenderSequence, SelectionHighlight, render_sequence};
use crate::config::{GLYPH_BOX, GLYPH_STROKE_WIDTH};
use crate::icon::{Glyph, IconCatalog};
use crate::layer::{Layer, format_number};

/// Namespace declared on every root element.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

// ============================================================================
// SvgWriter
// ============================================================================

/// Minimal indenting writer for nested SVG elements.
struct SvgWriter {
    out: String,
    depth: usize,
}

impl SvgWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line_start(&mut self) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        for _ in 0..self.depth {
            self.out.push('\t');
        }
    }

    fn write_tag(&mut self, name: &str, attributes: &[(&str, String)], self_closing: bool) {
        self.line_start();
        self.out.push('<');
        self.out.push_str(name);
        for (key, value) in attributes {
            // Writing into a String cannot fail
            let _ = write!(self.out, " {key}=\"{}\"", escape_attribute(value));
        }
        self.out.push_str(if self_closing { "/>" } else { ">" });
    }

    fn open(&mut self, name: &str, attributes: &[(&str, String)]) {
        self.write_tag(name, attributes, false);
        self.depth += 1;
    }

    fn close(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line_start();
        let _ = write!(self.out, "</{name}>");
    }

    fn leaf(&mut self, name: &str, attributes: &[(&str, String)]) {
        self.write_tag(name, attributes, true);
    }

    /// Writes pre-serialized markup on its own line.
    fn raw(&mut self, markup: &str) {
        self.line_start();
        self.out.push_str(markup);
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Escapes a value for use inside a double-quoted XML attribute.
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// Glyph markup
// ============================================================================

/// Static markup of a glyph: a 24×24 `<svg>` stroked with `color`.
pub fn glyph_markup(glyph: &Glyph, color: &str) -> String {
    let size = format_number(GLYPH_BOX);
    format!(
        r#"<svg xmlns="{SVG_NAMESPACE}" width="{size}" height="{size}" viewBox="0 0 {size} {size}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round">{}</svg>"#,
        escape_attribute(color),
        format_number(GLYPH_STROKE_WIDTH),
        glyph.body(),
    )
}

fn root_attributes(size: f64) -> Vec<(&'static str, String)> {
    let size = format_number(size);
    vec![
        ("width", size.clone()),
        ("height", size.clone()),
        ("viewBox", format!("0 0 {size} {size}")),
        ("xmlns", SVG_NAMESPACE.to_string()),
    ]
}

fn write_highlight(writer: &mut SvgWriter, highlight: &SelectionHighlight) {
    writer.leaf(
        "rect",
        &[
            ("x", format_number(highlight.x)),
            ("y", format_number(highlight.y)),
            ("width", format_number(highlight.width)),
            ("height", format_number(highlight.height)),
            ("fill", "none".to_string()),
            ("stroke", highlight.stroke.clone()),
            ("stroke-width", "1".to_string()),
            (
                "stroke-dasharray",
                format!(
                    "{} {}",
                    format_number(highlight.dash[0]),
                    format_number(highlight.dash[1])
                ),
            ),
            ("vector-effect", "non-scaling-stroke".to_string()),
        ],
    );
}

fn write_sequence(sequence: &RenderSequence<'_>, size: f64, decorate: bool) -> String {
    let mut writer = SvgWriter::new();
    writer.open("svg", &root_attributes(size));

    for item in sequence.iter() {
        writer.open(
            "g",
            &[
                ("transform", item.transform.to_svg()),
                ("opacity", format_number(item.opacity)),
            ],
        );

        match item.highlight.as_ref().filter(|_| decorate) {
            Some(highlight) => {
                writer.open(
                    "g",
                    &[(
                        "style",
                        format!("filter: drop-shadow(0 0 2px {})", highlight.glow),
                    )],
                );
                writer.raw(&glyph_markup(item.glyph, item.color));
                writer.close("g");
                write_highlight(&mut writer, highlight);
            }
            None => writer.raw(&glyph_markup(item.glyph, item.color)),
        }

        writer.close("g");
    }

    writer.close("svg");
    writer.finish()
}

// ============================================================================
// Export
// ============================================================================

/// Serializes layers into a standalone SVG document of side `size`.
///
/// Layers are written in paint order, one `<g>` per layer carrying its
/// transform and opacity. Layers whose icon is not in the catalog are
/// skipped. The output depends only on `layers` and `size`, never on
/// selection, so equal inputs give byte-identical documents.
pub fn export_svg(layers: &[Layer], catalog: &IconCatalog, size: f64) -> String {
    let sequence = render_sequence(layers, catalog, None, &Default::default());
    write_sequence(&sequence, size, false)
}

/// Serializes the interactive render, including the selection rectangle and
/// glow of the selected layer.
pub fn render_preview_svg(sequence: &RenderSequence<'_>, size: f64) -> String {
    write_sequence(sequence, size, true)
}

// ============================================================================
// Tests
// ============================================================================
