//! icon-composer: layered stroke-icon composition with SVG export
//!
//! This crate arranges icons from a catalog of 24×24 stroke glyphs as
//! transformed, colored layers on a square canvas, keeps compositions as
//! named projects in a key-value store, and serializes them into standalone
//! SVG documents.
//!
//! # Example
//!
//! ```
//! use icon_composer::{
//!     ComposerConfig, IconCatalog, Layer, LayerPatch, export_svg, next_z_index,
//! };
//!
//! let catalog = IconCatalog::builtin();
//! let config = ComposerConfig::default();
//!
//! let mut layers = vec![Layer::new("circle", 10.0, 0, &config)];
//! let mut star = Layer::new("star", 4.0, next_z_index(&layers), &config);
//! LayerPatch::new().with_color("#eab308").with_rotate(15.0).apply(&mut star);
//! layers.push(star);
//!
//! let svg = export_svg(&layers, &catalog, config.canvas_size);
//! assert!(svg.starts_with("<svg width=\"512\""));
//! ```
//!
//! # Editing sessions
//!
//! [`EditorSession`] is the interactive surface: it owns the layer
//! collection and selection, and persists through a [`ProjectStore`]:
//!
//! ```
//! use icon_composer::{
//!     ComposerConfig, EditorSession, IconCatalog, MemoryStore, ProjectStore, ReorderDirection,
//! };
//!
//! let mut session = EditorSession::start(
//!     IconCatalog::builtin(),
//!     ComposerConfig::default(),
//!     ProjectStore::new(MemoryStore::new()),
//! );
//!
//! session.add_layer("heart");
//! session.duplicate_selected();
//! session.move_selected(ReorderDirection::Down);
//! session.settle();
//!
//! assert_eq!(session.projects().len(), 1);
//! ```

mod compose;
mod config;
mod editor;
mod error;
mod glyphs;
mod icon;
mod id;
mod layer;
mod store;
mod swatch;

#[cfg(feature = "tsify")]
mod wasm;

pub use compose::{
    RenderItem, RenderSequence, SelectionHighlight, export_svg, render_preview_svg,
    render_sequence,
};
pub use config::{ComposerConfig, DEFAULT_CANVAS_SIZE, GLYPH_BOX, GLYPH_STROKE_WIDTH};
pub use editor::{EditorSession, ExportedFile, export_file_name};
pub use error::{Error, Result};
pub use icon::{
    Glyph, IconCatalog, IconDefinition, RawIconEntry, build_catalog, to_display_name,
    to_kebab_case,
};
pub use id::{generate_id, set_id_seed};
pub use layer::{
    Layer, LayerPatch, LayerTransform, ReorderDirection, format_number, next_z_index,
    paint_order, swap_with_neighbour,
};
pub use store::{
    FileStore, KeyValueStore, LAST_PROJECT_KEY, LEGACY_KEY, MemoryStore, PROJECTS_KEY, Project,
    ProjectStore, RESTORED_PROJECT_NAME, UNTITLED_PROJECT_NAME,
};
pub use swatch::{SWATCHES, Swatch, find_swatch, resolve_color, to_css_rgba};

#[cfg(feature = "tsify")]
pub use wasm::Composer;
