//! JavaScript bindings for browser hosts.
//!
//! [`Composer`] wraps an [`EditorSession`] over a [`MemoryStore`]. The host
//! owns durable storage: it seeds the composer with the records it kept
//! (for example from `localStorage`) and reads them back after each settle.
//!
//! # Feature Flag
//!
//! Only available with the `tsify` feature enabled.
//!
//! # Example (TypeScript)
//!
//! ```javascript
//! import init, { Composer } from 'icon-composer';
//!
//! await init();
//!
//! const saved = JSON.parse(localStorage.getItem('composer') ?? 'null');
//! const composer = new Composer(saved, null);
//!
//! // `records()` is a plain object; `recordsJson()` is the same as a string
//!
//! composer.addLayer('circle');
//! composer.updateSelected({ color: '#ef4444', scale: 6 });
//! if (composer.settle()) {
//!     localStorage.setItem('composer', composer.recordsJson());
//! }
//!
//! preview.innerHTML = composer.previewSvg();
//! ```

use std::collections::HashMap;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::compose::svg::glyph_markup;
use crate::config::ComposerConfig;
use crate::editor::EditorSession;
use crate::icon::{IconCatalog, IconDefinition};
use crate::layer::{LayerPatch, ReorderDirection};
use crate::store::{KeyValueStore, MemoryStore, ProjectStore};

/// Converts to plain JSON-compatible JS values: maps become objects, so
/// results survive `JSON.stringify`.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Picker entry handed to JavaScript.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IconSummary<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    svg: String,
}

impl<'a> IconSummary<'a> {
    fn new(icon: &'a IconDefinition, color: &str) -> Self {
        Self {
            id: &icon.id,
            name: &icon.name,
            category: &icon.category,
            svg: glyph_markup(&icon.glyph, color),
        }
    }
}

// ============================================================================
// Composer
// ============================================================================

/// An editing session exposed to JavaScript.
#[wasm_bindgen]
pub struct Composer {
    session: EditorSession<MemoryStore>,
}

#[wasm_bindgen]
impl Composer {
    /// Starts a session.
    ///
    /// # Arguments
    ///
    /// * `records` - Storage records previously returned by
    ///   [`records`](Self::records), or `null` for empty storage
    /// * `config_json` - Optional configuration overrides as JSON
    #[wasm_bindgen(constructor)]
    pub fn new(records: JsValue, config_json: Option<String>) -> Result<Composer, JsError> {
        let records: HashMap<String, String> = if records.is_null() || records.is_undefined() {
            HashMap::new()
        } else {
            serde_wasm_bindgen::from_value(records)
                .map_err(|e| JsError::new(&format!("Invalid storage records: {e}")))?
        };

        let config = match config_json {
            Some(json) => ComposerConfig::from_json(&json)
                .map_err(|e| JsError::new(&format!("Invalid config: {e}")))?,
            None => ComposerConfig::default(),
        };

        let store = ProjectStore::new(MemoryStore::from_records(records));
        Ok(Self {
            session: EditorSession::start(IconCatalog::builtin(), config, store),
        })
    }

    // ---- Catalog ----

    /// Icons matching `query` (all icons when empty), each with a preview
    /// rendered in `color`.
    pub fn icons(&self, query: &str, color: &str) -> Result<JsValue, JsError> {
        let summaries: Vec<_> = self
            .session
            .catalog()
            .search(query)
            .into_iter()
            .map(|icon| IconSummary::new(icon, color))
            .collect();
        to_js(&summaries)
    }

    // ---- Layers ----

    /// Layers in insertion order.
    pub fn layers(&self) -> Result<JsValue, JsError> {
        to_js(self.session.layers())
    }

    #[wasm_bindgen(js_name = "selectedLayer")]
    pub fn selected_layer(&self) -> Result<JsValue, JsError> {
        to_js(&self.session.selected_layer())
    }

    #[wasm_bindgen(js_name = "addLayer")]
    pub fn add_layer(&mut self, icon_id: &str) -> String {
        self.session.add_layer(icon_id)
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.session.select(id)
    }

    /// Selects the frontmost layer under a canvas point.
    #[wasm_bindgen(js_name = "selectAt")]
    pub fn select_at(&mut self, x: f64, y: f64) -> bool {
        self.session.select_at((x, y))
    }

    #[wasm_bindgen(js_name = "clearSelection")]
    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }

    #[wasm_bindgen(js_name = "updateSelected")]
    pub fn update_selected(&mut self, patch: LayerPatch) -> bool {
        self.session.update_selected(&patch)
    }

    #[wasm_bindgen(js_name = "deleteSelected")]
    pub fn delete_selected(&mut self) -> bool {
        self.session.delete_selected()
    }

    #[wasm_bindgen(js_name = "duplicateSelected")]
    pub fn duplicate_selected(&mut self) -> bool {
        self.session.duplicate_selected()
    }

    #[wasm_bindgen(js_name = "moveSelectedUp")]
    pub fn move_selected_up(&mut self) -> bool {
        self.session.move_selected(ReorderDirection::Up)
    }

    #[wasm_bindgen(js_name = "moveSelectedDown")]
    pub fn move_selected_down(&mut self) -> bool {
        self.session.move_selected(ReorderDirection::Down)
    }

    // ---- Projects ----

    #[wasm_bindgen(getter, js_name = "projectId")]
    pub fn project_id(&self) -> String {
        self.session.project_id().to_string()
    }

    #[wasm_bindgen(getter, js_name = "projectName")]
    pub fn project_name(&self) -> String {
        self.session.project_name().to_string()
    }

    /// Stored projects, newest first.
    pub fn projects(&self) -> Result<JsValue, JsError> {
        to_js(&self.session.projects())
    }

    #[wasm_bindgen(js_name = "newProject")]
    pub fn new_project(&mut self) {
        self.session.new_project();
    }

    #[wasm_bindgen(js_name = "openProject")]
    pub fn open_project(&mut self, id: &str) -> bool {
        self.session.open_project(id)
    }

    #[wasm_bindgen(js_name = "renameProject")]
    pub fn rename_project(&mut self, name: &str) {
        self.session.rename_project(name);
    }

    #[wasm_bindgen(js_name = "deleteProject")]
    pub fn delete_project(&mut self, id: &str) -> Result<(), JsError> {
        self.session
            .delete_project(id)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Writes pending changes. Returns `true` when records changed and
    /// should be persisted by the host.
    pub fn settle(&mut self) -> bool {
        self.session.settle().is_some()
    }

    /// All storage records as a `{ key: value }` object.
    pub fn records(&self) -> Result<JsValue, JsError> {
        let provider: &MemoryStore = self.session.store().provider();
        to_js(provider.records())
    }

    /// All storage records as a JSON object string.
    #[wasm_bindgen(js_name = "recordsJson")]
    pub fn records_json(&self) -> Result<String, JsError> {
        self.session
            .store()
            .provider()
            .to_json()
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Reads one storage record.
    pub fn record(&self, key: &str) -> Result<Option<String>, JsError> {
        self.session
            .store()
            .provider()
            .get(key)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    // ---- Rendering ----

    /// The composition with the selection highlighted.
    #[wasm_bindgen(js_name = "previewSvg")]
    pub fn preview_svg(&self) -> String {
        self.session.preview_svg()
    }

    /// The exported document.
    #[wasm_bindgen(js_name = "exportSvg")]
    pub fn export_svg(&self) -> String {
        self.session.export_svg()
    }

    /// Renders the export for a `prompt()` answer and starts a new project,
    /// returning the download file name, or `null` when the prompt was
    /// dismissed. The document is read with [`exportSvg`](Self::export_svg)
    /// beforehand.
    #[wasm_bindgen(js_name = "exportAndReset")]
    pub fn export_and_reset(&mut self, answer: Option<String>) -> Option<String> {
        self.session
            .export_and_reset(answer.as_deref())
            .map(|file| file.file_name)
    }

    /// Resolves a `prompt()` answer into a download file name, or `null` when
    /// the prompt was dismissed.
    #[wasm_bindgen(js_name = "exportFileName")]
    pub fn export_file_name(&self, answer: Option<String>) -> Option<String> {
        self.session
            .export(answer.as_deref())
            .map(|file| file.file_name)
    }
}
