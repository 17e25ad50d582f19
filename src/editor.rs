//! Editor session: the live composition, its selection and its project.
//!
//! [`EditorSession`] owns the layer collection being edited and dispatches
//! the editing commands. Every command that changes the composition marks
//! the session dirty; [`EditorSession::settle`] then writes the project once,
//! after the caller's update cycle, so saves always follow the mutations
//! they reflect.
//!
//! # Example
//!
//! ```
//! use icon_composer::{
//!     ComposerConfig, EditorSession, IconCatalog, LayerPatch, MemoryStore, ProjectStore,
//! };
//!
//! let mut session = EditorSession::start(
//!     IconCatalog::builtin(),
//!     ComposerConfig::default(),
//!     ProjectStore::new(MemoryStore::new()),
//! );
//!
//! session.add_layer("circle");
//! session.update_selected(&LayerPatch::new().with_color("#ef4444").with_scale(6.0));
//! session.settle();
//!
//! let svg = session.export_svg();
//! assert!(svg.contains("#ef4444"));
//! ```

use std::path::{Path, PathBuf};

use crate::compose::{self, RenderSequence, render_sequence};
use crate::config::ComposerConfig;
use crate::error::{Error, Result};
use crate::icon::IconCatalog;
use crate::id::generate_id;
use crate::layer::{Layer, LayerPatch, ReorderDirection, next_z_index, swap_with_neighbour};
use crate::store::{KeyValueStore, Project, ProjectStore, UNTITLED_PROJECT_NAME};

// ============================================================================
// Export naming
// ============================================================================

/// Turns an export prompt answer into a file name.
///
/// `None` or an empty answer means the prompt was dismissed and nothing is
/// exported. A blank answer falls back to `default_name`. `.svg` is appended
/// unless the name already ends with it in any case.
pub fn export_file_name(input: Option<&str>, default_name: &str) -> Option<String> {
    let input = input.filter(|s| !s.is_empty())?;

    let trimmed = match input.trim() {
        "" => default_name,
        trimmed => trimmed,
    };

    if trimmed.to_lowercase().ends_with(".svg") {
        Some(trimmed.to_string())
    } else {
        Some(format!("{trimmed}.svg"))
    }
}

/// A rendered export, ready to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub content: String,
}

impl ExportedFile {
    /// Writes the document into `dir` and returns its path.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.content).map_err(|e| Error::io(&path, e))?;
        Ok(path)
    }
}

// ============================================================================
// EditorSession
// ============================================================================

/// The single-writer editing session.
pub struct EditorSession<S> {
    catalog: IconCatalog,
    config: ComposerConfig,
    store: ProjectStore<S>,

    project_id: String,
    project_name: String,
    layers: Vec<Layer>,
    selection: Option<String>,
    dirty: bool,
}

impl<S: KeyValueStore> EditorSession<S> {
    /// Opens a session the way the application starts up.
    ///
    /// Legacy data is migrated first. The migrated project, or else the last
    /// used project, is resumed; with neither, a new project is started.
    pub fn start(catalog: IconCatalog, config: ComposerConfig, store: ProjectStore<S>) -> Self {
        let mut session = Self {
            catalog,
            config,
            store,
            project_id: String::new(),
            project_name: String::new(),
            layers: Vec::new(),
            selection: None,
            dirty: false,
        };

        let resumed = session.store.migrate_legacy().or_else(|| {
            let id = session.store.last_used_id()?;
            session.store.get(&id)
        });

        match resumed {
            Some(project) => session.load(project),
            None => session.new_project(),
        }
        session
    }

    // ---- Accessors ----

    pub fn catalog(&self) -> &IconCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn store(&self) -> &ProjectStore<S> {
        &self.store
    }

    /// Layers in insertion order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn selected_layer(&self) -> Option<&Layer> {
        self.layer(self.selection.as_deref()?)
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// True when there are changes not yet written by [`settle`](Self::settle).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Snapshot of the composition as a project.
    pub fn current_project(&self) -> Project {
        Project {
            id: self.project_id.clone(),
            name: self.project_name.clone(),
            updated_at: crate::store::now_millis(),
            layers: self.layers.clone(),
        }
    }

    fn selected_index(&self) -> Option<usize> {
        let id = self.selection.as_deref()?;
        self.layers.iter().position(|l| l.id == id)
    }

    fn touch(&mut self) {
        self.dirty = true;
    }

    fn load(&mut self, project: Project) {
        log::debug!("Loading project {} ({})", project.id, project.name);
        self.project_id = project.id;
        self.project_name = project.name;
        self.layers = project.layers;
        self.selection = self.layers.last().map(|l| l.id.clone());
        self.dirty = false;
    }

    // ---- Selection ----

    /// Selects a layer. Unknown identifiers leave the selection unchanged.
    pub fn select(&mut self, id: &str) -> bool {
        if self.layer(id).is_none() {
            return false;
        }
        self.selection = Some(id.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Selects the frontmost layer drawn under a canvas point.
    pub fn select_at(&mut self, point: (f64, f64)) -> bool {
        let hit = self
            .render()
            .hit_test(point)
            .map(|item| item.layer_id.to_string());
        match hit {
            Some(id) => {
                self.selection = Some(id);
                true
            }
            None => false,
        }
    }

    // ---- Layer commands ----

    /// Adds a centered layer for `icon_id` above all others and selects it.
    /// Returns the new layer's identifier.
    pub fn add_layer(&mut self, icon_id: &str) -> String {
        if !self.catalog.contains(icon_id) {
            log::warn!("Adding layer with unknown icon `{icon_id}`; it will not render");
        }

        let layer = Layer::new(
            icon_id,
            self.config.added_layer_scale,
            next_z_index(&self.layers),
            &self.config,
        );
        let id = layer.id.clone();
        log::debug!("Added layer {id} ({icon_id}) at z {}", layer.z_index);

        self.layers.push(layer);
        self.selection = Some(id.clone());
        self.touch();
        id
    }

    /// Applies a patch to the selected layer. No-op without a selection.
    pub fn update_selected(&mut self, patch: &LayerPatch) -> bool {
        let Some(index) = self.selected_index() else {
            return false;
        };
        patch.apply(&mut self.layers[index]);
        self.touch();
        true
    }

    /// Removes the selected layer and clears the selection.
    pub fn delete_selected(&mut self) -> bool {
        let Some(index) = self.selected_index() else {
            return false;
        };
        let removed = self.layers.remove(index);
        log::debug!("Deleted layer {}", removed.id);
        self.selection = None;
        self.touch();
        true
    }

    /// Clones the selected layer, offset and above all others, and selects
    /// the clone.
    pub fn duplicate_selected(&mut self) -> bool {
        let Some(index) = self.selected_index() else {
            return false;
        };
        let copy = self.layers[index].duplicate(self.config.duplicate_offset, next_z_index(&self.layers));
        log::debug!("Duplicated layer {} as {}", self.layers[index].id, copy.id);

        self.selection = Some(copy.id.clone());
        self.layers.push(copy);
        self.touch();
        true
    }

    /// Swaps the selected layer's `z_index` with its paint-order neighbour.
    pub fn move_selected(&mut self, direction: ReorderDirection) -> bool {
        let Some(id) = self.selection.clone() else {
            return false;
        };
        let moved = swap_with_neighbour(&mut self.layers, &id, direction);
        if moved {
            self.touch();
        }
        moved
    }

    // ---- Project commands ----

    /// Replaces the composition with one fresh default layer under a new
    /// untitled project.
    pub fn new_project(&mut self) {
        let layer = Layer::new(
            self.config.initial_icon.clone(),
            self.config.initial_layer_scale,
            0,
            &self.config,
        );

        self.project_id = generate_id();
        self.project_name = UNTITLED_PROJECT_NAME.to_string();
        self.selection = Some(layer.id.clone());
        self.layers = vec![layer];
        self.touch();
        log::debug!("Started new project {}", self.project_id);
    }

    /// Renames the current project. Blank names reset to the default name.
    pub fn rename_project(&mut self, name: &str) {
        let name = name.trim();
        self.project_name = if name.is_empty() {
            UNTITLED_PROJECT_NAME.to_string()
        } else {
            name.to_string()
        };
        self.touch();
    }

    /// Loads a stored project, discarding unsaved changes to the current one.
    pub fn open_project(&mut self, id: &str) -> bool {
        match self.store.get(id) {
            Some(project) => {
                self.load(project);
                true
            }
            None => false,
        }
    }

    /// Deletes a stored project. Deleting the open project starts a new one.
    pub fn delete_project(&mut self, id: &str) -> Result<()> {
        self.store.delete(id)?;
        if id == self.project_id {
            self.new_project();
        }
        Ok(())
    }

    /// Projects in storage, newest first.
    pub fn projects(&self) -> Vec<Project> {
        self.store.list_recent()
    }

    /// Writes the project if anything changed since the last write.
    ///
    /// Failures are logged and leave the session dirty so the next settle
    /// retries.
    pub fn settle(&mut self) -> Option<Project> {
        if !self.dirty {
            return None;
        }
        match self.store.save(&self.current_project()) {
            Ok(saved) => {
                self.dirty = false;
                Some(saved)
            }
            Err(e) => {
                log::error!("Failed to save project {}: {e}", self.project_id);
                None
            }
        }
    }

    // ---- Rendering ----

    /// The interactive render sequence, with the selection highlighted.
    pub fn render(&self) -> RenderSequence<'_> {
        render_sequence(
            &self.layers,
            &self.catalog,
            self.selection.as_deref(),
            &self.config,
        )
    }

    /// The interactive render as SVG text.
    pub fn preview_svg(&self) -> String {
        compose::render_preview_svg(&self.render(), self.config.canvas_size)
    }

    /// The exported document at the configured canvas size.
    pub fn export_svg(&self) -> String {
        compose::export_svg(&self.layers, &self.catalog, self.config.canvas_size)
    }

    /// Resolves the export prompt answer and renders the document.
    /// Returns `None` when the prompt was dismissed.
    pub fn export(&self, prompt_answer: Option<&str>) -> Option<ExportedFile> {
        let file_name = export_file_name(prompt_answer, &self.config.default_export_name)?;
        Some(ExportedFile {
            file_name,
            content: self.export_svg(),
        })
    }

    /// Like [`export`](Self::export), then starts a new project once the
    /// export went through. A dismissed prompt changes nothing.
    pub fn export_and_reset(&mut self, prompt_answer: Option<&str>) -> Option<ExportedFile> {
        let file = self.export(prompt_answer)?;
        self.new_project();
        Some(file)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{LEGACY_KEY, MemoryStore};

    fn session() -> EditorSession<MemoryStore> {
        EditorSession::start(
            IconCatalog::builtin(),
            ComposerConfig::default(),
            ProjectStore::new(MemoryStore::new()),
        )
    }

    /// A session with no layers, as if starting from empty storage and
    /// removing the initial layer.
    fn empty_session() -> EditorSession<MemoryStore> {
        let mut session = session();
        session.delete_selected();
        assert!(session.layers().is_empty());
        session
    }

    fn z_of(session: &EditorSession<MemoryStore>, id: &str) -> i64 {
        session.layer(id).unwrap().z_index
    }

    #[test]
    fn export_names() {
        assert_eq!(export_file_name(None, "mvp-icon"), None);
        assert_eq!(export_file_name(Some(""), "mvp-icon"), None);
        assert_eq!(export_file_name(Some("   "), "mvp-icon").as_deref(), Some("mvp-icon.svg"));
        assert_eq!(export_file_name(Some(" logo "), "mvp-icon").as_deref(), Some("logo.svg"));
        assert_eq!(export_file_name(Some("Logo.SVG"), "mvp-icon").as_deref(), Some("Logo.SVG"));
        assert_eq!(export_file_name(Some("a.svg.txt"), "x").as_deref(), Some("a.svg.txt.svg"));
    }

    #[test]
    fn fresh_start_has_one_default_layer() {
        let session = session();
        assert_eq!(session.layers().len(), 1);

        let layer = &session.layers()[0];
        assert_eq!(layer.icon_id, "square");
        assert_eq!(layer.scale, 10.0);
        assert_eq!((layer.x, layer.y), (256.0, 256.0));
        assert_eq!(layer.z_index, 0);
        assert_eq!(session.selection(), Some(layer.id.as_str()));
        assert_eq!(session.project_name(), UNTITLED_PROJECT_NAME);
        assert!(session.is_dirty());
    }

    #[test]
    fn editing_scenario() {
        let mut session = empty_session();

        let square = session.add_layer("square");
        assert_eq!(session.layers().len(), 1);
        assert_eq!(z_of(&session, &square), 0);
        assert_eq!(session.selection(), Some(square.as_str()));
        assert_eq!(session.selected_layer().unwrap().scale, 4.0);

        let circle = session.add_layer("circle");
        assert_eq!(session.layers().len(), 2);
        assert_eq!(z_of(&session, &circle), 1);
        assert_eq!(session.selection(), Some(circle.as_str()));

        assert!(session.duplicate_selected());
        assert_eq!(session.layers().len(), 3);
        let duplicate = session.selection().unwrap().to_string();
        let copy = session.layer(&duplicate).unwrap();
        assert_eq!((copy.x, copy.y), (276.0, 276.0));
        assert_eq!(copy.z_index, 2);
        assert_eq!(copy.icon_id, "circle");

        assert!(session.move_selected(ReorderDirection::Down));
        assert_eq!(z_of(&session, &duplicate), 1);
        assert_eq!(z_of(&session, &circle), 2);
        assert_eq!(z_of(&session, &square), 0);

        assert!(session.delete_selected());
        assert_eq!(session.layers().len(), 2);
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn tied_layers_keep_paint_order_through_edits() {
        let mut session = empty_session();
        let config = ComposerConfig::default();
        let tied: Vec<String> = ["square", "circle", "star"]
            .into_iter()
            .map(|icon| {
                let layer = Layer::new(icon, 4.0, 0, &config);
                let id = layer.id.clone();
                session.layers.push(layer);
                id
            })
            .collect();

        let tied_order = |session: &EditorSession<MemoryStore>| -> Vec<String> {
            crate::layer::paint_order(session.layers())
                .into_iter()
                .filter(|l| tied.contains(&l.id))
                .map(|l| l.id.clone())
                .collect()
        };
        assert_eq!(tied_order(&session), tied);

        let extra = session.add_layer("heart");
        session.update_selected(&LayerPatch::new().with_color("#ff0000").with_rotate(30.0));
        session.duplicate_selected();
        session.select(&tied[1]);
        session.update_selected(&LayerPatch::new().with_opacity(0.5));
        session.select(&extra);
        session.delete_selected();

        assert_eq!(session.layers().len(), 4);
        assert_eq!(tied_order(&session), tied);
        assert!(tied.iter().all(|id| z_of(&session, id) == 0));
    }

    #[test]
    fn commands_without_selection_are_noops() {
        let mut session = session();
        session.clear_selection();
        let before = session.layers().to_vec();

        assert!(!session.update_selected(&LayerPatch::new().with_scale(2.0)));
        assert!(!session.delete_selected());
        assert!(!session.duplicate_selected());
        assert!(!session.move_selected(ReorderDirection::Up));
        assert_eq!(session.layers(), before.as_slice());
    }

    #[test]
    fn update_touches_only_selected_layer() {
        let mut session = empty_session();
        let first = session.add_layer("square");
        let second = session.add_layer("circle");

        session.update_selected(&LayerPatch::new().with_rotate(45.0).with_opacity(0.25));

        assert_eq!(session.layer(&second).unwrap().rotate, 45.0);
        assert_eq!(session.layer(&second).unwrap().opacity, 0.25);
        assert_eq!(session.layer(&first).unwrap().rotate, 0.0);
    }

    #[test]
    fn reorder_at_ends_is_noop() {
        let mut session = empty_session();
        let bottom = session.add_layer("square");
        let top = session.add_layer("circle");

        assert!(!session.move_selected(ReorderDirection::Up));
        session.select(&bottom);
        assert!(!session.move_selected(ReorderDirection::Down));
        assert_eq!(z_of(&session, &bottom), 0);
        assert_eq!(z_of(&session, &top), 1);
    }

    #[test]
    fn select_rejects_unknown_ids() {
        let mut session = session();
        let current = session.selection().map(str::to_string);
        assert!(!session.select("nope"));
        assert_eq!(session.selection().map(str::to_string), current);
    }

    #[test]
    fn select_at_picks_topmost_layer() {
        let mut session = session();
        let small = session.add_layer("circle");
        let big = session.layers()[0].id.clone();
        session.clear_selection();

        assert!(session.select_at((256.0, 256.0)));
        assert_eq!(session.selection(), Some(small.as_str()));

        assert!(session.select_at((150.0, 150.0)));
        assert_eq!(session.selection(), Some(big.as_str()));

        assert!(!session.select_at((1.0, 1.0)));
        assert_eq!(session.selection(), Some(big.as_str()));
    }

    #[test]
    fn settle_saves_once_per_cycle() {
        let mut session = session();
        assert!(session.settle().is_some());
        assert!(!session.is_dirty());
        assert!(session.settle().is_none());

        session.add_layer("star");
        session.update_selected(&LayerPatch::new().with_color("#ff0000"));
        let saved = session.settle().unwrap();
        assert_eq!(saved.layers.len(), 2);
        assert_eq!(saved.layers[1].color, "#ff0000");
        assert_eq!(session.store().last_used_id().as_deref(), Some(session.project_id()));
    }

    #[test]
    fn restart_resumes_last_project() {
        let mut session = session();
        session.add_layer("heart");
        session.rename_project("Valentine");
        session.settle();
        let id = session.project_id().to_string();
        let layers = session.layers().to_vec();

        let provider = session.store.into_inner();
        let resumed = EditorSession::start(
            IconCatalog::builtin(),
            ComposerConfig::default(),
            ProjectStore::new(provider),
        );

        assert_eq!(resumed.project_id(), id);
        assert_eq!(resumed.project_name(), "Valentine");
        assert_eq!(resumed.layers(), layers.as_slice());
        assert_eq!(resumed.selection(), layers.last().map(|l| l.id.as_str()));
        assert!(!resumed.is_dirty());
    }

    #[test]
    fn start_migrates_legacy_layers() {
        let config = ComposerConfig::default();
        let legacy = vec![Layer::new("moon", 4.0, 0, &config)];
        let mut provider = MemoryStore::new();
        provider
            .set(LEGACY_KEY, &serde_json::to_string(&legacy).unwrap())
            .unwrap();

        let session = EditorSession::start(IconCatalog::builtin(), config, ProjectStore::new(provider));

        assert_eq!(session.project_name(), "Restored Project");
        assert_eq!(session.layers(), legacy.as_slice());
        assert_eq!(session.store().list().len(), 1);
    }

    #[test]
    fn new_project_replaces_identity() {
        let mut session = session();
        session.settle();
        let old_id = session.project_id().to_string();
        session.add_layer("sun");

        session.new_project();
        assert_ne!(session.project_id(), old_id);
        assert_eq!(session.layers().len(), 1);
        assert_eq!(session.layers()[0].icon_id, "square");
        assert_eq!(session.project_name(), UNTITLED_PROJECT_NAME);
    }

    #[test]
    fn rename_blank_resets_name() {
        let mut session = session();
        session.rename_project("  Logo  ");
        assert_eq!(session.project_name(), "Logo");
        session.rename_project("   ");
        assert_eq!(session.project_name(), UNTITLED_PROJECT_NAME);
    }

    #[test]
    fn open_and_delete_projects() {
        let mut session = session();
        session.rename_project("First");
        session.settle();
        let first = session.project_id().to_string();

        session.new_project();
        session.add_layer("zap");
        session.settle();
        let second = session.project_id().to_string();

        assert!(session.open_project(&first));
        assert_eq!(session.project_name(), "First");
        assert!(!session.open_project("missing"));

        session.delete_project(&second).unwrap();
        assert_eq!(session.project_id(), first);
        assert_eq!(session.projects().len(), 1);

        session.delete_project(&first).unwrap();
        assert_ne!(session.project_id(), first);
        assert!(session.projects().is_empty());
    }

    #[test]
    fn export_respects_cancellation_and_ignores_selection() {
        let mut session = session();
        assert!(session.export(None).is_none());
        assert!(session.export(Some("")).is_none());

        let selected = session.export(Some("badge")).unwrap();
        session.clear_selection();
        let unselected = session.export(Some("badge")).unwrap();

        assert_eq!(selected.file_name, "badge.svg");
        assert_eq!(selected, unselected);
    }

    #[test]
    fn export_and_reset_starts_fresh_project() {
        let mut session = session();
        session.add_layer("moon");
        session.settle();
        let exported_id = session.project_id().to_string();
        let expected = session.export_svg();

        assert!(session.export_and_reset(None).is_none());
        assert_eq!(session.project_id(), exported_id);

        let file = session.export_and_reset(Some("night")).unwrap();
        assert_eq!(file.file_name, "night.svg");
        assert_eq!(file.content, expected);
        assert_ne!(session.project_id(), exported_id);
        assert_eq!(session.layers().len(), 1);
        assert!(session.store().get(&exported_id).is_some());
    }

    #[test]
    fn exported_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let session = session();
        let file = session.export(Some("out")).unwrap();

        let path = file.write_to(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("out.svg"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), session.export_svg());
    }
}
