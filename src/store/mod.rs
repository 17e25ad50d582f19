//! Project persistence.
//!
//! [`ProjectStore`] keeps named compositions in a string key-value provider
//! (anything implementing [`KeyValueStore`]) using three JSON records:
//!
//! | key                    | value                                   |
//! |------------------------|-----------------------------------------|
//! | `mvp-projects`         | array of [`Project`]                    |
//! | `mvp-last-project-id`  | id of the most recently saved project   |
//! | `mvp-layers`           | legacy bare layer array, read once      |
//!
//! Reads never fail: a missing or unparseable record is logged and treated
//! as empty. Writes replace whole records.

pub mod file;

pub use file::FileStore;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::id::generate_id;
use crate::layer::Layer;

pub const PROJECTS_KEY: &str = "mvp-projects";
pub const LAST_PROJECT_KEY: &str = "mvp-last-project-id";
pub const LEGACY_KEY: &str = "mvp-layers";

/// Name given to projects that have not been renamed.
pub const UNTITLED_PROJECT_NAME: &str = "Untitled Project";

/// Name given to a project recovered from the legacy record.
pub const RESTORED_PROJECT_NAME: &str = "Restored Project";

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// ============================================================================
// KeyValueStore
// ============================================================================

/// A synchronous string key-value provider.
pub trait KeyValueStore {
    /// Reads a record, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces a record.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Deletes a record. Absent keys are not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory provider.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the provider with existing records.
    pub fn from_records(records: HashMap<String, String>) -> Self {
        Self { records }
    }

    /// All records, for hosts that persist the provider themselves.
    pub fn records(&self) -> &HashMap<String, String> {
        &self.records
    }

    /// All records as one `{ "key": "value" }` JSON object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.records)?)
    }

    /// Restores records written by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_records(serde_json::from_str(json)?))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.records.remove(key);
        Ok(())
    }
}

// ============================================================================
// Project
// ============================================================================

/// A named, persisted composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify), tsify(into_wasm_abi, from_wasm_abi))]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Milliseconds since the Unix epoch of the last save.
    pub updated_at: i64,
    pub layers: Vec<Layer>,
}

impl Project {
    /// Creates a project with a fresh identifier.
    pub fn new(name: impl Into<String>, layers: Vec<Layer>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            updated_at: now_millis(),
            layers,
        }
    }

    /// Creates an "Untitled Project".
    pub fn untitled(layers: Vec<Layer>) -> Self {
        Self::new(UNTITLED_PROJECT_NAME, layers)
    }
}

// ============================================================================
// ProjectStore
// ============================================================================

/// Project persistence on top of a [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct ProjectStore<S> {
    provider: S,
}

impl<S: KeyValueStore> ProjectStore<S> {
    pub fn new(provider: S) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &S {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut S {
        &mut self.provider
    }

    pub fn into_inner(self) -> S {
        self.provider
    }

    /// All projects in storage order.
    ///
    /// Missing, unreadable or unparseable data yields an empty list.
    pub fn list(&self) -> Vec<Project> {
        self.read_projects().unwrap_or_else(|e| {
            log::error!("Failed to read projects: {e}");
            Vec::new()
        })
    }

    /// Reads the project record for a read-modify-write.
    ///
    /// Provider failures are returned so a write never replaces records it
    /// could not see. An unparseable record is logged and read as empty.
    fn read_projects(&self) -> Result<Vec<Project>> {
        let Some(raw) = self.provider.get(PROJECTS_KEY)? else {
            return Ok(Vec::new());
        };

        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::error!("Failed to parse projects: {e}");
            Vec::new()
        }))
    }

    /// Projects sorted by `updated_at`, newest first.
    pub fn list_recent(&self) -> Vec<Project> {
        let mut projects = self.list();
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        projects
    }

    /// Finds a project by identifier.
    pub fn get(&self, id: &str) -> Option<Project> {
        self.list().into_iter().find(|p| p.id == id)
    }

    /// Inserts or replaces a project and marks it as last used.
    ///
    /// `updated_at` is stamped with the current time, ignoring the value on
    /// `project`. When a stored copy already carries a time at or after now,
    /// the stamp moves one millisecond past it so it never goes backwards.
    /// Returns the project as stored.
    pub fn save(&mut self, project: &Project) -> Result<Project> {
        let mut projects = self.read_projects()?;
        let mut stamped = project.clone();
        stamped.updated_at = now_millis();

        match projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => {
                stamped.updated_at = stamped.updated_at.max(existing.updated_at + 1);
                *existing = stamped.clone();
            }
            None => projects.push(stamped.clone()),
        }

        self.provider
            .set(PROJECTS_KEY, &serde_json::to_string(&projects)?)?;
        self.provider.set(LAST_PROJECT_KEY, &project.id)?;

        log::debug!(
            "Saved project {} ({} layers)",
            stamped.id,
            stamped.layers.len()
        );
        Ok(stamped)
    }

    /// Removes a project. Unknown identifiers are a no-op.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let mut projects = self.read_projects()?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Ok(());
        }

        self.provider
            .set(PROJECTS_KEY, &serde_json::to_string(&projects)?)?;
        log::debug!("Deleted project {id}");
        Ok(())
    }

    /// Identifier of the most recently saved project.
    pub fn last_used_id(&self) -> Option<String> {
        match self.provider.get(LAST_PROJECT_KEY) {
            Ok(id) => id.filter(|id| !id.is_empty()),
            Err(e) => {
                log::error!("Failed to read last project id: {e}");
                None
            }
        }
    }

    /// Wraps a non-empty legacy layer record into a "Restored Project".
    ///
    /// On success the project is saved (becoming last used), the legacy
    /// record is removed and the project is returned. A missing, empty or
    /// unparseable legacy record leaves storage untouched and returns
    /// `None`, so calling this on every startup is safe.
    pub fn migrate_legacy(&mut self) -> Option<Project> {
        let raw = match self.provider.get(LEGACY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::error!("Failed to read legacy layers: {e}");
                return None;
            }
        };

        let layers: Vec<Layer> = match serde_json::from_str(&raw) {
            Ok(layers) => layers,
            Err(e) => {
                log::error!("Failed to migrate legacy project: {e}");
                return None;
            }
        };
        if layers.is_empty() {
            return None;
        }

        let project = match self.save(&Project::new(RESTORED_PROJECT_NAME, layers)) {
            Ok(project) => project,
            Err(e) => {
                log::error!("Failed to save migrated project: {e}");
                return None;
            }
        };

        if let Err(e) = self.provider.remove(LEGACY_KEY) {
            log::warn!("Failed to remove legacy layers after migration: {e}");
        }

        log::info!(
            "Migrated {} legacy layers into project {}",
            project.layers.len(),
            project.id
        );
        Some(project)
    }
}

// ============================================================================
// Tests
// ============================================================================
