//! The persisted application state and its schema-versioned JSON form.
//!
//! ## Format
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "openings": [
//!     { "id": "…", "name": "Ruy Lopez", "trainAs": "white",
//!       "root": { "move": null, "children": [ … ] },
//!       "lastPath": [ { "from": "e2", "to": "e4" } ] }
//!   ],
//!   "activeOpeningId": "…"
//! }
//! ```
//!
//! A wrong `schemaVersion` or a payload that is not an object with an
//! `openings` array is an error. Smaller inconsistencies are repaired on
//! load: missing `children` arrays become empty, repeated opening ids keep
//! their first occurrence, and a dangling `activeOpeningId` becomes `null`.

use crate::{Opening, RepertoireError, Result, TreeSession};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// All openings plus which one is being edited or drilled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub schema_version: u32,
    pub openings: Vec<Opening>,
    pub active_opening_id: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_schema_version(SCHEMA_VERSION)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty state tagged with `schema_version`.
    pub fn with_schema_version(schema_version: u32) -> Self {
        Self {
            schema_version,
            openings: Vec::new(),
            active_opening_id: None,
        }
    }

    pub fn opening(&self, id: &str) -> Option<&Opening> {
        self.openings.iter().find(|opening| opening.id == id)
    }

    pub fn opening_mut(&mut self, id: &str) -> Option<&mut Opening> {
        self.openings.iter_mut().find(|opening| opening.id == id)
    }

    pub fn active_opening(&self) -> Option<&Opening> {
        self.active_opening_id.as_deref().and_then(|id| self.opening(id))
    }

    /// Adds `opening` at the end of the list.
    ///
    /// # Errors
    ///
    /// Returns [`RepertoireError::ValidationFailed`] if an opening with the same id exists.
    pub fn add_opening(&mut self, opening: Opening) -> Result<()> {
        if self.opening(&opening.id).is_some() {
            return Err(RepertoireError::ValidationFailed(format!(
                "Duplicate opening id: {}",
                opening.id
            )));
        }
        self.openings.push(opening);
        Ok(())
    }

    /// Removes the opening with `id` and returns it.
    ///
    /// If it was active, the first remaining opening (or none) becomes active.
    ///
    /// # Errors
    ///
    /// Returns [`RepertoireError::OpeningNotFound`] if there is no such opening.
    pub fn delete_opening(&mut self, id: &str) -> Result<Opening> {
        let idx = self
            .openings
            .iter()
            .position(|opening| opening.id == id)
            .ok_or_else(|| RepertoireError::OpeningNotFound(id.to_string()))?;
        let removed = self.openings.remove(idx);
        if self.active_opening_id.as_deref() == Some(id) {
            self.active_opening_id = self.openings.first().map(|opening| opening.id.clone());
        }
        Ok(removed)
    }

    /// Makes `id` the active opening, or clears the selection with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`RepertoireError::OpeningNotFound`] if `id` does not exist.
    pub fn set_active_opening(&mut self, id: Option<&str>) -> Result<()> {
        if let Some(id) = id {
            if self.opening(id).is_none() {
                return Err(RepertoireError::OpeningNotFound(id.to_string()));
            }
        }
        self.active_opening_id = id.map(str::to_string);
        Ok(())
    }

    /// Writes the tree and cursor of `session` into the opening with `id`.
    ///
    /// Sessions edit a copy of the tree, so this must run before
    /// [`Repository::save`](crate::Repository::save) for the edits to be persisted.
    ///
    /// # Errors
    ///
    /// Returns [`RepertoireError::OpeningNotFound`] if `id` does not exist.
    pub fn update_opening_tree(&mut self, id: &str, session: &TreeSession) -> Result<()> {
        let opening = self
            .opening_mut(id)
            .ok_or_else(|| RepertoireError::OpeningNotFound(id.to_string()))?;
        opening.store_session(session);
        Ok(())
    }

    /// Saves `session` into the active opening (if any), activates `id` and
    /// returns a session on it with its saved cursor restored.
    ///
    /// # Errors
    ///
    /// Returns [`RepertoireError::OpeningNotFound`] if `id` does not exist;
    /// nothing is changed in that case.
    pub fn switch_opening(&mut self, id: &str, session: &TreeSession) -> Result<TreeSession> {
        let next = self
            .opening(id)
            .ok_or_else(|| RepertoireError::OpeningNotFound(id.to_string()))?
            .id
            .clone();
        if let Some(active) = self.active_opening_id.clone() {
            self.update_opening_tree(&active, session)?;
        }
        self.active_opening_id = Some(next);
        Ok(self
            .active_opening()
            .map(Opening::session)
            .unwrap_or_default())
    }
}

/// Serializes `state` to its JSON form, tagged with `state.schema_version`.
///
/// # Errors
///
/// Returns [`RepertoireError::Json`] if serialization fails.
pub fn serialize_app_state(state: &AppState) -> Result<String> {
    Ok(serde_json::to_string(state)?)
}

/// Parses a persisted app state written with schema `expected_version`.
///
/// # Errors
///
/// - [`RepertoireError::Json`] if `text` is not JSON or an opening is malformed.
/// - [`RepertoireError::InvalidPayload`] if the payload is not an object.
/// - [`RepertoireError::SchemaVersion`] if `schemaVersion` is missing or differs.
/// - [`RepertoireError::InvalidPayload`] if `openings` is not an array.
pub fn deserialize_app_state(text: &str, expected_version: u32) -> Result<AppState> {
    let value: Value = serde_json::from_str(text)?;
    let object = value
        .as_object()
        .ok_or_else(|| RepertoireError::InvalidPayload("expected a JSON object".to_string()))?;

    let found = object.get("schemaVersion").and_then(Value::as_i64);
    if found != Some(i64::from(expected_version)) {
        return Err(RepertoireError::SchemaVersion {
            found,
            expected: expected_version,
        });
    }

    let raw_openings = object
        .get("openings")
        .and_then(Value::as_array)
        .ok_or_else(|| RepertoireError::InvalidPayload("openings must be an array".to_string()))?;

    let mut seen = HashSet::new();
    let mut openings = Vec::with_capacity(raw_openings.len());
    for raw in raw_openings {
        let opening: Opening = serde_json::from_value(raw.clone())?;
        if seen.insert(opening.id.clone()) {
            openings.push(opening);
        } else {
            debug!("Dropping repeated opening id {}", opening.id);
        }
    }

    let mut active_opening_id = object
        .get("activeOpeningId")
        .and_then(Value::as_str)
        .map(str::to_string);
    if let Some(id) = &active_opening_id {
        if !seen.contains(id) {
            debug!("Active opening {id} no longer exists; clearing selection");
            active_opening_id = None;
        }
    }

    Ok(AppState {
        schema_version: expected_version,
        openings,
        active_opening_id,
    })
}
