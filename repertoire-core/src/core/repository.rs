//! Loading and saving app state and studies through a [`KeyValueStore`].
//!
//! Storage keys and the schema version are configuration, passed in through
//! [`RepositoryConfig`], so several independent repositories can coexist.

use crate::{
    deserialize_app_state, migrate_legacy_pgn, serialize_app_state, AppState, KeyValueStore,
    Migration, Result, Study, SCHEMA_VERSION,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Key the app state is stored under by default.
pub const DEFAULT_STORAGE_KEY: &str = "repertoire.appState";

/// Key the study list is stored under by default.
pub const DEFAULT_STUDIES_KEY: &str = "repertoire.studies";

/// Key of the pre-study single-PGN data.
pub const DEFAULT_LEGACY_PGN_KEY: &str = "repertoire.legacyPgn";

/// Where a [`Repository`] keeps its data and which schema it reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepositoryConfig {
    pub storage_key: String,
    pub studies_key: String,
    pub legacy_pgn_key: String,
    pub schema_version: u32,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            studies_key: DEFAULT_STUDIES_KEY.to_string(),
            legacy_pgn_key: DEFAULT_LEGACY_PGN_KEY.to_string(),
            schema_version: SCHEMA_VERSION,
        }
    }
}

/// Serializes `state` and stores it under `key`.
///
/// # Errors
///
/// Propagates serialization and store failures.
pub fn save_to_storage<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    state: &AppState,
) -> Result<()> {
    store.set_item(key, &serialize_app_state(state)?)
}

/// Loads the state stored under `key`; a missing key yields an empty state.
///
/// # Errors
///
/// Propagates store failures and every [`deserialize_app_state`] error.
pub fn load_from_storage<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
    schema_version: u32,
) -> Result<AppState> {
    match store.get_item(key)? {
        Some(text) => deserialize_app_state(&text, schema_version),
        None => {
            debug!("No saved state under {key}; starting empty");
            Ok(AppState::with_schema_version(schema_version))
        }
    }
}

/// App state and study persistence over one store.
pub struct Repository<S: KeyValueStore> {
    store: S,
    config: RepositoryConfig,
}

impl<S: KeyValueStore> Repository<S> {
    pub fn new(store: S, config: RepositoryConfig) -> Self {
        Self { store, config }
    }

    /// A repository using the default keys and the current schema version.
    pub fn with_defaults(store: S) -> Self {
        Self::new(store, RepositoryConfig::default())
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// An empty state tagged with the configured schema version.
    pub fn empty_state(&self) -> AppState {
        AppState::with_schema_version(self.config.schema_version)
    }

    pub fn load(&self) -> Result<AppState> {
        load_from_storage(&self.store, &self.config.storage_key, self.config.schema_version)
    }

    /// Stores `state`, re-tagged with the configured schema version.
    pub fn save(&mut self, state: &AppState) -> Result<()> {
        if state.schema_version == self.config.schema_version {
            return save_to_storage(&mut self.store, &self.config.storage_key, state);
        }
        let mut tagged = state.clone();
        tagged.schema_version = self.config.schema_version;
        save_to_storage(&mut self.store, &self.config.storage_key, &tagged)
    }

    /// Loads the study list, migrating legacy single-PGN data the first time.
    ///
    /// A migrated list is written back immediately so that the migration
    /// does not run again.
    pub fn load_studies(&mut self) -> Result<Migration> {
        let existing: Vec<Study> = match self.store.get_item(&self.config.studies_key)? {
            Some(text) => serde_json::from_str(&text)?,
            None => Vec::new(),
        };
        let legacy = if existing.is_empty() {
            self.store.get_item(&self.config.legacy_pgn_key)?
        } else {
            None
        };

        let migration = migrate_legacy_pgn(legacy.as_deref(), existing);
        if migration.migrated {
            info!("Migrated legacy PGN into study list");
            self.save_studies(&migration.studies)?;
        }
        Ok(migration)
    }

    pub fn save_studies(&mut self, studies: &[Study]) -> Result<()> {
        let text = serde_json::to_string(studies)?;
        self.store.set_item(&self.config.studies_key, &text)
    }
}
