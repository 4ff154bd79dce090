//! The simple study record, and migration from the single-PGN legacy format.
//!
//! Studies predate the opening tree: each one is a name, a side and an
//! optional PGN. Updates go through [`StudyUpdate`], which names every field
//! it changes; fields left unset keep their current value.

use crate::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to a study created with a blank name.
pub const DEFAULT_STUDY_NAME: &str = "New opening";

/// Name of the study synthesized from legacy single-PGN data.
pub const MIGRATED_STUDY_NAME: &str = "Migrated opening";

/// A named study with an optional PGN. Timestamps are Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    pub id: String,
    pub name: String,
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pgn: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn new_study(id: String, name: &str, color: Color, pgn: Option<String>) -> Study {
    let name = name.trim();
    let now = now_millis();
    Study {
        id,
        name: if name.is_empty() { DEFAULT_STUDY_NAME } else { name }.to_string(),
        color,
        pgn,
        created_at: now,
        updated_at: now,
    }
}

/// Creates a study. A blank name becomes [`DEFAULT_STUDY_NAME`]; the color is
/// white unless `color` is exactly `"black"`.
pub fn create_study(name: &str, color: &str) -> Study {
    let color = if color == "black" { Color::Black } else { Color::White };
    new_study(Uuid::new_v4().to_string(), name, color, None)
}

/// An explicit, field-by-field change to a study.
///
/// # Examples
///
/// ```rust
/// use repertoire_core::{create_study, upsert_study, StudyUpdate};
///
/// let study = create_study("Caro-Kann", "black");
/// let list = vec![study.clone()];
/// let list = upsert_study(&list, StudyUpdate::new(&study.id).pgn("1. e4 c6"));
/// assert_eq!(list[0].name, "Caro-Kann");
/// assert_eq!(list[0].pgn.as_deref(), Some("1. e4 c6"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyUpdate {
    pub id: String,
    pub name: Option<String>,
    pub color: Option<Color>,
    pub pgn: Option<Option<String>>,
}

impl StudyUpdate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn pgn(mut self, pgn: impl Into<String>) -> Self {
        self.pgn = Some(Some(pgn.into()));
        self
    }

    pub fn clear_pgn(mut self) -> Self {
        self.pgn = Some(None);
        self
    }

    fn apply_to(self, study: &mut Study) {
        if let Some(name) = self.name {
            study.name = name;
        }
        if let Some(color) = self.color {
            study.color = color;
        }
        if let Some(pgn) = self.pgn {
            study.pgn = pgn;
        }
        study.updated_at = now_millis().max(study.updated_at);
    }

    fn into_study(self) -> Study {
        new_study(
            self.id,
            self.name.as_deref().unwrap_or_default(),
            self.color.unwrap_or_default(),
            self.pgn.flatten(),
        )
    }
}

/// Applies `update` to the study with the same id, or appends a new study
/// built from it. Returns a new list; `list` itself is left as it was.
pub fn upsert_study(list: &[Study], update: StudyUpdate) -> Vec<Study> {
    let mut studies = list.to_vec();
    match studies.iter_mut().find(|study| study.id == update.id) {
        Some(existing) => update.apply_to(existing),
        None => studies.push(update.into_study()),
    }
    studies
}

/// The study with `id`, if any.
pub fn pick_study<'a>(list: &'a [Study], id: &str) -> Option<&'a Study> {
    list.iter().find(|study| study.id == id)
}

/// Result of [`migrate_legacy_pgn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub studies: Vec<Study>,
    pub active_study_id: Option<String>,
    /// Set when a study was synthesized; the caller must persist `studies`
    /// so the migration does not run again.
    pub migrated: bool,
}

/// Turns legacy single-PGN data into a study list.
///
/// Existing studies always win: the legacy PGN is only read when there are
/// none. A missing or blank legacy PGN yields an empty list.
pub fn migrate_legacy_pgn(legacy_pgn: Option<&str>, existing_studies: Vec<Study>) -> Migration {
    if !existing_studies.is_empty() {
        let active_study_id = existing_studies.first().map(|study| study.id.clone());
        return Migration {
            studies: existing_studies,
            active_study_id,
            migrated: false,
        };
    }
    match legacy_pgn.filter(|pgn| !pgn.trim().is_empty()) {
        None => Migration {
            studies: Vec::new(),
            active_study_id: None,
            migrated: false,
        },
        Some(pgn) => {
            let study = new_study(
                Uuid::new_v4().to_string(),
                MIGRATED_STUDY_NAME,
                Color::White,
                Some(pgn.to_string()),
            );
            Migration {
                active_study_id: Some(study.id.clone()),
                studies: vec![study],
                migrated: true,
            }
        }
    }
}
