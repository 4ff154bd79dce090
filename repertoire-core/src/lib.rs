//! Core library for Repertoire — a local-first chess opening trainer.
//!
//! The library holds the parts of the trainer with real invariants: the
//! branching [`Node`] tree of a repertoire and the [`TreeSession`] cursor
//! that edits it, the flat [`Timeline`] used by single-line editing, the
//! drill controller ([`handle_drill_move`]) and the schema-versioned
//! persistence of [`AppState`] through a [`Repository`].
//!
//! Chess rules are not implemented here. Legality and notation come from an
//! external engine behind [`MoveValidator`].
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use crate::core::{
    app_state::{deserialize_app_state, serialize_app_state, AppState, SCHEMA_VERSION},
    chess_move::{same_move, AppliedMove, Color, Move, PromotionPiece, Square},
    error::{RepertoireError, Result},
    opening::{create_opening, Opening},
    pgn::pgn_has_fen_header,
    position::{create_position_index, position_key_from_fen, PositionIndex},
    repository::{
        load_from_storage, save_to_storage, Repository, RepositoryConfig, DEFAULT_LEGACY_PGN_KEY,
        DEFAULT_STORAGE_KEY, DEFAULT_STUDIES_KEY,
    },
    session::{SessionFailure, TreeSession, VariationStep},
    storage::{KeyValueStore, MemoryStore, SqliteStore},
    study::{
        create_study, migrate_legacy_pgn, pick_study, upsert_study, Migration, Study, StudyUpdate,
        DEFAULT_STUDY_NAME, MIGRATED_STUDY_NAME,
    },
    timeline::{
        apply_commit, apply_edit_in_past, apply_jump, branch_line_if_needed, clamp_ply,
        compute_last_move, next_view_ply, Branch, Commit, LineView, Timeline,
    },
    training::{
        auto_play_opponent, drill_tree_move, expected_move, handle_drill_move, is_users_turn,
        DrillHost, DrillOutcome, TreeDrillOutcome,
    },
    tree::{
        add_variation, build_tree_from_line, create_node, create_root, find_child_by_move, Node,
        NodePath,
    },
    validator::{import_line, MoveValidator, TimelineDrill},
};
