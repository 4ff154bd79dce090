//! Internal domain modules for the Repertoire core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod app_state;
pub mod chess_move;
pub mod error;
pub mod opening;
pub mod pgn;
pub mod position;
pub mod repository;
pub mod session;
pub mod storage;
pub mod study;
pub mod timeline;
pub mod training;
pub mod tree;
pub mod validator;

#[doc(inline)]
pub use app_state::{deserialize_app_state, serialize_app_state, AppState, SCHEMA_VERSION};
#[doc(inline)]
pub use chess_move::{same_move, AppliedMove, Color, Move, PromotionPiece, Square};
#[doc(inline)]
pub use error::{RepertoireError, Result};
#[doc(inline)]
pub use opening::{create_opening, Opening};
#[doc(inline)]
pub use pgn::pgn_has_fen_header;
#[doc(inline)]
pub use position::{create_position_index, position_key_from_fen, PositionIndex};
#[doc(inline)]
pub use repository::{load_from_storage, save_to_storage, Repository, RepositoryConfig};
#[doc(inline)]
pub use session::{SessionFailure, TreeSession, VariationStep};
#[doc(inline)]
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
#[doc(inline)]
pub use study::{create_study, migrate_legacy_pgn, pick_study, upsert_study, Migration, Study, StudyUpdate};
#[doc(inline)]
pub use timeline::Timeline;
#[doc(inline)]
pub use training::{handle_drill_move, DrillHost, DrillOutcome, TreeDrillOutcome};
#[doc(inline)]
pub use tree::{build_tree_from_line, create_node, create_root, Node, NodePath};
#[doc(inline)]
pub use validator::{MoveValidator, TimelineDrill};
