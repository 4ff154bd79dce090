//! Named opening records: a repertoire tree plus the side it is trained as.

use crate::{Color, Move, Node, RepertoireError, Result, TreeSession};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One opening in the user's repertoire.
///
/// `last_path` is the persisted editing cursor, as moves from the root, so
/// that switching back to an opening resumes where the user left off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opening {
    pub id: String,
    pub name: String,
    pub train_as: Color,
    #[serde(default)]
    pub root: Node,
    #[serde(default)]
    pub last_path: Vec<Move>,
}

/// Creates an opening with a fresh id and an empty tree.
///
/// # Errors
///
/// Returns [`RepertoireError::ValidationFailed`] if `name` is blank after
/// trimming, or if `train_as` is not exactly `"white"` or `"black"`.
pub fn create_opening(name: &str, train_as: &str) -> Result<Opening> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RepertoireError::ValidationFailed(
            "Opening name is required".to_string(),
        ));
    }
    let train_as: Color = train_as.parse()?;
    Ok(Opening {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        train_as,
        root: Node::root(),
        last_path: Vec::new(),
    })
}

impl Opening {
    /// Opens an editing session on a copy of this opening's tree, with the
    /// cursor restored from `last_path` as far as the tree still allows.
    ///
    /// Edits made in the session stay in the session until they are written
    /// back with [`store_session`](Self::store_session) or
    /// [`AppState::update_opening_tree`](crate::AppState::update_opening_tree).
    pub fn session(&self) -> TreeSession {
        let mut session = TreeSession::new(Some(self.root.clone()));
        session.restore_path(&self.last_path);
        session
    }

    /// Copies the tree and cursor of `session` back into this opening.
    pub fn store_session(&mut self, session: &TreeSession) {
        self.root = session.root().clone();
        self.last_path = session.path_moves();
    }
}
