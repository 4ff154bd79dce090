//! Cursor-based navigation and editing over a move tree.
//!
//! A [`TreeSession`] owns the tree it edits together with the path from the
//! root to the current node. Browsing (`go_back`, `go_forward_if_exists`,
//! `reset_to_root`) only moves the cursor. The two structural edits are
//! [`add_variation_and_go`](TreeSession::add_variation_and_go) and
//! [`delete_current_and_go_parent`](TreeSession::delete_current_and_go_parent);
//! nothing else touches a node's children.
//!
//! Rejections are ordinary values of [`SessionFailure`], not errors: pressing
//! "back" at the root is an everyday event.
//!
//! ```rust
//! use repertoire_core::{SessionFailure, TreeSession};
//!
//! let mut session = TreeSession::new(None);
//! assert_eq!(session.go_back(), Err(SessionFailure::AtRoot));
//!
//! let step = session.add_variation_and_go("e2e4".parse().unwrap());
//! assert!(step.created);
//! assert_eq!(session.ply(), 1);
//! ```

use crate::core::tree::{add_variation, find_child_by_move};
use crate::{Move, Node, NodePath};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a session navigation or deletion was refused. The session is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionFailure {
    /// The cursor is already at the root.
    #[error("at-root")]
    AtRoot,
    /// The current node has no child reached by the requested move.
    #[error("no-such-child")]
    NoSuchChild,
    /// Only leaves may be deleted; this node still has children.
    #[error("has-children")]
    HasChildren,
    /// The cursor no longer resolves to a child of its parent.
    #[error("not-a-child")]
    NotAChild,
}

/// Outcome of [`TreeSession::add_variation_and_go`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationStep {
    /// `false` when an existing equal child was followed instead.
    pub created: bool,
    /// Where the cursor now points.
    pub path: NodePath,
}

/// A move tree plus a cursor into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSession {
    root: Node,
    path: NodePath,
}

impl Default for TreeSession {
    fn default() -> Self {
        Self::new(None)
    }
}

impl TreeSession {
    /// Opens a session on `root`, or on a fresh empty root. The cursor starts at the root.
    pub fn new(root: Option<Node>) -> Self {
        Self {
            root: root.unwrap_or_default(),
            path: NodePath::root(),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Consumes the session and hands the (possibly edited) tree back.
    pub fn into_root(self) -> Node {
        self.root
    }

    /// The node under the cursor.
    pub fn current_node(&self) -> &Node {
        self.root.get(&self.path).unwrap_or(&self.root)
    }

    pub fn current_path(&self) -> &NodePath {
        &self.path
    }

    /// Number of moves between the root and the cursor.
    pub fn ply(&self) -> usize {
        self.path.depth()
    }

    pub fn is_at_root(&self) -> bool {
        self.path.is_root()
    }

    pub fn go_back(&mut self) -> Result<(), SessionFailure> {
        self.path.pop().map(|_| ()).ok_or(SessionFailure::AtRoot)
    }

    /// Steps into the child reached by `mv`, if the tree already has it.
    pub fn go_forward_if_exists(&mut self, mv: &Move) -> Result<&Node, SessionFailure> {
        let idx = find_child_by_move(self.current_node(), mv).ok_or(SessionFailure::NoSuchChild)?;
        self.path.push(idx);
        Ok(self.current_node())
    }

    /// Whether the current node has a child reached by `mv`.
    pub fn is_expected_move(&self, mv: &Move) -> bool {
        find_child_by_move(self.current_node(), mv).is_some()
    }

    pub fn reset_to_root(&mut self) {
        self.path = NodePath::root();
    }

    /// Follows the child reached by `mv`, creating it first if it does not exist.
    pub fn add_variation_and_go(&mut self, mv: Move) -> VariationStep {
        let node = self.root.descend_mut(&self.path);
        let (idx, created) = match find_child_by_move(node, &mv) {
            Some(idx) => (idx, false),
            None => (add_variation(node, mv), true),
        };
        self.path.push(idx);
        VariationStep {
            created,
            path: self.path.clone(),
        }
    }

    /// Removes the current leaf from its parent and moves the cursor to the parent.
    ///
    /// Nodes with children are refused so that no subtree is orphaned. The
    /// removal is permanent.
    pub fn delete_current_and_go_parent(&mut self) -> Result<(), SessionFailure> {
        if self.path.is_root() {
            return Err(SessionFailure::AtRoot);
        }
        let current = self.root.get(&self.path).ok_or(SessionFailure::NotAChild)?;
        if !current.is_leaf() {
            return Err(SessionFailure::HasChildren);
        }

        let mut parent_path = self.path.clone();
        let idx = parent_path.pop().ok_or(SessionFailure::AtRoot)?;
        self.root
            .get_mut(&parent_path)
            .and_then(|parent| parent.remove_child(idx))
            .ok_or(SessionFailure::NotAChild)?;
        self.path = parent_path;
        Ok(())
    }

    /// The moves from the root to the cursor; persisted as an opening's `lastPath`.
    pub fn path_moves(&self) -> Vec<Move> {
        self.root.moves_along(&self.path).unwrap_or_default()
    }

    /// Resets to the root and replays `moves` for as long as the tree has them.
    ///
    /// Returns how many moves were followed. A stale saved cursor therefore
    /// lands on the deepest node that still exists.
    pub fn restore_path(&mut self, moves: &[Move]) -> usize {
        self.reset_to_root();
        moves
            .iter()
            .take_while(|mv| self.go_forward_if_exists(mv).is_ok())
            .count()
    }
}
