//! The move tree: a branching repertoire rooted at the initial position.
//!
//! A [`Node`] owns its children by value, so the tree is a strict out-tree
//! with no back-references. Nodes are addressed from the root by a
//! [`NodePath`] of child indices; that handle stands in wherever a caller
//! needs to refer to "this node" without borrowing the tree.
//!
//! The first child of a node is its mainline by convention. Siblings never
//! contain two equal moves: [`TreeSession::add_variation_and_go`](super::session::TreeSession::add_variation_and_go)
//! reuses an existing child instead of inserting a duplicate.

use crate::Move;
use log::debug;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One position in the repertoire, reached by `mv` from its parent.
///
/// The root has no move. Deserialization fills in a missing or `null`
/// `children` array with an empty one, refuses a child without a move, and
/// merges siblings that repeat a move into the first of them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "move", default)]
    mv: Option<Move>,
    #[serde(default, deserialize_with = "children_or_empty")]
    children: Vec<Node>,
}

fn children_or_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Node>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Node>>::deserialize(deserializer)?.unwrap_or_default();
    let mut children: Vec<Node> = Vec::with_capacity(raw.len());
    for child in raw {
        let Some(mv) = child.mv else {
            return Err(D::Error::custom("child node without a move"));
        };
        merge_child(&mut children, mv, child.children);
    }
    Ok(children)
}

fn merge_child(siblings: &mut Vec<Node>, mv: Move, grandchildren: Vec<Node>) {
    match siblings.iter().position(|node| node.mv == Some(mv)) {
        Some(idx) => {
            debug!("Merging repeated sibling move {mv}");
            for grandchild in grandchildren {
                if let Some(next) = grandchild.mv {
                    merge_child(&mut siblings[idx].children, next, grandchild.children);
                }
            }
        }
        None => siblings.push(Node { mv: Some(mv), children: grandchildren }),
    }
}

impl Node {
    /// A root node: no move, no children.
    pub fn root() -> Self {
        Self::default()
    }

    /// A detached node wrapping `mv`.
    pub fn new(mv: Move) -> Self {
        Self { mv: Some(mv), children: Vec::new() }
    }

    /// The move played to reach this node, or `None` for the root.
    pub fn mv(&self) -> Option<&Move> {
        self.mv.as_ref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.mv.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Resolves `path` from this node, or `None` if any step is out of range.
    pub fn get(&self, path: &NodePath) -> Option<&Node> {
        path.indices()
            .iter()
            .try_fold(self, |node, &idx| node.children.get(idx))
    }

    pub(crate) fn get_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        path.indices()
            .iter()
            .try_fold(self, |node, &idx| node.children.get_mut(idx))
    }

    /// Walks `path` as far as it resolves and returns the deepest node reached.
    pub(crate) fn descend_mut(&mut self, path: &NodePath) -> &mut Node {
        let mut node = self;
        for &idx in path.indices() {
            if idx >= node.children.len() {
                break;
            }
            node = &mut node.children[idx];
        }
        node
    }

    /// The moves played along `path`, root-relative.
    pub fn moves_along(&self, path: &NodePath) -> Option<Vec<Move>> {
        let mut node = self;
        let mut moves = Vec::with_capacity(path.depth());
        for &idx in path.indices() {
            node = node.children.get(idx)?;
            moves.extend(node.mv);
        }
        Some(moves)
    }

    /// Follows the first child at every level.
    pub fn mainline(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut node = self;
        while let Some(first) = node.children.first() {
            moves.extend(first.mv);
            node = first;
        }
        moves
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    pub(crate) fn remove_child(&mut self, idx: usize) -> Option<Node> {
        (idx < self.children.len()).then(|| self.children.remove(idx))
    }
}

/// Returns a fresh root: no move, no children.
pub fn create_root() -> Node {
    Node::root()
}

/// Returns a detached node wrapping `mv`.
pub fn create_node(mv: Move) -> Node {
    Node::new(mv)
}

/// Builds a single-branch tree that plays `line` from the root.
///
/// An empty line yields a bare root.
pub fn build_tree_from_line(line: &[Move]) -> Node {
    let mut root = create_root();
    let mut node = &mut root;
    for &mv in line {
        let idx = add_variation(node, mv);
        node = &mut node.children[idx];
    }
    root
}

/// Index of the child of `node` reached by `mv`, if any.
pub fn find_child_by_move(node: &Node, mv: &Move) -> Option<usize> {
    node.children
        .iter()
        .position(|child| child.mv.as_ref() == Some(mv))
}

/// Appends a new child for `mv` and returns its index.
///
/// Does not check for an existing equal child; callers that must keep the
/// no-duplicate invariant go through the session.
pub fn add_variation(node: &mut Node, mv: Move) -> usize {
    node.children.push(create_node(mv));
    node.children.len() - 1
}

/// A root-relative address of a node: the child index taken at each level.
///
/// Two paths are equal iff they address the same node of the same tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The path of the root itself.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of plies from the root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The path of this node's `idx`-th child.
    pub fn child(&self, idx: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(idx);
        Self(indices)
    }

    pub(crate) fn push(&mut self, idx: usize) {
        self.0.push(idx);
    }

    pub(crate) fn pop(&mut self) -> Option<usize> {
        self.0.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn test_create_root_is_empty() {
        let root = create_root();
        assert!(root.is_root());
        assert!(root.is_leaf());
        assert_eq!(root.node_count(), 1);
    }

    #[test]
    fn test_build_tree_from_line_chains_single_branch() {
        let line = [mv("e2e4"), mv("e7e5"), mv("g1f3")];
        let root = build_tree_from_line(&line);

        assert_eq!(root.node_count(), 4);
        assert_eq!(root.mainline(), line.to_vec());
        let mut node = &root;
        while let Some(child) = node.children().first() {
            assert_eq!(node.children().len(), 1);
            node = child;
        }
    }

    #[test]
    fn test_build_tree_from_empty_line_is_bare_root() {
        assert_eq!(build_tree_from_line(&[]), create_root());
    }

    #[test]
    fn test_find_child_by_move() {
        let mut root = create_root();
        add_variation(&mut root, mv("e2e4"));
        add_variation(&mut root, mv("d2d4"));

        assert_eq!(find_child_by_move(&root, &mv("d2d4")), Some(1));
        assert_eq!(find_child_by_move(&root, &mv("c2c4")), None);
    }

    #[test]
    fn test_add_variation_does_not_dedupe() {
        let mut root = create_root();
        let a = add_variation(&mut root, mv("e2e4"));
        let b = add_variation(&mut root, mv("e2e4"));
        assert_ne!(a, b);
        assert_eq!(root.children().len(), 2);
    }

    #[test]
    fn test_get_and_moves_along_path() {
        let mut root = build_tree_from_line(&[mv("e2e4"), mv("e7e5")]);
        add_variation(&mut root, mv("d2d4"));

        let path = NodePath::from_indices(vec![0, 0]);
        assert_eq!(root.get(&path).and_then(Node::mv), Some(&mv("e7e5")));
        assert_eq!(root.moves_along(&path), Some(vec![mv("e2e4"), mv("e7e5")]));
        assert!(root.get(&NodePath::from_indices(vec![2])).is_none());
        assert_eq!(root.get(&NodePath::root()), Some(&root));
    }

    #[test]
    fn test_missing_or_null_children_deserialize_as_empty() {
        let json = r#"{"move":null,"children":[{"move":{"from":"e2","to":"e4"}},{"move":{"from":"d2","to":"d4"},"children":null}]}"#;
        let root: Node = serde_json::from_str(json).unwrap();
        assert_eq!(root.children().len(), 2);
        assert!(root.children().iter().all(Node::is_leaf));
    }

    #[test]
    fn test_child_without_move_is_refused() {
        let json = r#"{"move":null,"children":[{"move":null,"children":[{"move":{"from":"d2","to":"d4"}}]}]}"#;
        assert!(serde_json::from_str::<Node>(json).is_err());
    }

    #[test]
    fn test_repeated_sibling_moves_are_merged() {
        let json = r#"{"children":[
            {"move":{"from":"e2","to":"e4"},"children":[{"move":{"from":"e7","to":"e5"}}]},
            {"move":{"from":"d2","to":"d4"}},
            {"move":{"from":"e2","to":"e4"},"children":[
                {"move":{"from":"e7","to":"e5"},"children":[{"move":{"from":"g1","to":"f3"}}]},
                {"move":{"from":"c7","to":"c5"}}
            ]}
        ]}"#;
        let root: Node = serde_json::from_str(json).unwrap();

        assert_eq!(root.children().len(), 2);
        let e4 = &root.children()[0];
        assert_eq!(e4.mv(), Some(&mv("e2e4")));
        assert_eq!(e4.children().len(), 2);
        assert_eq!(root.mainline(), vec![mv("e2e4"), mv("e7e5"), mv("g1f3")]);
        assert_eq!(root.node_count(), 6);
    }
}
