//! Canonical position keys and the transposition index.
//!
//! A position key is the first four FEN fields: placement, side to move,
//! castling rights and en-passant square. The move counters are dropped so
//! that the same position reached by different move orders gets the same key.

use crate::{NodePath, RepertoireError, Result};
use std::collections::HashMap;

/// Reduces a FEN string to its position key.
///
/// Fields are separated by single spaces, so two adjacent spaces leave an
/// empty field; empty castling or en-passant fields are normalized to `"-"`.
/// Side to move, castling rights and en-passant square are all kept.
///
/// # Errors
///
/// Returns [`RepertoireError::InvalidFen`] if `fen` has fewer than four
/// fields or an empty placement or side-to-move field.
///
/// # Examples
///
/// ```rust
/// use repertoire_core::position_key_from_fen;
///
/// let a = position_key_from_fen("8/8/8/8/8/8/8/8 w - - 0 1").unwrap();
/// let b = position_key_from_fen("8/8/8/8/8/8/8/8 w - - 12 37").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a, "8/8/8/8/8/8/8/8 w - -");
/// ```
pub fn position_key_from_fen(fen: &str) -> Result<String> {
    let fields: Vec<&str> = fen.trim().split(' ').take(4).collect();
    if fields.len() < 4 {
        return Err(RepertoireError::InvalidFen(format!(
            "Expected at least 4 fields, found {}: {fen:?}",
            fields.len()
        )));
    }
    if fields[0].is_empty() || fields[1].is_empty() {
        return Err(RepertoireError::InvalidFen(format!(
            "Missing placement or side to move: {fen:?}"
        )));
    }
    let or_dash = |field: &str| if field.is_empty() { "-".to_string() } else { field.to_string() };
    Ok(format!(
        "{} {} {} {}",
        fields[0],
        fields[1],
        or_dash(fields[2]),
        or_dash(fields[3])
    ))
}

/// Maps position keys to every tree node known to reach that position.
#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    entries: HashMap<String, Vec<NodePath>>,
}

impl PositionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `node` reaches the position `key`. Several nodes may share a key.
    pub fn index_node(&mut self, key: impl Into<String>, node: NodePath) {
        self.entries.entry(key.into()).or_default().push(node);
    }

    /// The nodes indexed under `key`, in indexing order.
    pub fn nodes_at(&self, key: &str) -> &[NodePath] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Keys reached by two or more nodes.
    pub fn transpositions(&self) -> impl Iterator<Item = (&str, &[NodePath])> {
        self.entries
            .iter()
            .filter(|(_, nodes)| nodes.len() > 1)
            .map(|(key, nodes)| (key.as_str(), nodes.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Creates an empty position index.
pub fn create_position_index() -> PositionIndex {
    PositionIndex::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_BOARD: &str = "8/8/8/8/8/8/8/8";

    #[test]
    fn test_move_counters_are_ignored() {
        let a = position_key_from_fen("8/8/8/8/8/8/8/8 w - - 0 1").unwrap();
        let b = position_key_from_fen("8/8/8/8/8/8/8/8 w - - 12 37").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_side_castling_and_en_passant_are_significant() {
        let base = position_key_from_fen(&format!("{EMPTY_BOARD} w - - 0 1")).unwrap();
        let black = position_key_from_fen(&format!("{EMPTY_BOARD} b - - 0 1")).unwrap();
        let castling = position_key_from_fen(&format!("{EMPTY_BOARD} w KQ - 0 1")).unwrap();
        let en_passant = position_key_from_fen(&format!("{EMPTY_BOARD} w - e3 0 1")).unwrap();

        assert_ne!(base, black);
        assert_ne!(base, castling);
        assert_ne!(base, en_passant);
    }

    #[test]
    fn test_four_field_fen_is_enough() {
        let key = position_key_from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").unwrap();
        assert_eq!(key, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -");
    }

    #[test]
    fn test_too_few_fields_is_an_error() {
        assert!(matches!(
            position_key_from_fen("8/8/8/8/8/8/8/8 w -"),
            Err(RepertoireError::InvalidFen(_))
        ));
        assert!(position_key_from_fen("").is_err());
        assert!(position_key_from_fen("   ").is_err());
    }

    #[test]
    fn test_empty_castling_and_en_passant_become_dash() {
        let key = position_key_from_fen(&format!("{EMPTY_BOARD} w   0 1")).unwrap();
        assert_eq!(key, format!("{EMPTY_BOARD} w - -"));
        let dashed = position_key_from_fen(&format!("{EMPTY_BOARD} w - - 0 1")).unwrap();
        assert_eq!(key, dashed);

        let castling_only = position_key_from_fen(&format!("{EMPTY_BOARD} b KQ  3 9")).unwrap();
        assert_eq!(castling_only, format!("{EMPTY_BOARD} b KQ -"));
    }

    #[test]
    fn test_index_node_keeps_transpositions() {
        let mut index = create_position_index();
        let key = position_key_from_fen("8/8/8/8/8/8/8/8 w - - 0 1").unwrap();
        index.index_node(key.clone(), NodePath::from_indices(vec![0, 1]));
        index.index_node(key.clone(), NodePath::from_indices(vec![1, 0]));
        index.index_node("other - - -", NodePath::root());

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.nodes_at(&key),
            &[NodePath::from_indices(vec![0, 1]), NodePath::from_indices(vec![1, 0])]
        );
        assert!(index.nodes_at("missing").is_empty());

        let transpositions: Vec<_> = index.transpositions().collect();
        assert_eq!(transpositions.len(), 1);
        assert_eq!(transpositions[0].0, key);
    }
}
