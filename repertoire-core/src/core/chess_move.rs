//! Board coordinates, sides and moves.
//!
//! These are plain value types. Nothing here knows the rules of chess: a
//! [`Move`] is only a from/to pair plus an optional promotion piece, and
//! legality is decided by an external [`MoveValidator`](super::validator::MoveValidator).
//!
//! ## Serialization
//!
//! Squares serialize as two-character strings and moves as camelCase objects,
//! so a persisted tree node looks like:
//!
//! ```rust
//! use repertoire_core::Move;
//!
//! let mv: Move = "e7e8q".parse().unwrap();
//! let json = serde_json::to_string(&mv).unwrap();
//! assert_eq!(json, r#"{"from":"e7","to":"e8","promotion":"q"}"#);
//! ```

use crate::{RepertoireError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A board square in algebraic coordinates (file `a`..`h`, rank `1`..`8`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Builds a square from zero-based file and rank indices.
    ///
    /// # Errors
    ///
    /// Returns [`RepertoireError::ValidationFailed`] if either index is outside `0..8`.
    pub fn new(file: u8, rank: u8) -> Result<Self> {
        if file > 7 || rank > 7 {
            return Err(RepertoireError::ValidationFailed(format!(
                "Square index out of range: file {file}, rank {rank}"
            )));
        }
        Ok(Self { file, rank })
    }

    /// Zero-based file index (`a` = 0).
    pub fn file(self) -> u8 {
        self.file
    }

    /// Zero-based rank index (`1` = 0).
    pub fn rank(self) -> u8 {
        self.rank
    }
}

impl FromStr for Square {
    type Err = RepertoireError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(RepertoireError::ValidationFailed(format!("Invalid square: {s:?}")));
        }
        let file = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Self::new(file, rank)
            .map_err(|_| RepertoireError::ValidationFailed(format!("Invalid square: {s:?}")))
    }
}

impl TryFrom<String> for Square {
    type Error = RepertoireError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.to_string()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, (b'1' + self.rank) as char)
    }
}

/// The piece a pawn turns into on the last rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PromotionPiece {
    #[serde(rename = "q")]
    Queen,
    #[serde(rename = "r")]
    Rook,
    #[serde(rename = "b")]
    Bishop,
    #[serde(rename = "n")]
    Knight,
}

impl PromotionPiece {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'q' => Some(Self::Queen),
            'r' => Some(Self::Rook),
            'b' => Some(Self::Bishop),
            'n' => Some(Self::Knight),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
        }
    }
}

/// A side of the board; also the side a trainee studies an opening as.
///
/// Parsing is strict: only the exact strings `"white"` and `"black"` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// The side to move after `ply` half-moves from the initial position.
    pub fn to_move_at(ply: usize) -> Self {
        if ply % 2 == 0 {
            Self::White
        } else {
            Self::Black
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl FromStr for Color {
    type Err = RepertoireError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "white" => Ok(Self::White),
            "black" => Ok(Self::Black),
            other => Err(RepertoireError::ValidationFailed(format!(
                "Side must be \"white\" or \"black\", got {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::White => "white",
            Self::Black => "black",
        })
    }
}

/// A move as the user entered it: origin, destination and optional promotion.
///
/// Equality is structural and includes the promotion piece, so `e7e8q` and
/// `e7e8` are different moves. See [`same_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PromotionPiece>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to, promotion: None }
    }

    pub fn with_promotion(mut self, piece: PromotionPiece) -> Self {
        self.promotion = Some(piece);
        self
    }

    /// The `(from, to)` pair a renderer highlights for this move.
    pub fn squares(&self) -> (Square, Square) {
        (self.from, self.to)
    }
}

impl FromStr for Move {
    type Err = RepertoireError;

    /// Parses coordinate notation such as `"e2e4"` or `"e7e8q"`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || RepertoireError::ValidationFailed(format!("Invalid move: {s:?}"));
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(invalid());
        }
        let from: Square = s[0..2].parse().map_err(|_| invalid())?;
        let to: Square = s[2..4].parse().map_err(|_| invalid())?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => Some(PromotionPiece::from_char(c).ok_or_else(invalid)?),
        };
        Ok(Self { from, to, promotion })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion {
            write!(f, "{}", piece.as_char())?;
        }
        Ok(())
    }
}

/// Two moves are the same iff from, to and promotion all match.
///
/// A missing promotion never equals a present one.
pub fn same_move(a: &Move, b: &Move) -> bool {
    a == b
}

/// A move accepted by the external validator, with its resolved notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedMove {
    #[serde(rename = "move")]
    pub mv: Move,
    pub san: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn test_square_parse_and_display() {
        let sq: Square = "e4".parse().unwrap();
        assert_eq!(sq.file(), 4);
        assert_eq!(sq.rank(), 3);
        assert_eq!(sq.to_string(), "e4");
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
    }

    #[test]
    fn test_same_move_compares_promotion() {
        assert!(same_move(&mv("e2e4"), &mv("e2e4")));
        assert!(!same_move(&mv("e2e4"), &mv("e2e3")));
        assert!(same_move(&mv("e7e8q"), &mv("e7e8q")));
        assert!(!same_move(&mv("e7e8q"), &mv("e7e8n")));
        assert!(!same_move(&mv("e7e8q"), &mv("e7e8")));
        assert!(!same_move(&mv("e7e8"), &mv("e7e8q")));
    }

    #[test]
    fn test_move_parse_rejects_garbage() {
        assert!("e2".parse::<Move>().is_err());
        assert!("e2e4x".parse::<Move>().is_err());
        assert!("e2e4qq".parse::<Move>().is_err());
        assert!("é2e4".parse::<Move>().is_err());
    }

    #[test]
    fn test_move_without_promotion_omits_field() {
        let json = serde_json::to_string(&mv("g1f3")).unwrap();
        assert_eq!(json, r#"{"from":"g1","to":"f3"}"#);
        let back: Move = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mv("g1f3"));
    }

    #[test]
    fn test_color_parse_is_strict() {
        assert_eq!("white".parse::<Color>().unwrap(), Color::White);
        assert_eq!("black".parse::<Color>().unwrap(), Color::Black);
        assert!("White".parse::<Color>().is_err());
        assert!(" black".parse::<Color>().is_err());
        assert!("".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_to_move_at_ply() {
        assert_eq!(Color::to_move_at(0), Color::White);
        assert_eq!(Color::to_move_at(1), Color::Black);
        assert_eq!(Color::to_move_at(6), Color::White);
        assert_eq!(Color::White.opposite(), Color::Black);
    }
}
