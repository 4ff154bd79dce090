//! A single flat line of moves with a browsing cursor.
//!
//! The timeline is the single-line editing model: `full_line` is the master
//! line and `view_ply` is how many of its moves are currently shown.
//! Navigation only ever moves `view_ply`. Playing a move while looking at a
//! past position cuts the line at the cursor first (branch-on-edit); the
//! discarded tail is not kept anywhere. Real variations are the move tree's
//! job.
//!
//! The free functions are the pure rules; [`Timeline`] bundles them with the
//! state they act on.

use crate::{Move, Node, Square};
use log::debug;
use serde::{Deserialize, Serialize};

/// Result of [`branch_line_if_needed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub line: Vec<Move>,
    /// Whether moves beyond the cursor were discarded.
    pub cut: bool,
    /// The ply the line was cut at; equals the line length when nothing was cut.
    pub base_ply: usize,
}

/// A line together with the cursor that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineView {
    pub line: Vec<Move>,
    pub view_ply: usize,
}

/// Cursor and highlight after a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commit {
    pub view_ply: usize,
    pub last_move: Option<(Square, Square)>,
}

/// Clamps `ply` into `[0, length]`.
pub fn clamp_ply(ply: isize, length: usize) -> usize {
    if ply <= 0 {
        0
    } else {
        (ply as usize).min(length)
    }
}

/// The cursor after stepping `delta` plies from `view_ply`, clamped to the line.
pub fn next_view_ply(view_ply: usize, delta: isize, line_length: usize) -> usize {
    clamp_ply((view_ply as isize).saturating_add(delta), line_length)
}

/// The cursor after jumping to `target_ply`, clamped to the line.
///
/// The current cursor does not influence a jump; it is accepted so callers
/// can treat every navigation the same way.
pub fn apply_jump(_view_ply: usize, target_ply: isize, length: usize) -> usize {
    clamp_ply(target_ply, length)
}

/// Cuts `full_line` at `view_ply` when the cursor is in the past.
pub fn branch_line_if_needed(full_line: &[Move], view_ply: usize) -> Branch {
    if view_ply >= full_line.len() {
        return Branch {
            line: full_line.to_vec(),
            cut: false,
            base_ply: full_line.len(),
        };
    }
    Branch {
        line: full_line[..view_ply].to_vec(),
        cut: true,
        base_ply: view_ply,
    }
}

/// The line and cursor to build on before a new move is appended.
pub fn apply_edit_in_past(full_line: &[Move], view_ply: usize) -> LineView {
    let branch = branch_line_if_needed(full_line, view_ply);
    LineView {
        view_ply: branch.base_ply,
        line: branch.line,
    }
}

/// After a move was appended, the cursor jumps to the new end.
pub fn apply_commit(new_full_line: &[Move]) -> Commit {
    Commit {
        view_ply: new_full_line.len(),
        last_move: new_full_line.last().map(Move::squares),
    }
}

/// The squares to highlight for the position at `view_ply`.
///
/// Always derived from the cursor, never stored separately.
pub fn compute_last_move(full_line: &[Move], view_ply: usize) -> Option<(Square, Square)> {
    if view_ply == 0 {
        return None;
    }
    full_line.get(view_ply - 1).map(Move::squares)
}

/// A master line plus a browsing cursor.
///
/// A stored cursor past the end of the line is clamped to the end on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTimeline")]
pub struct Timeline {
    full_line: Vec<Move>,
    view_ply: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeline {
    #[serde(default)]
    full_line: Vec<Move>,
    #[serde(default)]
    view_ply: usize,
}

impl From<RawTimeline> for Timeline {
    fn from(raw: RawTimeline) -> Self {
        let len = raw.full_line.len();
        if raw.view_ply > len {
            debug!("Clamping stored view ply {} to line length {len}", raw.view_ply);
        }
        Self {
            view_ply: raw.view_ply.min(len),
            full_line: raw.full_line,
        }
    }
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// A timeline over `line` with the cursor at its end.
    pub fn from_line(line: Vec<Move>) -> Self {
        let view_ply = line.len();
        Self { full_line: line, view_ply }
    }

    /// A timeline over the mainline (first child at every level) of `root`.
    pub fn from_mainline(root: &Node) -> Self {
        Self::from_line(root.mainline())
    }

    pub fn full_line(&self) -> &[Move] {
        &self.full_line
    }

    pub fn view_ply(&self) -> usize {
        self.view_ply
    }

    pub fn len(&self) -> usize {
        self.full_line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.full_line.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.view_ply >= self.full_line.len()
    }

    /// The moves that lead to the displayed position.
    pub fn visible_line(&self) -> &[Move] {
        &self.full_line[..self.view_ply.min(self.full_line.len())]
    }

    pub fn go_to_ply(&mut self, ply: isize) -> usize {
        self.view_ply = apply_jump(self.view_ply, ply, self.full_line.len());
        self.view_ply
    }

    pub fn step(&mut self, delta: isize) -> usize {
        self.view_ply = next_view_ply(self.view_ply, delta, self.full_line.len());
        self.view_ply
    }

    pub fn prev(&mut self) -> usize {
        self.step(-1)
    }

    pub fn next(&mut self) -> usize {
        self.step(1)
    }

    pub fn to_start(&mut self) -> usize {
        self.go_to_ply(0)
    }

    pub fn to_end(&mut self) -> usize {
        self.view_ply = self.full_line.len();
        self.view_ply
    }

    /// Appends `mv` at the cursor, discarding any moves beyond it, and moves
    /// the cursor to the new end.
    ///
    /// Returns whether a tail was discarded.
    pub fn record_move(&mut self, mv: Move) -> bool {
        let branch = branch_line_if_needed(&self.full_line, self.view_ply);
        let mut line = branch.line;
        line.push(mv);
        let commit = apply_commit(&line);
        self.full_line = line;
        self.view_ply = commit.view_ply;
        branch.cut
    }

    /// Replaces the whole line and puts the cursor at its end.
    pub fn replace_line(&mut self, line: Vec<Move>) {
        *self = Self::from_line(line);
    }

    pub fn last_move(&self) -> Option<(Square, Square)> {
        compute_last_move(&self.full_line, self.view_ply)
    }

    /// The recorded move after the cursor, if any.
    pub fn expected_move(&self) -> Option<&Move> {
        self.full_line.get(self.view_ply)
    }
}
