//! Drill mode: checking the trainee's moves against a memorized line.
//!
//! [`handle_drill_move`] is the timeline-based controller. It reads a
//! snapshot of the line and never changes it; every visible effect goes
//! through the injected [`DrillHost`]. Host failures are logged and then
//! ignored, and every rejection puts the display back on the ply it started
//! from, so a wrong or illegal move leaves no trace on the board.
//!
//! [`drill_tree_move`] is the same idea over a [`TreeSession`], where any
//! recorded variation counts as a correct answer.

use crate::{AppliedMove, Color, Move, Result, TreeSession};
use log::warn;
use serde::{Deserialize, Serialize};

/// The two effectful operations the drill controller needs from its host.
///
/// Both are synchronous and may fail; the controller treats failures as
/// best-effort display problems and never propagates them.
pub trait DrillHost {
    /// Plays `mv` on the live game. `Ok(None)` means the move was refused as illegal.
    fn make_move(&mut self, mv: &Move) -> Result<Option<AppliedMove>>;

    /// Shows the position after the first `ply` moves of the line.
    fn set_game_to_ply(&mut self, ply: usize) -> Result<()>;
}

/// What the controller did with an attempted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DrillOutcome {
    /// The move was refused; the display was restored to the starting ply.
    Rejected,
    /// The move matched the line. The display advanced to `to_ply`, past the
    /// opponent's recorded reply when there is one. Nothing was appended.
    #[serde(rename_all = "camelCase")]
    Advanced { to_ply: usize },
    /// The move extended the line past its end and was played by the executor.
    Extended { applied: AppliedMove },
}

impl DrillOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

/// Whether the trainee playing `study_color` is to move at `view_ply`.
pub fn is_users_turn(study_color: Color, view_ply: usize) -> bool {
    Color::to_move_at(view_ply) == study_color
}

/// The recorded move at `view_ply`, or `None` past the end of the line.
pub fn expected_move(full_line: &[Move], view_ply: usize) -> Option<&Move> {
    full_line.get(view_ply)
}

fn restore_display<H: DrillHost + ?Sized>(host: &mut H, ply: usize) {
    if let Err(e) = host.set_game_to_ply(ply) {
        warn!("Failed to restore drill display to ply {ply}: {e}");
    }
}

/// Decides whether `attempt` is accepted at `view_ply` of `full_line`.
///
/// The rules, in order:
/// - on the opponent's turn every move is refused;
/// - the recorded move advances the display past the recorded reply (if
///   any) without calling the executor;
/// - at the very end of the line any move the executor accepts extends it,
///   and a reply expected by the snapshot is auto-played on a best-effort basis;
/// - anything else is refused.
///
/// The recorded reply is trusted as-is; it is not re-checked by the executor.
pub fn handle_drill_move<H: DrillHost + ?Sized>(
    full_line: &[Move],
    view_ply: usize,
    study_color: Color,
    attempt: &Move,
    host: &mut H,
) -> DrillOutcome {
    if !is_users_turn(study_color, view_ply) {
        restore_display(host, view_ply);
        return DrillOutcome::Rejected;
    }

    if let Some(expected) = expected_move(full_line, view_ply) {
        if expected == attempt {
            let to_ply = if expected_move(full_line, view_ply + 1).is_some() {
                view_ply + 2
            } else {
                view_ply + 1
            };
            return match host.set_game_to_ply(to_ply) {
                Ok(()) => DrillOutcome::Advanced { to_ply },
                Err(e) => {
                    warn!("Failed to advance drill display to ply {to_ply}: {e}");
                    restore_display(host, view_ply);
                    DrillOutcome::Rejected
                }
            };
        }
    }

    if view_ply != full_line.len() {
        restore_display(host, view_ply);
        return DrillOutcome::Rejected;
    }

    let applied = match host.make_move(attempt) {
        Ok(Some(applied)) => applied,
        Ok(None) => {
            restore_display(host, view_ply);
            return DrillOutcome::Rejected;
        }
        Err(e) => {
            warn!("Move executor failed on {attempt}: {e}");
            restore_display(host, view_ply);
            return DrillOutcome::Rejected;
        }
    };

    // Looked up in the snapshot taken before the move was appended.
    if let Some(reply) = expected_move(full_line, view_ply + 1) {
        match host.make_move(reply) {
            Ok(Some(_)) => {}
            Ok(None) => warn!("Opponent reply {reply} was refused by the executor"),
            Err(e) => warn!("Failed to auto-play opponent reply {reply}: {e}"),
        }
    }

    DrillOutcome::Extended { applied }
}

/// What [`drill_tree_move`] did with an attempted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TreeDrillOutcome {
    /// Not the trainee's turn, or the move is not in the repertoire. The cursor is unchanged.
    Rejected,
    /// The move is in the repertoire. `reply` is the opponent's mainline answer
    /// that was auto-played; `line_complete` is set once the cursor reaches a leaf.
    #[serde(rename_all = "camelCase")]
    Accepted {
        reply: Option<Move>,
        line_complete: bool,
    },
}

/// Checks `attempt` against the children of the session's current node.
///
/// Any recorded child counts as correct. After a correct move the opponent's
/// mainline reply (the first child) is played automatically.
pub fn drill_tree_move(
    session: &mut TreeSession,
    train_as: Color,
    attempt: &Move,
) -> TreeDrillOutcome {
    if !is_users_turn(train_as, session.ply()) || session.go_forward_if_exists(attempt).is_err() {
        return TreeDrillOutcome::Rejected;
    }
    let reply = auto_play_opponent(session, train_as);
    TreeDrillOutcome::Accepted {
        reply,
        line_complete: session.current_node().is_leaf(),
    }
}

/// Plays the opponent's mainline move when it is the opponent's turn.
///
/// Used after a correct answer and at the start of a drill when the trainee
/// plays black.
pub fn auto_play_opponent(session: &mut TreeSession, train_as: Color) -> Option<Move> {
    if is_users_turn(train_as, session.ply()) {
        return None;
    }
    let reply = *session.current_node().children().first()?.mv()?;
    session.go_forward_if_exists(&reply).ok()?;
    Some(reply)
}
