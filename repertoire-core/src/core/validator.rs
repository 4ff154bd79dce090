//! The boundary to the external chess engine, and the drill host built on it.
//!
//! The core performs no chess-rule checking. Everything about legality and
//! notation comes from a [`MoveValidator`]; the core only records what the
//! validator accepted.

use crate::{
    handle_drill_move, pgn_has_fen_header, AppliedMove, Color, DrillHost, DrillOutcome, Move,
    RepertoireError, Result, Timeline,
};
use log::{debug, warn};

/// The chess capabilities the core consumes from an external engine.
pub trait MoveValidator {
    /// Plays `mv` on the current position. `Ok(None)` means the move is illegal.
    fn apply_move(&mut self, mv: &Move) -> Result<Option<AppliedMove>>;

    /// Resets to the initial position and plays `line`. Fails if any move is illegal.
    fn replay(&mut self, line: &[Move]) -> Result<()>;

    /// The moves played so far, with notation.
    fn history(&self) -> Vec<AppliedMove>;

    /// The whole line as a notation string (PGN movetext).
    fn export_notation(&self) -> String;
}

/// A [`DrillHost`] that keeps a [`Timeline`] and a [`MoveValidator`] in step.
///
/// Showing a ply replays that prefix of the line on the validator and moves
/// the cursor; making a move plays it on the validator and records it on the
/// timeline (cutting the line if the cursor was in the past).
pub struct TimelineDrill<'a, V: MoveValidator> {
    timeline: &'a mut Timeline,
    validator: &'a mut V,
}

impl<'a, V: MoveValidator> TimelineDrill<'a, V> {
    pub fn new(timeline: &'a mut Timeline, validator: &'a mut V) -> Self {
        Self { timeline, validator }
    }

    /// Runs the drill controller for `attempt` against the current timeline.
    pub fn attempt(&mut self, study_color: Color, attempt: &Move) -> DrillOutcome {
        let full_line = self.timeline.full_line().to_vec();
        let view_ply = self.timeline.view_ply();
        handle_drill_move(&full_line, view_ply, study_color, attempt, self)
    }
}

impl<V: MoveValidator> DrillHost for TimelineDrill<'_, V> {
    fn make_move(&mut self, mv: &Move) -> Result<Option<AppliedMove>> {
        let applied = self.validator.apply_move(mv)?;
        if let Some(applied) = &applied {
            if self.timeline.record_move(applied.mv) {
                debug!("Playing {} discarded the recorded continuation", applied.mv);
            }
        }
        Ok(applied)
    }

    fn set_game_to_ply(&mut self, ply: usize) -> Result<()> {
        if ply > self.timeline.len() {
            return Err(RepertoireError::Callback(format!(
                "Ply {ply} is past the end of a {}-move line",
                self.timeline.len()
            )));
        }
        self.validator.replay(&self.timeline.full_line()[..ply])?;
        self.timeline.go_to_ply(ply as isize);
        Ok(())
    }
}

/// Replaces the timeline with an imported line, all or nothing.
///
/// `moves` is the mainline a PGN reader extracted from `pgn`. Imports that
/// start from a custom position (a `[FEN "..."]` tag) are refused, as is any
/// line the validator cannot replay. On refusal the timeline is untouched
/// and the validator is put back on the displayed position.
pub fn import_line<V: MoveValidator>(
    timeline: &mut Timeline,
    validator: &mut V,
    pgn: &str,
    moves: &[Move],
) -> bool {
    if pgn_has_fen_header(pgn) {
        debug!("Refusing import that starts from a custom position");
        return false;
    }
    if let Err(e) = validator.replay(moves) {
        debug!("Refusing import: {e}");
        if let Err(e) = validator.replay(timeline.visible_line()) {
            warn!("Failed to restore position after refused import: {e}");
        }
        return false;
    }
    timeline.replace_line(moves.to_vec());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A validator that knows no chess: it accepts every move except the ones
    /// it was told are illegal.
    #[derive(Default)]
    struct ScriptedBoard {
        illegal: Vec<Move>,
        played: Vec<Move>,
        replays: usize,
    }

    impl MoveValidator for ScriptedBoard {
        fn apply_move(&mut self, mv: &Move) -> Result<Option<AppliedMove>> {
            if self.illegal.contains(mv) {
                return Ok(None);
            }
            self.played.push(*mv);
            Ok(Some(AppliedMove { mv: *mv, san: mv.to_string() }))
        }

        fn replay(&mut self, line: &[Move]) -> Result<()> {
            self.replays += 1;
            if let Some(bad) = line.iter().find(|mv| self.illegal.contains(mv)) {
                return Err(RepertoireError::Callback(format!("Illegal move {bad}")));
            }
            self.played = line.to_vec();
            Ok(())
        }

        fn history(&self) -> Vec<AppliedMove> {
            self.played
                .iter()
                .map(|mv| AppliedMove { mv: *mv, san: mv.to_string() })
                .collect()
        }

        fn export_notation(&self) -> String {
            self.history()
                .iter()
                .map(|applied| applied.san.clone())
                .collect::<Vec<_>>()
                .join(" ")
        }
    }

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    fn line(moves: &[&str]) -> Vec<Move> {
        moves.iter().map(|s| mv(s)).collect()
    }

    #[test]
    fn test_drill_advances_timeline_cursor_past_reply() {
        let mut timeline = Timeline::from_line(line(&["e2e4", "e7e5", "g1f3", "b8c6"]));
        timeline.go_to_ply(0);
        let mut board = ScriptedBoard::default();

        let outcome = TimelineDrill::new(&mut timeline, &mut board).attempt(Color::White, &mv("e2e4"));

        assert_eq!(outcome, DrillOutcome::Advanced { to_ply: 2 });
        assert_eq!(timeline.view_ply(), 2);
        assert_eq!(timeline.len(), 4);
        assert_eq!(board.played, line(&["e2e4", "e7e5"]));
    }

    #[test]
    fn test_drill_wrong_move_leaves_timeline_alone() {
        let mut timeline = Timeline::from_line(line(&["e2e4", "e7e5"]));
        timeline.go_to_ply(0);
        let mut board = ScriptedBoard::default();

        let outcome = TimelineDrill::new(&mut timeline, &mut board).attempt(Color::White, &mv("d2d4"));

        assert_eq!(outcome, DrillOutcome::Rejected);
        assert_eq!(timeline.view_ply(), 0);
        assert_eq!(timeline.full_line(), line(&["e2e4", "e7e5"]).as_slice());
        assert!(board.played.is_empty());
    }

    #[test]
    fn test_drill_extends_line_at_end() {
        let mut timeline = Timeline::from_line(line(&["e2e4", "e7e5"]));
        let mut board = ScriptedBoard::default();
        board.replay(timeline.full_line()).unwrap();

        let outcome = TimelineDrill::new(&mut timeline, &mut board).attempt(Color::White, &mv("g1f3"));

        assert!(matches!(outcome, DrillOutcome::Extended { .. }));
        assert_eq!(timeline.full_line(), line(&["e2e4", "e7e5", "g1f3"]).as_slice());
        assert_eq!(timeline.view_ply(), 3);
        assert_eq!(board.export_notation(), "e2e4 e7e5 g1f3");
    }

    #[test]
    fn test_drill_illegal_extension_is_rejected() {
        let mut timeline = Timeline::from_line(line(&["e2e4", "e7e5"]));
        let mut board = ScriptedBoard {
            illegal: vec![mv("e1e3")],
            ..Default::default()
        };

        let outcome = TimelineDrill::new(&mut timeline, &mut board).attempt(Color::White, &mv("e1e3"));

        assert_eq!(outcome, DrillOutcome::Rejected);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.view_ply(), 2);
    }

    #[test]
    fn test_set_game_to_ply_past_end_fails() {
        let mut timeline = Timeline::from_line(line(&["e2e4"]));
        let mut board = ScriptedBoard::default();
        let mut host = TimelineDrill::new(&mut timeline, &mut board);

        assert!(host.set_game_to_ply(3).is_err());
        assert!(host.set_game_to_ply(0).is_ok());
        assert_eq!(timeline.view_ply(), 0);
    }

    #[test]
    fn test_import_line_is_all_or_nothing() {
        let mut timeline = Timeline::from_line(line(&["c2c4"]));
        let mut board = ScriptedBoard {
            illegal: vec![mv("a1a8")],
            ..Default::default()
        };

        let ok = import_line(&mut timeline, &mut board, "1. e4 e5", &line(&["e2e4", "e7e5"]));
        assert!(ok);
        assert_eq!(timeline.full_line(), line(&["e2e4", "e7e5"]).as_slice());

        let refused = import_line(&mut timeline, &mut board, "1. e4 Ra8", &line(&["e2e4", "a1a8"]));
        assert!(!refused);
        assert_eq!(timeline.full_line(), line(&["e2e4", "e7e5"]).as_slice());
        assert_eq!(board.played, line(&["e2e4", "e7e5"]));
    }

    #[test]
    fn test_import_line_refuses_custom_start_position() {
        let mut timeline = Timeline::new();
        let mut board = ScriptedBoard::default();
        let pgn = "[FEN \"8/8/8/8/8/8/8/K6k w - - 0 1\"]\n\n1. Kb2";

        assert!(!import_line(&mut timeline, &mut board, pgn, &line(&["a1b2"])));
        assert!(timeline.is_empty());
        assert_eq!(board.replays, 0);
    }
}
