//! PGN boundary checks.
//!
//! The repertoire model assumes every line starts from the standard initial
//! position, so imports carrying a `[FEN "..."]` tag are turned away before
//! they reach a tree or timeline.

use regex::Regex;
use std::sync::OnceLock;

fn fen_header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)\[\s*FEN\s+"[^"]*"\s*\]"#).expect("FEN header pattern is valid")
    })
}

/// Whether `text` contains a `[FEN "..."]` tag (any case, any spacing).
pub fn pgn_has_fen_header(text: &str) -> bool {
    fen_header_pattern().is_match(text)
}
