//! Parsing and rendering of the ruler line beneath a pipe-table header.

use serde::{Deserialize, Serialize};

/// Alignment token from a markdown table ruler line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnAlignment {
    /// `---` (unmarked; renderers treat it as left-aligned).
    #[default]
    None,
    /// `:--`
    Left,
    /// `:-:`
    Center,
    /// `--:`
    Right,
}

impl ColumnAlignment {
    /// Canonical three-character token for this alignment.
    pub fn token(self) -> &'static str {
        match self {
            ColumnAlignment::None => "---",
            ColumnAlignment::Left => ":--",
            ColumnAlignment::Center => ":-:",
            ColumnAlignment::Right => "--:",
        }
    }
}

/// Parse a ruler line (e.g. `| --- | :-: |`) into per-column alignment tokens.
///
/// Returns `None` when the line is not a parseable ruler: every cell must be
/// one or more dashes with optional leading/trailing colons. The empty cells
/// produced by outer pipes are tolerated; interior empty cells are not.
pub fn parse_separator_line(line: &str) -> Option<Vec<ColumnAlignment>> {
    let mut parts: Vec<&str> = line.split('|').map(str::trim).collect();
    if parts.first().is_some_and(|p| p.is_empty()) {
        parts.remove(0);
    }
    if parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    if parts.is_empty() {
        return None;
    }
    parts.into_iter().map(parse_token).collect()
}

fn parse_token(token: &str) -> Option<ColumnAlignment> {
    let left = token.starts_with(':');
    let right = token.len() > 1 && token.ends_with(':');
    let body = &token[usize::from(left)..token.len() - usize::from(right)];
    if body.is_empty() || !body.bytes().all(|b| b == b'-') {
        return None;
    }
    Some(match (left, right) {
        (false, false) => ColumnAlignment::None,
        (true, false) => ColumnAlignment::Left,
        (true, true) => ColumnAlignment::Center,
        (false, true) => ColumnAlignment::Right,
    })
}

/// Render alignments back to a canonical ruler line: `| --- | :-: |`.
pub fn render_separator_line(alignments: &[ColumnAlignment]) -> String {
    let mut out = String::from("|");
    for alignment in alignments {
        out.push(' ');
        out.push_str(alignment.token());
        out.push_str(" |");
    }
    out
}
