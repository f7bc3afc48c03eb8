use gridmark_model::{parse_separator_line, CellKey, ColumnAlignment, TableRecord};

use crate::escape::escape_pipes;
use crate::span::split_pipe_spans;

/// Serialize a table record back to markdown text.
///
/// Strategy selection, in order:
/// 1. raw lines present and nothing edited: return the original lines
///    unchanged (byte-identical round-trip);
/// 2. raw lines present with value edits: rewrite only the spans of edited
///    cells, keeping every other byte of the original lines;
/// 3. raw lines gone (a structural edit happened): regenerate every line from
///    the record with column-width padding.
pub fn serialize_table(record: &TableRecord) -> String {
    match (&record.raw_lines, record.has_edits()) {
        (Some(lines), false) => lines.join("\n"),
        (Some(lines), true) => serialize_differential(record, lines),
        (None, _) => regenerate(record),
    }
}

fn serialize_differential(record: &TableRecord, lines: &[String]) -> String {
    // Line 0 is the header row; line 1 is the ruler when the record carries
    // one (or the line parses as one); data rows follow.
    let has_ruler = record.separator_line.is_some()
        || lines.get(1).is_some_and(|l| parse_separator_line(l).is_some());
    let data_start = if has_ruler { 2 } else { 1 };

    let mut out = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let rewritten = if i == 0 {
            rewrite_line(line, &|col| {
                record
                    .is_edited(CellKey::Header { col })
                    .then(|| record.headers.get(col).cloned())
                    .flatten()
            })
        } else if i >= data_start && i - data_start < record.rows.len() {
            let row = i - data_start;
            rewrite_line(line, &|col| {
                record
                    .is_edited(CellKey::Cell { row, col })
                    .then(|| record.rows[row].get(col).cloned())
                    .flatten()
            })
        } else {
            None
        };
        out.push(rewritten.unwrap_or_else(|| line.clone()));
    }
    out.join("\n")
}

/// Substitute edited cell values into one raw line.
///
/// `lookup` returns the replacement value for a column index, or `None` when
/// that cell is untouched. Returns `None` when nothing was substituted, so the
/// caller keeps the original line verbatim.
fn rewrite_line(line: &str, lookup: &dyn Fn(usize) -> Option<String>) -> Option<String> {
    let mut parts = split_pipe_spans(line);
    if parts.len() >= 3 {
        // parts[0] is the prefix before the first pipe and the final part is
        // trailing decoration; interior parts are cell spans in order.
        let last = parts.len() - 1;
        let mut changed = false;
        for (idx, part) in parts.iter_mut().enumerate().take(last).skip(1) {
            if let Some(value) = lookup(idx - 1) {
                *part = format!(" {} ", escape_pipes(&value));
                changed = true;
            }
        }
        return changed.then(|| parts.join("|"));
    }

    // Fewer than two unescaped pipes: fall back to a naive split on every
    // pipe character, substituting by positional index.
    let mut parts: Vec<String> = line.split('|').map(str::to_string).collect();
    let offset = usize::from(line.trim_start().starts_with('|'));
    let mut changed = false;
    for (idx, part) in parts.iter_mut().enumerate().skip(offset) {
        if let Some(value) = lookup(idx - offset) {
            *part = format!(" {} ", escape_pipes(&value));
            changed = true;
        }
    }
    if changed {
        log::debug!("naive pipe split for line with fewer than two unescaped pipes: {line:?}");
    }
    changed.then(|| parts.join("|"))
}

fn regenerate(record: &TableRecord) -> String {
    let columns = record.headers.len();
    let headers: Vec<String> = record.headers.iter().map(|h| escape_pipes(h)).collect();
    let rows: Vec<Vec<String>> = record
        .rows
        .iter()
        .map(|row| row.iter().map(|cell| escape_pipes(cell)).collect())
        .collect();

    // Column widths over escaped text, floored so ruler tokens always fit.
    let mut widths = vec![3usize; columns];
    for (width, header) in widths.iter_mut().zip(&headers) {
        *width = (*width).max(header.chars().count());
    }
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let alignments = match record.separator_alignments() {
        Some(tokens) if tokens.len() == columns => tokens,
        _ => vec![ColumnAlignment::None; columns],
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(render_cells(&headers, &widths));
    lines.push(render_ruler(&alignments, &widths));
    for row in &rows {
        lines.push(render_cells(row, &widths));
    }
    lines.join("\n")
}

fn render_cells(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, &width) in cells.iter().zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        line.push(' ');
        line.push_str(cell);
        line.extend(std::iter::repeat(' ').take(pad));
        line.push_str(" |");
    }
    line
}

fn render_ruler(alignments: &[ColumnAlignment], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (&alignment, &width) in alignments.iter().zip(widths) {
        line.push(' ');
        line.push_str(&ruler_token(alignment, width));
        line.push_str(" |");
    }
    line
}

fn ruler_token(alignment: ColumnAlignment, width: usize) -> String {
    let width = width.max(3);
    match alignment {
        ColumnAlignment::None => "-".repeat(width),
        ColumnAlignment::Left => format!(":{}", "-".repeat(width - 1)),
        ColumnAlignment::Right => format!("{}:", "-".repeat(width - 1)),
        ColumnAlignment::Center => format!(":{}:", "-".repeat(width - 2)),
    }
}
