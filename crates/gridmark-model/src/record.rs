use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::separator::{parse_separator_line, render_separator_line, ColumnAlignment};
use crate::{CellKey, SortState, TableError};

/// Millisecond UNIX timestamp.
pub type TimestampMs = i64;

/// Positional and bookkeeping metadata for a table within its source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Source document identifier (path, URI, buffer id - opaque here).
    #[serde(default)]
    pub source: String,
    /// First line of the table in the source document.
    #[serde(default)]
    pub start_line: usize,
    /// Last line of the table in the source document.
    #[serde(default)]
    pub end_line: usize,
    /// Position among the document's tables. Fixed at construction.
    #[serde(default)]
    pub table_index: usize,
    #[serde(default)]
    pub last_modified: TimestampMs,
    #[serde(default)]
    pub row_count: usize,
    #[serde(default)]
    pub column_count: usize,
    /// False when construction had to repair ragged input rows.
    #[serde(default)]
    pub is_valid: bool,
    /// One note per repair made at construction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

/// Structured table handed over by the source-document parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTable {
    pub start_line: usize,
    pub end_line: usize,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Verbatim source lines of the table, header and ruler included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_lines: Option<Vec<String>>,
    /// Verbatim ruler line, when the table has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator_line: Option<String>,
}

/// The owned, mutable state of one edited table.
///
/// Invariant: every row's length equals `headers.len()` at all times.
/// Construction normalizes ragged input; every mutation preserves the
/// invariant. `clone()` produces a fully independent record, which is the
/// snapshot primitive for drag previews and external undo managers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub metadata: TableMetadata,
    /// Cells touched since load. Empty means untouched.
    #[serde(default, skip_serializing_if = "HashSet::is_empty")]
    pub edited_cells: HashSet<CellKey>,
    /// Verbatim source lines; discarded by the first structural edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_lines: Option<Vec<String>>,
    /// Original ruler line, reflowed across column edits while it parses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_state: Option<SortState>,
}

impl TableRecord {
    /// Build a record from parser output.
    ///
    /// Fails on an empty header list. Ragged rows are repaired to header
    /// length (short rows padded, long rows truncated); each repair is
    /// recorded in `metadata.issues` and clears `metadata.is_valid`.
    pub fn from_parsed(
        parsed: ParsedTable,
        source: impl Into<String>,
        table_index: usize,
    ) -> Result<Self, TableError> {
        if parsed.headers.is_empty() {
            return Err(TableError::EmptyHeaders);
        }
        let expected = parsed.headers.len();
        let mut issues = Vec::new();
        let mut rows = parsed.rows;
        for (i, row) in rows.iter_mut().enumerate() {
            if row.len() < expected {
                issues.push(format!(
                    "row {i} padded from {} to {expected} cells",
                    row.len()
                ));
                row.resize(expected, String::new());
            } else if row.len() > expected {
                issues.push(format!(
                    "row {i} truncated from {} to {expected} cells",
                    row.len()
                ));
                row.truncate(expected);
            }
        }

        let mut record = TableRecord {
            headers: parsed.headers,
            rows,
            metadata: TableMetadata {
                source: source.into(),
                start_line: parsed.start_line,
                end_line: parsed.end_line,
                table_index,
                last_modified: Utc::now().timestamp_millis(),
                row_count: 0,
                column_count: 0,
                is_valid: issues.is_empty(),
                issues,
            },
            edited_cells: HashSet::new(),
            raw_lines: parsed.raw_lines,
            separator_line: parsed.separator_line,
            sort_state: None,
        };
        record.refresh_counts();
        Ok(record)
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<&str, TableError> {
        self.check_cell_index(row, col)?;
        Ok(&self.rows[row][col])
    }

    pub fn header(&self, col: usize) -> Result<&str, TableError> {
        self.check_column_index(col)?;
        Ok(&self.headers[col])
    }

    pub fn row(&self, index: usize) -> Result<&[String], TableError> {
        self.check_row_index(index)?;
        Ok(&self.rows[index])
    }

    pub fn column(&self, index: usize) -> Result<Vec<String>, TableError> {
        self.check_column_index(index)?;
        Ok(self.rows.iter().map(|row| row[index].clone()).collect())
    }

    /// True when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when every data cell is the empty string.
    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(String::is_empty))
    }

    /// Fraction of data cells with non-whitespace content. Zero for an empty
    /// table.
    pub fn fill_rate(&self) -> f64 {
        let total = self.rows.len() * self.headers.len();
        if total == 0 {
            return 0.0;
        }
        let filled = self
            .rows
            .iter()
            .flatten()
            .filter(|cell| !cell.trim().is_empty())
            .count();
        filled as f64 / total as f64
    }

    /// Per-column maximum display width in chars, headers included.
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    pub fn check_row_index(&self, row: usize) -> Result<(), TableError> {
        if row >= self.rows.len() {
            return Err(TableError::RowOutOfRange {
                row,
                row_count: self.rows.len(),
            });
        }
        Ok(())
    }

    pub fn check_column_index(&self, col: usize) -> Result<(), TableError> {
        if col >= self.headers.len() {
            return Err(TableError::ColumnOutOfRange {
                col,
                column_count: self.headers.len(),
            });
        }
        Ok(())
    }

    pub fn check_cell_index(&self, row: usize, col: usize) -> Result<(), TableError> {
        if row >= self.rows.len() || col >= self.headers.len() {
            return Err(TableError::CellOutOfRange {
                row,
                col,
                row_count: self.rows.len(),
                column_count: self.headers.len(),
            });
        }
        Ok(())
    }

    pub fn mark_edited(&mut self, key: CellKey) {
        self.edited_cells.insert(key);
    }

    pub fn is_edited(&self, key: CellKey) -> bool {
        self.edited_cells.contains(&key)
    }

    pub fn has_edits(&self) -> bool {
        !self.edited_cells.is_empty()
    }

    /// Drop the verbatim source lines. Called by every structural mutation;
    /// irrecoverable.
    pub fn discard_raw_lines(&mut self) {
        self.raw_lines = None;
    }

    /// Bump the modification timestamp and refresh derived counts.
    pub fn touch(&mut self) {
        self.metadata.last_modified = Utc::now().timestamp_millis();
        self.refresh_counts();
    }

    pub fn refresh_counts(&mut self) {
        self.metadata.row_count = self.rows.len();
        self.metadata.column_count = self.headers.len();
    }

    /// Ruler tokens, when the record has a parseable ruler line.
    pub fn separator_alignments(&self) -> Option<Vec<ColumnAlignment>> {
        self.separator_line.as_deref().and_then(parse_separator_line)
    }

    /// Rewrite the ruler line through a token-level edit.
    ///
    /// No-op when the record has no ruler. A ruler that no longer parses is
    /// dropped rather than guessed at.
    pub fn reflow_separator(&mut self, edit: impl FnOnce(&mut Vec<ColumnAlignment>)) {
        let Some(line) = self.separator_line.as_deref() else {
            return;
        };
        match parse_separator_line(line) {
            Some(mut tokens) => {
                edit(&mut tokens);
                self.separator_line = Some(render_separator_line(&tokens));
            }
            None => {
                log::warn!("dropping unparseable separator line: {line:?}");
                self.separator_line = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed() -> ParsedTable {
        ParsedTable {
            headers: vec!["Name".into(), "Age".into()],
            rows: vec![
                vec!["John".into(), "25".into()],
                vec!["Jane".into(), "30".into()],
            ],
            ..ParsedTable::default()
        }
    }

    #[test]
    fn construction_requires_headers() {
        let result = TableRecord::from_parsed(ParsedTable::default(), "doc.md", 0);
        assert_eq!(result.unwrap_err(), TableError::EmptyHeaders);
    }

    #[test]
    fn construction_repairs_ragged_rows() {
        let mut input = parsed();
        input.rows.push(vec!["Bob".into()]);
        input.rows.push(vec!["Ann".into(), "40".into(), "extra".into()]);
        let record = TableRecord::from_parsed(input, "doc.md", 0).unwrap();
        assert!(!record.metadata.is_valid);
        assert_eq!(record.metadata.issues.len(), 2);
        assert!(record.rows.iter().all(|row| row.len() == 2));
        assert_eq!(record.rows[2], vec!["Bob".to_string(), String::new()]);
        assert_eq!(record.rows[3], vec!["Ann".to_string(), "40".to_string()]);
    }

    #[test]
    fn derived_counts_and_queries() {
        let record = TableRecord::from_parsed(parsed(), "doc.md", 3).unwrap();
        assert_eq!(record.metadata.row_count, 2);
        assert_eq!(record.metadata.column_count, 2);
        assert_eq!(record.metadata.table_index, 3);
        assert_eq!(record.cell(1, 0).unwrap(), "Jane");
        assert_eq!(record.header(1).unwrap(), "Age");
        assert_eq!(record.column(1).unwrap(), vec!["25", "30"]);
        assert!(matches!(
            record.cell(5, 0),
            Err(TableError::CellOutOfRange { .. })
        ));
    }

    #[test]
    fn fill_rate_and_widths() {
        let mut input = parsed();
        input.rows[1][1] = String::new();
        let record = TableRecord::from_parsed(input, "doc.md", 0).unwrap();
        assert_eq!(record.fill_rate(), 0.75);
        assert_eq!(record.column_widths(), vec![4, 3]);
        assert!(!record.is_blank());
        assert!(!record.is_empty());
    }

    #[test]
    fn reflow_drops_unparseable_ruler() {
        let mut input = parsed();
        input.separator_line = Some("not a ruler".into());
        let mut record = TableRecord::from_parsed(input, "doc.md", 0).unwrap();
        record.reflow_separator(|tokens| tokens.push(ColumnAlignment::None));
        assert_eq!(record.separator_line, None);
    }

    #[test]
    fn reflow_rewrites_tokens() {
        let mut input = parsed();
        input.separator_line = Some("|:---|---:|".into());
        let mut record = TableRecord::from_parsed(input, "doc.md", 0).unwrap();
        record.reflow_separator(|tokens| {
            tokens.remove(0);
        });
        assert_eq!(record.separator_line.as_deref(), Some("| --: |"));
    }
}
