//! Cell, row, and column CRUD plus batch edits, duplication, clearing, and
//! find/replace.

use gridmark_model::{CellKey, ColumnAlignment, TableError};
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use crate::TableEditor;

/// One entry in a batch cell update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellUpdate {
    pub key: CellKey,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindReplaceOptions {
    /// Treat the pattern as a regular expression instead of literal text.
    #[serde(default)]
    pub use_regex: bool,
    #[serde(default)]
    pub case_sensitive: bool,
    /// Bound the pattern with word boundaries, in both literal and regex mode.
    #[serde(default)]
    pub whole_word: bool,
    #[serde(default)]
    pub include_headers: bool,
}

impl TableEditor {
    pub fn update_cell(
        &mut self,
        row: usize,
        col: usize,
        value: impl Into<String>,
    ) -> Result<(), TableError> {
        self.record.check_cell_index(row, col)?;
        self.record.rows[row][col] = value.into();
        self.record.mark_edited(CellKey::Cell { row, col });
        self.finish_value_edit();
        Ok(())
    }

    pub fn update_header(&mut self, col: usize, value: impl Into<String>) -> Result<(), TableError> {
        self.record.check_column_index(col)?;
        self.record.headers[col] = value.into();
        self.record.mark_edited(CellKey::Header { col });
        self.finish_value_edit();
        Ok(())
    }

    /// Apply a list of cell updates atomically: every entry is validated
    /// before any cell is written, so a bad entry fails the whole batch.
    pub fn batch_update_cells(&mut self, updates: &[CellUpdate]) -> Result<(), TableError> {
        for update in updates {
            match update.key {
                CellKey::Header { col } => self.record.check_column_index(col)?,
                CellKey::Cell { row, col } => self.record.check_cell_index(row, col)?,
            }
        }
        if updates.is_empty() {
            return Ok(());
        }
        for update in updates {
            match update.key {
                CellKey::Header { col } => self.record.headers[col] = update.value.clone(),
                CellKey::Cell { row, col } => self.record.rows[row][col] = update.value.clone(),
            }
            self.record.mark_edited(update.key);
        }
        self.finish_value_edit();
        Ok(())
    }

    /// Insert `count` blank rows at `index` (append when `None`).
    pub fn add_row(&mut self, index: Option<usize>, count: usize) -> Result<(), TableError> {
        if count == 0 {
            return Err(TableError::InvalidCount { count });
        }
        let at = index.unwrap_or(self.record.rows.len());
        if at > self.record.rows.len() {
            return Err(TableError::RowOutOfRange {
                row: at,
                row_count: self.record.rows.len(),
            });
        }
        let width = self.record.headers.len();
        self.record
            .rows
            .splice(at..at, std::iter::repeat_with(|| vec![String::new(); width]).take(count));
        self.finish_structural_edit();
        Ok(())
    }

    pub fn insert_rows(&mut self, start: usize, count: usize) -> Result<(), TableError> {
        self.add_row(Some(start), count)
    }

    pub fn delete_row(&mut self, index: usize) -> Result<(), TableError> {
        self.record.check_row_index(index)?;
        self.record.rows.remove(index);
        self.finish_structural_edit();
        Ok(())
    }

    /// Delete several rows at once. Indices are deduplicated and removed
    /// highest-first so earlier indices stay valid; any out-of-range index
    /// fails the whole call before anything is removed.
    pub fn delete_rows(&mut self, indices: &[usize]) -> Result<(), TableError> {
        for &index in indices {
            self.record.check_row_index(index)?;
        }
        let mut ordered = indices.to_vec();
        ordered.sort_unstable();
        ordered.dedup();
        if ordered.is_empty() {
            return Ok(());
        }
        for &index in ordered.iter().rev() {
            self.record.rows.remove(index);
        }
        self.finish_structural_edit();
        Ok(())
    }

    /// Insert one column at `index` (append when `None`), named explicitly or
    /// with a generated default.
    pub fn add_column(&mut self, index: Option<usize>, name: Option<&str>) -> Result<(), TableError> {
        let at = index.unwrap_or(self.record.headers.len());
        self.insert_columns(at, 1, name.map(|n| vec![n.to_string()]))
    }

    /// Insert `count` blank columns at `start`. An explicit name list must
    /// have exactly `count` entries; otherwise names default to `Column N`.
    pub fn insert_columns(
        &mut self,
        start: usize,
        count: usize,
        names: Option<Vec<String>>,
    ) -> Result<(), TableError> {
        if count == 0 {
            return Err(TableError::InvalidCount { count });
        }
        let columns = self.record.headers.len();
        if start > columns {
            return Err(TableError::ColumnOutOfRange {
                col: start,
                column_count: columns,
            });
        }
        if let Some(names) = &names {
            if names.len() != count {
                return Err(TableError::NameCountMismatch {
                    expected: count,
                    got: names.len(),
                });
            }
        }
        let names = names.unwrap_or_else(|| {
            (0..count)
                .map(|i| format!("Column {}", columns + i + 1))
                .collect()
        });

        self.record.headers.splice(start..start, names);
        for row in &mut self.record.rows {
            row.splice(start..start, std::iter::repeat_with(String::new).take(count));
        }
        self.record.reflow_separator(|tokens| {
            let at = start.min(tokens.len());
            tokens.splice(at..at, std::iter::repeat(ColumnAlignment::default()).take(count));
        });
        self.finish_structural_edit();
        Ok(())
    }

    pub fn delete_column(&mut self, index: usize) -> Result<(), TableError> {
        self.delete_columns(&[index])
    }

    /// Delete several columns at once. Fails if the result would have zero
    /// columns.
    pub fn delete_columns(&mut self, indices: &[usize]) -> Result<(), TableError> {
        for &index in indices {
            self.record.check_column_index(index)?;
        }
        let mut ordered = indices.to_vec();
        ordered.sort_unstable();
        ordered.dedup();
        if ordered.is_empty() {
            return Ok(());
        }
        if ordered.len() >= self.record.headers.len() {
            return Err(TableError::LastColumn);
        }
        for &index in ordered.iter().rev() {
            self.record.headers.remove(index);
            for row in &mut self.record.rows {
                row.remove(index);
            }
        }
        self.record.reflow_separator(|tokens| {
            for &index in ordered.iter().rev() {
                if index < tokens.len() {
                    tokens.remove(index);
                }
            }
        });
        self.finish_structural_edit();
        Ok(())
    }

    /// Replace a whole row. The value list must match the column count.
    pub fn update_row(&mut self, index: usize, values: Vec<String>) -> Result<(), TableError> {
        self.record.check_row_index(index)?;
        let expected = self.record.headers.len();
        if values.len() != expected {
            return Err(TableError::RowLengthMismatch {
                expected,
                got: values.len(),
            });
        }
        self.record.rows[index] = values;
        for col in 0..expected {
            self.record.mark_edited(CellKey::Cell { row: index, col });
        }
        self.finish_value_edit();
        Ok(())
    }

    /// Replace a whole column, optionally renaming its header. The value list
    /// must match the row count.
    pub fn update_column(
        &mut self,
        index: usize,
        values: Vec<String>,
        new_header: Option<&str>,
    ) -> Result<(), TableError> {
        self.record.check_column_index(index)?;
        let expected = self.record.rows.len();
        if values.len() != expected {
            return Err(TableError::ColumnLengthMismatch {
                expected,
                got: values.len(),
            });
        }
        for (row, value) in values.into_iter().enumerate() {
            self.record.rows[row][index] = value;
            self.record.mark_edited(CellKey::Cell { row, col: index });
        }
        if let Some(header) = new_header {
            self.record.headers[index] = header.to_string();
            self.record.mark_edited(CellKey::Header { col: index });
        }
        self.finish_value_edit();
        Ok(())
    }

    /// Replace the whole record contents (the external-reload path).
    ///
    /// Clears edit tracking, raw lines, and sort state; rows are normalized
    /// to the new header length.
    pub fn replace_contents(
        &mut self,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        separator_line: Option<String>,
    ) -> Result<(), TableError> {
        if headers.is_empty() {
            return Err(TableError::EmptyHeaders);
        }
        let expected = headers.len();
        let mut rows = rows;
        for row in &mut rows {
            row.resize(expected, String::new());
        }
        self.record.headers = headers;
        self.record.rows = rows;
        self.record.edited_cells.clear();
        self.record.raw_lines = None;
        self.record.separator_line = separator_line;
        self.record.sort_state = None;
        self.record.touch();
        self.notify_change();
        Ok(())
    }

    pub fn clear_row(&mut self, index: usize) -> Result<(), TableError> {
        self.record.check_row_index(index)?;
        for col in 0..self.record.headers.len() {
            self.record.rows[index][col].clear();
            self.record.mark_edited(CellKey::Cell { row: index, col });
        }
        self.finish_value_edit();
        Ok(())
    }

    pub fn clear_column(&mut self, index: usize) -> Result<(), TableError> {
        self.record.check_column_index(index)?;
        for row in 0..self.record.rows.len() {
            self.record.rows[row][index].clear();
            self.record.mark_edited(CellKey::Cell { row, col: index });
        }
        self.finish_value_edit();
        Ok(())
    }

    /// Blank every data cell, leaving headers and structure intact.
    pub fn clear_all_cells(&mut self) {
        for row in 0..self.record.rows.len() {
            for col in 0..self.record.headers.len() {
                self.record.rows[row][col].clear();
                self.record.mark_edited(CellKey::Cell { row, col });
            }
        }
        self.finish_value_edit();
    }

    /// Clone a row, inserting at `insert_at` or immediately after the source.
    pub fn duplicate_row(&mut self, index: usize, insert_at: Option<usize>) -> Result<(), TableError> {
        self.record.check_row_index(index)?;
        let at = insert_at.unwrap_or(index + 1);
        if at > self.record.rows.len() {
            return Err(TableError::RowOutOfRange {
                row: at,
                row_count: self.record.rows.len(),
            });
        }
        let row = self.record.rows[index].clone();
        self.record.rows.insert(at, row);
        self.finish_structural_edit();
        Ok(())
    }

    /// Clone a column, inserting at `insert_at` or immediately after the
    /// source. The duplicated header gets a " Copy" suffix.
    pub fn duplicate_column(
        &mut self,
        index: usize,
        insert_at: Option<usize>,
    ) -> Result<(), TableError> {
        self.record.check_column_index(index)?;
        let columns = self.record.headers.len();
        let at = insert_at.unwrap_or(index + 1);
        if at > columns {
            return Err(TableError::ColumnOutOfRange {
                col: at,
                column_count: columns,
            });
        }
        let header = format!("{} Copy", self.record.headers[index]);
        self.record.headers.insert(at, header);
        for row in &mut self.record.rows {
            let cell = row[index].clone();
            row.insert(at, cell);
        }
        self.record.reflow_separator(|tokens| {
            if index < tokens.len() {
                let token = tokens[index];
                tokens.insert(at.min(tokens.len()), token);
            }
        });
        self.finish_structural_edit();
        Ok(())
    }

    /// Replace every occurrence of `pattern` across data cells (and headers
    /// when requested), returning the number of replacements.
    pub fn find_and_replace(
        &mut self,
        pattern: &str,
        replacement: &str,
        options: &FindReplaceOptions,
    ) -> Result<usize, TableError> {
        let regex = build_pattern(pattern, options)?;
        let mut replaced = 0usize;

        for row in 0..self.record.rows.len() {
            for col in 0..self.record.headers.len() {
                let hits = regex.find_iter(&self.record.rows[row][col]).count();
                if hits == 0 {
                    continue;
                }
                let value =
                    apply_replacement(&regex, &self.record.rows[row][col], replacement, options);
                self.record.rows[row][col] = value;
                self.record.mark_edited(CellKey::Cell { row, col });
                replaced += hits;
            }
        }
        if options.include_headers {
            for col in 0..self.record.headers.len() {
                let hits = regex.find_iter(&self.record.headers[col]).count();
                if hits == 0 {
                    continue;
                }
                let value =
                    apply_replacement(&regex, &self.record.headers[col], replacement, options);
                self.record.headers[col] = value;
                self.record.mark_edited(CellKey::Header { col });
                replaced += hits;
            }
        }

        if replaced > 0 {
            self.finish_value_edit();
        }
        Ok(replaced)
    }
}

fn build_pattern(pattern: &str, options: &FindReplaceOptions) -> Result<Regex, TableError> {
    let body = if options.use_regex {
        pattern.to_string()
    } else {
        regex::escape(pattern)
    };
    let body = if options.whole_word {
        format!(r"\b(?:{body})\b")
    } else {
        body
    };
    let body = if options.case_sensitive {
        body
    } else {
        format!("(?i){body}")
    };
    Regex::new(&body).map_err(|e| TableError::InvalidPattern {
        reason: e.to_string(),
    })
}

fn apply_replacement(
    regex: &Regex,
    text: &str,
    replacement: &str,
    options: &FindReplaceOptions,
) -> String {
    if options.use_regex {
        regex.replace_all(text, replacement).into_owned()
    } else {
        // Literal mode: `$` in the replacement is plain text.
        regex.replace_all(text, NoExpand(replacement)).into_owned()
    }
}
