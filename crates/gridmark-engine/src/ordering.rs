//! Sorting, shuffling, and column statistics.
//!
//! Row order changes invalidate the record's verbatim source lines the same
//! way structural edits do, so every sort here finishes as a structural edit.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::iter::Peekable;
use std::str::Chars;

use chrono::{NaiveDate, NaiveDateTime};
use gridmark_model::{
    ColumnDataType, ColumnStats, SortCriterion, SortDataType, SortDirection, SortIndicator,
    SortState, TableError,
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::TableEditor;

/// Options for [`TableEditor::sort_by_column_advanced`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOptions {
    #[serde(default)]
    pub data_type: SortDataType,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl TableEditor {
    /// Sort by one column with automatic type detection: numeric when every
    /// non-empty value parses as a number, date when every non-empty value
    /// parses as a date, text otherwise.
    pub fn sort_by_column(&mut self, col: usize, direction: SortDirection) -> Result<(), TableError> {
        self.sort_by_column_advanced(col, direction, &SortOptions::default())
    }

    pub fn sort_by_column_advanced(
        &mut self,
        col: usize,
        direction: SortDirection,
        options: &SortOptions,
    ) -> Result<(), TableError> {
        self.record.check_column_index(col)?;
        let data_type = resolve_data_type(options.data_type, &self.record.rows, col);
        let case_sensitive = options.case_sensitive;
        self.record
            .rows
            .sort_by(|a, b| direction.apply(compare_cells(&a[col], &b[col], data_type, case_sensitive)));
        self.record.sort_state = Some(SortState {
            column: col,
            direction,
            data_type,
        });
        self.finish_structural_edit();
        Ok(())
    }

    /// Sort by one column with a caller-supplied cell comparator, bypassing
    /// type detection entirely.
    pub fn sort_by_column_with(
        &mut self,
        col: usize,
        direction: SortDirection,
        mut compare: impl FnMut(&str, &str) -> Ordering,
    ) -> Result<(), TableError> {
        self.record.check_column_index(col)?;
        self.record
            .rows
            .sort_by(|a, b| direction.apply(compare(&a[col], &b[col])));
        self.record.sort_state = Some(SortState {
            column: col,
            direction,
            data_type: ColumnDataType::Text,
        });
        self.finish_structural_edit();
        Ok(())
    }

    /// Sort by several columns with short-circuit tie-breaking in criterion
    /// order. An empty criteria list is a no-op; the first criterion is
    /// recorded as the sort state.
    pub fn sort_by_multiple_columns(&mut self, criteria: &[SortCriterion]) -> Result<(), TableError> {
        if criteria.is_empty() {
            return Ok(());
        }
        for criterion in criteria {
            self.record.check_column_index(criterion.column)?;
        }
        let resolved: Vec<(usize, SortDirection, ColumnDataType)> = criteria
            .iter()
            .map(|c| {
                (
                    c.column,
                    c.direction,
                    resolve_data_type(c.data_type, &self.record.rows, c.column),
                )
            })
            .collect();
        self.record.rows.sort_by(|a, b| {
            for &(col, direction, data_type) in &resolved {
                let ord = direction.apply(compare_cells(&a[col], &b[col], data_type, false));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        let (column, direction, data_type) = resolved[0];
        self.record.sort_state = Some(SortState {
            column,
            direction,
            data_type,
        });
        self.finish_structural_edit();
        Ok(())
    }

    /// Natural sort: digit runs compare by numeric value, so "Item2" sorts
    /// before "Item10".
    pub fn sort_natural(&mut self, col: usize, direction: SortDirection) -> Result<(), TableError> {
        self.record.check_column_index(col)?;
        self.record
            .rows
            .sort_by(|a, b| direction.apply(natural_cmp(&a[col], &b[col])));
        self.record.sort_state = Some(SortState {
            column: col,
            direction,
            data_type: ColumnDataType::Text,
        });
        self.finish_structural_edit();
        Ok(())
    }

    /// Sort with a whole-row comparator. The resulting order is not
    /// expressible as column + direction, so the sort state is cleared.
    pub fn sort_by_custom(&mut self, mut compare: impl FnMut(&[String], &[String]) -> Ordering) {
        self.record.rows.sort_by(|a, b| compare(a, b));
        self.record.sort_state = None;
        self.finish_structural_edit();
    }

    pub fn shuffle_rows(&mut self) {
        self.record.rows.shuffle(&mut rand::thread_rng());
        self.record.sort_state = None;
        self.finish_structural_edit();
    }

    /// Reverse the row order. When a sort state exists this flips its
    /// direction; otherwise the rows flip with no state change.
    pub fn reverse_rows(&mut self) {
        self.record.rows.reverse();
        if let Some(state) = &mut self.record.sort_state {
            state.direction = state.direction.reversed();
        }
        self.finish_structural_edit();
    }

    /// Detected type, unique/empty counts, min/max, and up to five sample
    /// values for one column.
    pub fn column_stats(&self, col: usize) -> Result<ColumnStats, TableError> {
        self.record.check_column_index(col)?;
        let data_type = detect_column_type(&self.record.rows, col);

        let values: Vec<&str> = self.record.rows.iter().map(|row| row[col].as_str()).collect();
        let empty_values = values.iter().filter(|v| v.trim().is_empty()).count();
        let non_empty: Vec<&str> = values
            .into_iter()
            .filter(|v| !v.trim().is_empty())
            .collect();
        let unique_values = non_empty.iter().copied().collect::<HashSet<_>>().len();

        let mut min: Option<&str> = None;
        let mut max: Option<&str> = None;
        for &value in &non_empty {
            if min.is_none_or(|m| compare_cells(value, m, data_type, true) == Ordering::Less) {
                min = Some(value);
            }
            if max.is_none_or(|m| compare_cells(value, m, data_type, true) == Ordering::Greater) {
                max = Some(value);
            }
        }

        let mut samples = Vec::new();
        let mut seen = HashSet::new();
        for &value in &non_empty {
            if samples.len() == 5 {
                break;
            }
            if seen.insert(value) {
                samples.push(value.to_string());
            }
        }

        Ok(ColumnStats {
            data_type,
            unique_values,
            empty_values,
            min: min.map(str::to_string),
            max: max.map(str::to_string),
            samples,
        })
    }

    /// One indicator per column; all `None`/`false` when no sort is active.
    pub fn sort_indicators(&self) -> Vec<SortIndicator> {
        let state = self.record.sort_state;
        (0..self.record.headers.len())
            .map(|col| match state {
                Some(s) if s.column == col => SortIndicator {
                    direction: Some(s.direction),
                    is_primary: true,
                },
                _ => SortIndicator {
                    direction: None,
                    is_primary: false,
                },
            })
            .collect()
    }
}

fn resolve_data_type(requested: SortDataType, rows: &[Vec<String>], col: usize) -> ColumnDataType {
    match requested {
        SortDataType::Auto => detect_column_type(rows, col),
        SortDataType::Text => ColumnDataType::Text,
        SortDataType::Number => ColumnDataType::Number,
        SortDataType::Date => ColumnDataType::Date,
    }
}

pub(crate) fn detect_column_type(rows: &[Vec<String>], col: usize) -> ColumnDataType {
    let mut saw_value = false;
    let mut all_numbers = true;
    let mut all_dates = true;
    for row in rows {
        let value = row[col].trim();
        if value.is_empty() {
            continue;
        }
        saw_value = true;
        if parse_number(value).is_none() {
            all_numbers = false;
        }
        if parse_date(value).is_none() {
            all_dates = false;
        }
        if !all_numbers && !all_dates {
            return ColumnDataType::Text;
        }
    }
    if saw_value && all_numbers {
        ColumnDataType::Number
    } else if saw_value && all_dates {
        ColumnDataType::Date
    } else {
        ColumnDataType::Text
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, format) {
            return Some(datetime);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Compare two cell texts under a detected type. Values that fail to parse
/// under a numeric/date comparison (empties included) sort last.
pub(crate) fn compare_cells(
    a: &str,
    b: &str,
    data_type: ColumnDataType,
    case_sensitive: bool,
) -> Ordering {
    match data_type {
        ColumnDataType::Number => compare_optional(parse_number(a), parse_number(b), f64::total_cmp),
        ColumnDataType::Date => compare_optional(parse_date(a), parse_date(b), NaiveDateTime::cmp),
        ColumnDataType::Text => {
            if case_sensitive {
                a.cmp(b)
            } else {
                a.to_lowercase().cmp(&b.to_lowercase())
            }
        }
    }
}

fn compare_optional<T>(a: Option<T>, b: Option<T>, compare: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => compare(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compare strings run-by-run, alternating digit and non-digit runs. Digit
/// runs compare by numeric value; other runs compare case-insensitively.
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a_runs = a.chars().peekable();
    let mut b_runs = b.chars().peekable();
    loop {
        match (next_run(&mut a_runs), next_run(&mut b_runs)) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some((true, x)), Some((true, y))) => {
                let ord = compare_digit_runs(&x, &y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some((_, x)), Some((_, y))) => {
                let ord = x.to_lowercase().cmp(&y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn next_run(chars: &mut Peekable<Chars>) -> Option<(bool, String)> {
    let digits = chars.peek()?.is_ascii_digit();
    let mut run = String::new();
    while let Some(&ch) = chars.peek() {
        if ch.is_ascii_digit() != digits {
            break;
        }
        run.push(ch);
        chars.next();
    }
    Some((digits, run))
}

fn compare_digit_runs(x: &str, y: &str) -> Ordering {
    // Compare by numeric value without parsing: strip leading zeros, then
    // longer means larger. Fall back to the raw runs so "01" and "1" still
    // order deterministically.
    let xs = x.trim_start_matches('0');
    let ys = y.trim_start_matches('0');
    xs.len()
        .cmp(&ys.len())
        .then_with(|| xs.cmp(ys))
        .then_with(|| x.cmp(y))
}
