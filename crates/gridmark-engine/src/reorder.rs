//! Validated single- and multi-index moves for rows and columns.

use gridmark_model::{TableError, TableRecord};
use serde::{Deserialize, Serialize};

use crate::TableEditor;

/// Why a proposed move is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveIssue {
    SourceOutOfRange,
    TargetOutOfRange,
    SamePosition,
}

/// Result of a non-mutating move validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveValidation {
    pub is_valid: bool,
    pub issue: Option<MoveIssue>,
}

/// Outcome of a `*_safe` move. Never an error: `previous_state` always holds
/// the pre-move snapshot so the caller can roll back without its own deep
/// copy.
#[derive(Debug, Clone, PartialEq)]
pub struct SafeMove {
    pub success: bool,
    pub error: Option<TableError>,
    pub previous_state: TableRecord,
}

impl TableEditor {
    /// Move one row so its final index is `to`. A same-index move is a silent
    /// no-op.
    pub fn move_row(&mut self, from: usize, to: usize) -> Result<(), TableError> {
        let len = self.record.rows.len();
        if from >= len || to >= len {
            return Err(TableError::MoveOutOfRange { from, to, len });
        }
        if from == to {
            return Ok(());
        }
        move_one(&mut self.record.rows, from, to);
        self.finish_structural_edit();
        Ok(())
    }

    /// Move one column, carrying header, cells, and ruler token along.
    pub fn move_column(&mut self, from: usize, to: usize) -> Result<(), TableError> {
        let len = self.record.headers.len();
        if from >= len || to >= len {
            return Err(TableError::MoveOutOfRange { from, to, len });
        }
        if from == to {
            return Ok(());
        }
        move_one(&mut self.record.headers, from, to);
        for row in &mut self.record.rows {
            move_one(row, from, to);
        }
        self.record.reflow_separator(|tokens| {
            if from < tokens.len() && to < tokens.len() {
                move_one(tokens, from, to);
            }
        });
        self.finish_structural_edit();
        Ok(())
    }

    /// Move several rows to the insertion gap `target` (`0..=len`), keeping
    /// their relative order. Sources are deduplicated; out-of-range sources
    /// are dropped; an empty resulting set is a no-op.
    pub fn move_rows(&mut self, indices: &[usize], target: usize) -> Result<(), TableError> {
        let len = self.record.rows.len();
        if target > len {
            return Err(TableError::DropTargetOutOfRange { target, len });
        }
        let sources = normalize_sources(indices, len);
        if sources.is_empty() {
            return Ok(());
        }
        move_many(&mut self.record.rows, &sources, target);
        self.finish_structural_edit();
        Ok(())
    }

    pub fn move_columns(&mut self, indices: &[usize], target: usize) -> Result<(), TableError> {
        let len = self.record.headers.len();
        if target > len {
            return Err(TableError::DropTargetOutOfRange { target, len });
        }
        let sources = normalize_sources(indices, len);
        if sources.is_empty() {
            return Ok(());
        }
        move_many(&mut self.record.headers, &sources, target);
        for row in &mut self.record.rows {
            move_many(row, &sources, target);
        }
        self.record.reflow_separator(|tokens| {
            if sources.iter().all(|&s| s < tokens.len()) && target <= tokens.len() {
                move_many(tokens, &sources, target);
            } else {
                log::debug!(
                    "ruler has {} tokens for {} columns; leaving it as-is for this move",
                    tokens.len(),
                    len
                );
            }
        });
        self.finish_structural_edit();
        Ok(())
    }

    /// Non-mutating move check, distinguishing bad source, bad target, and
    /// same-position.
    pub fn validate_row_move(&self, from: usize, to: usize) -> MoveValidation {
        validate_move(from, to, self.record.rows.len())
    }

    pub fn validate_column_move(&self, from: usize, to: usize) -> MoveValidation {
        validate_move(from, to, self.record.headers.len())
    }

    /// Non-throwing move for interactive gestures: captures a snapshot,
    /// attempts the move, and reports the outcome alongside rollback data.
    pub fn move_row_safe(&mut self, from: usize, to: usize) -> SafeMove {
        let previous_state = self.record.clone();
        match self.move_row(from, to) {
            Ok(()) => SafeMove {
                success: true,
                error: None,
                previous_state,
            },
            Err(error) => SafeMove {
                success: false,
                error: Some(error),
                previous_state,
            },
        }
    }

    pub fn move_column_safe(&mut self, from: usize, to: usize) -> SafeMove {
        let previous_state = self.record.clone();
        match self.move_column(from, to) {
            Ok(()) => SafeMove {
                success: true,
                error: None,
                previous_state,
            },
            Err(error) => SafeMove {
                success: false,
                error: Some(error),
                previous_state,
            },
        }
    }
}

fn validate_move(from: usize, to: usize, len: usize) -> MoveValidation {
    let issue = if from >= len {
        Some(MoveIssue::SourceOutOfRange)
    } else if to >= len {
        Some(MoveIssue::TargetOutOfRange)
    } else if from == to {
        Some(MoveIssue::SamePosition)
    } else {
        None
    };
    MoveValidation {
        is_valid: issue.is_none(),
        issue,
    }
}

fn normalize_sources(indices: &[usize], len: usize) -> Vec<usize> {
    let mut sources: Vec<usize> = indices.iter().copied().filter(|&i| i < len).collect();
    sources.sort_unstable();
    sources.dedup();
    sources
}

pub(crate) fn move_one<T>(items: &mut Vec<T>, from: usize, to: usize) {
    let item = items.remove(from);
    items.insert(to, item);
}

/// Move `sources` (sorted, unique, in-range) so the block lands at insertion
/// gap `target`, preserving the relative order of the moved items.
pub(crate) fn move_many<T>(items: &mut Vec<T>, sources: &[usize], target: usize) {
    let mut moved = Vec::with_capacity(sources.len());
    for &index in sources.iter().rev() {
        moved.push(items.remove(index));
    }
    moved.reverse();
    let shifted = target - sources.iter().filter(|&&s| s < target).count();
    items.splice(shifted..shifted, moved);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_one_places_item_at_target() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        move_one(&mut items, 0, 2);
        assert_eq!(items, vec!['b', 'c', 'a', 'd']);
        move_one(&mut items, 3, 0);
        assert_eq!(items, vec!['d', 'b', 'c', 'a']);
    }

    #[test]
    fn move_many_keeps_relative_order() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];
        move_many(&mut items, &[1, 3], 0);
        assert_eq!(items, vec!['b', 'd', 'a', 'c', 'e']);
    }

    #[test]
    fn move_many_accounts_for_removed_items_below_target() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e'];
        move_many(&mut items, &[0, 1], 5);
        assert_eq!(items, vec!['c', 'd', 'e', 'a', 'b']);
    }
}
