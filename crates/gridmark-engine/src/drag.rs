//! Interactive drag-and-drop as an explicit two-state machine.
//!
//! Drop targets are insertion gaps (`0..=len`), not item indices: gap `g`
//! means "insert before the item currently at `g`". The two gaps adjacent to
//! the dragged item are excluded because dropping there changes nothing.

use gridmark_model::{TableError, TableRecord};
use serde::{Deserialize, Serialize};

use crate::reorder::move_one;
use crate::TableEditor;

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragKind {
    Row,
    Column,
}

/// Payload of an active drag. Exists only while `DragState::Dragging`.
#[derive(Debug, Clone, PartialEq)]
pub struct DragContext {
    pub kind: DragKind,
    pub drag_index: usize,
    /// Valid drop gaps, ascending.
    pub valid_targets: Vec<usize>,
    /// Speculative record for the most recent hover target.
    pub preview: Option<TableRecord>,
}

/// The drag gesture state. Carrying the payload only while dragging means
/// position updates and drops cannot be misused from idle.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragContext),
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }
}

/// Hook set for drag lifecycle callbacks. Every method defaults to a no-op so
/// observers implement only what they need.
pub trait DragObserver {
    fn drag_start(&mut self, _kind: DragKind, _index: usize) {}
    fn drag_over(&mut self, _target: usize, _is_valid: bool) {}
    fn drag_preview(&mut self, _preview: &TableRecord) {}
    fn drag_complete(&mut self, _kind: DragKind, _from: usize, _to: usize) {}
    fn drag_cancel(&mut self, _kind: DragKind) {}
}

impl TableEditor {
    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn start_row_drag(&mut self, index: usize) -> Result<(), TableError> {
        self.start_drag(DragKind::Row, index)
    }

    pub fn start_column_drag(&mut self, index: usize) -> Result<(), TableError> {
        self.start_drag(DragKind::Column, index)
    }

    fn start_drag(&mut self, kind: DragKind, index: usize) -> Result<(), TableError> {
        let len = match kind {
            DragKind::Row => self.record.rows.len(),
            DragKind::Column => self.record.headers.len(),
        };
        if index >= len {
            return Err(TableError::DragIndexOutOfRange { index, len });
        }
        // At most one active drag: starting over an active one cancels it.
        if self.drag.is_dragging() {
            self.cancel_drag_drop();
        }
        let valid_targets: Vec<usize> = (0..=len)
            .filter(|&gap| gap != index && gap != index + 1)
            .collect();
        self.drag = DragState::Dragging(DragContext {
            kind,
            drag_index: index,
            valid_targets,
            preview: None,
        });
        for observer in &mut self.drag_observers {
            observer.drag_start(kind, index);
        }
        Ok(())
    }

    /// Report whether `target` is a valid drop gap and rebuild the
    /// speculative preview. An invalid target still refreshes the preview (as
    /// the unchanged table) but reports `false`. Returns `false` when idle.
    pub fn update_drag_position(&mut self, target: usize) -> bool {
        let DragState::Dragging(context) = &self.drag else {
            return false;
        };
        let kind = context.kind;
        let drag_index = context.drag_index;
        let is_valid = context.valid_targets.contains(&target);

        let mut preview = self.record.clone();
        // The preview is speculative and never carries verbatim source lines,
        // whether or not the hovered gap is valid.
        preview.discard_raw_lines();
        if is_valid {
            apply_gap_move(&mut preview, kind, drag_index, target);
        }
        for observer in &mut self.drag_observers {
            observer.drag_over(target, is_valid);
            observer.drag_preview(&preview);
        }
        if let DragState::Dragging(context) = &mut self.drag {
            context.preview = Some(preview);
        }
        is_valid
    }

    /// Drop onto `target`. A valid gap performs the real move and returns
    /// `true`; anything else cancels with no mutation. Either way the machine
    /// returns to idle. Non-throwing by design: an errant drop is a gesture
    /// to cancel, not an error to surface.
    pub fn complete_drag_drop(&mut self, target: usize) -> bool {
        let DragState::Dragging(context) = std::mem::take(&mut self.drag) else {
            return false;
        };
        if !context.valid_targets.contains(&target) {
            for observer in &mut self.drag_observers {
                observer.drag_cancel(context.kind);
            }
            return false;
        }
        let to = gap_to_index(context.drag_index, target);
        let moved = match context.kind {
            DragKind::Row => self.move_row(context.drag_index, to),
            DragKind::Column => self.move_column(context.drag_index, to),
        };
        match moved {
            Ok(()) => {
                for observer in &mut self.drag_observers {
                    observer.drag_complete(context.kind, context.drag_index, to);
                }
                true
            }
            Err(_) => {
                for observer in &mut self.drag_observers {
                    observer.drag_cancel(context.kind);
                }
                false
            }
        }
    }

    /// Abandon an active drag with no mutation. No-op when idle.
    pub fn cancel_drag_drop(&mut self) {
        let DragState::Dragging(context) = std::mem::take(&mut self.drag) else {
            return;
        };
        for observer in &mut self.drag_observers {
            observer.drag_cancel(context.kind);
        }
    }
}

/// Map an insertion gap to the moved item's final index.
fn gap_to_index(from: usize, gap: usize) -> usize {
    if gap > from {
        gap - 1
    } else {
        gap
    }
}

fn apply_gap_move(record: &mut TableRecord, kind: DragKind, from: usize, gap: usize) {
    let to = gap_to_index(from, gap);
    match kind {
        DragKind::Row => move_one(&mut record.rows, from, to),
        DragKind::Column => {
            move_one(&mut record.headers, from, to);
            for row in &mut record.rows {
                move_one(row, from, to);
            }
            record.reflow_separator(|tokens| {
                if from < tokens.len() && to < tokens.len() {
                    move_one(tokens, from, to);
                }
            });
        }
    }
}
