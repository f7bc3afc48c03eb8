//! `gridmark-engine` is the synchronous, single-writer mutation engine over
//! one [`TableRecord`](gridmark_model::TableRecord).
//!
//! Four algorithm groups share the record: the structural editor (cell/row/
//! column CRUD, batch edits, find/replace), the ordering engine (single- and
//! multi-key sort, natural sort, shuffle, column statistics), the reorder
//! engine (validated single/multi-index moves), and a drag state machine that
//! wraps reordering under live previews. Every operation validates before it
//! mutates and notifies listeners after.

mod drag;
mod editor;
mod ordering;
mod reorder;
mod structural;

pub use drag::{DragContext, DragKind, DragObserver, DragState};
pub use editor::TableEditor;
pub use ordering::SortOptions;
pub use reorder::{MoveIssue, MoveValidation, SafeMove};
pub use structural::{CellUpdate, FindReplaceOptions};
