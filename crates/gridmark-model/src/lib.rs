//! `gridmark-model` defines the owned in-memory state of one edited pipe table.
//!
//! The crate is intentionally self-contained so it can be reused by:
//! - the mutation engine (structural edits, sorting, reordering, drag)
//! - the markdown serializer
//! - webview/IPC boundaries via `serde` (JSON-safe schema)

mod error;
mod key;
mod record;
pub mod separator;
mod sort;

pub use error::TableError;
pub use key::CellKey;
pub use record::{ParsedTable, TableMetadata, TableRecord, TimestampMs};
pub use separator::{parse_separator_line, render_separator_line, ColumnAlignment};
pub use sort::{
    ColumnDataType, ColumnStats, SortCriterion, SortDataType, SortDirection, SortIndicator,
    SortState,
};
