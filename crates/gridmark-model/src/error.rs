use thiserror::Error;

/// Errors raised when constructing or mutating a table record.
///
/// All of these are deterministic caller-side bugs: they fail fast before any
/// mutation and carry no retry semantics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    // Bounds.
    #[error("row {row} is out of range (table has {row_count} rows)")]
    RowOutOfRange { row: usize, row_count: usize },
    #[error("column {col} is out of range (table has {column_count} columns)")]
    ColumnOutOfRange { col: usize, column_count: usize },
    #[error("cell ({row}, {col}) is out of range (table is {row_count}x{column_count})")]
    CellOutOfRange {
        row: usize,
        col: usize,
        row_count: usize,
        column_count: usize,
    },
    #[error("cannot move {from} to {to} (valid indices are 0..{len})")]
    MoveOutOfRange { from: usize, to: usize, len: usize },
    #[error("drag index {index} is out of range (0..{len})")]
    DragIndexOutOfRange { index: usize, len: usize },
    #[error("drop target {target} is out of range (0..={len})")]
    DropTargetOutOfRange { target: usize, len: usize },

    // Structural invariants.
    #[error("cannot delete the last column")]
    LastColumn,
    #[error("row has {got} values but the table has {expected} columns")]
    RowLengthMismatch { expected: usize, got: usize },
    #[error("column has {got} values but the table has {expected} rows")]
    ColumnLengthMismatch { expected: usize, got: usize },
    #[error("header list cannot be empty")]
    EmptyHeaders,

    // Arguments.
    #[error("count must be positive (got {count})")]
    InvalidCount { count: usize },
    #[error("expected {expected} column names but got {got}")]
    NameCountMismatch { expected: usize, got: usize },
    /// Regex compile failure; the reason is stringified so the enum stays `Eq`.
    #[error("invalid find pattern: {reason}")]
    InvalidPattern { reason: String },
}
