use serde::{Deserialize, Serialize};

/// Identifier for a single editable cell in a table record.
///
/// Header cells carry only a column; data cells carry a row and a column.
/// Using a tagged key (rather than a sentinel row number) keeps the
/// edited-cell set self-describing across serde boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKey {
    Header { col: usize },
    Cell { row: usize, col: usize },
}

impl CellKey {
    pub fn col(&self) -> usize {
        match *self {
            CellKey::Header { col } | CellKey::Cell { col, .. } => col,
        }
    }

    /// Row index for data cells; `None` for header cells.
    pub fn row(&self) -> Option<usize> {
        match *self {
            CellKey::Header { .. } => None,
            CellKey::Cell { row, .. } => Some(row),
        }
    }
}
