use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Apply this direction to an ascending comparison result.
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// Requested comparison type for a sort. `Auto` means "detect from the
/// column's values".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDataType {
    #[default]
    Auto,
    Text,
    Number,
    Date,
}

/// Comparison type actually used for a column, after detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnDataType {
    Text,
    Number,
    Date,
}

/// The last ordering applied to the record. Indicator display only; cleared by
/// any operation that does not preserve a column-expressible order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
    pub data_type: ColumnDataType,
}

/// Per-column sort indicator for grid headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortIndicator {
    pub direction: Option<SortDirection>,
    pub is_primary: bool,
}

/// One key in a multi-column sort; evaluated in order with short-circuit
/// tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCriterion {
    pub column: usize,
    pub direction: SortDirection,
    #[serde(default)]
    pub data_type: SortDataType,
}

/// Summary statistics for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub data_type: ColumnDataType,
    /// Distinct non-empty values.
    pub unique_values: usize,
    pub empty_values: usize,
    /// Smallest/largest value under the detected comparison, as source text.
    pub min: Option<String>,
    pub max: Option<String>,
    /// Up to five distinct values in row order.
    pub samples: Vec<String>,
}
