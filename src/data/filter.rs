use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::model::Dataset;
use crate::config::ColumnDef;

// ---------------------------------------------------------------------------
// Filter options: distinct values per configured column
// ---------------------------------------------------------------------------

/// field key → distinct cell values, in order of first occurrence.
pub type FilterOptions = BTreeMap<String, Vec<String>>;

/// Collect the distinct values of every configured column.
///
/// One pass over the rows per column. Rows lacking the key contribute
/// nothing, so a column absent from the file gets an empty option list.
/// Empty cells are left out: `""` is the dropdown placeholder.
pub fn compute_filter_options(dataset: &Dataset, columns: &[ColumnDef]) -> FilterOptions {
    columns
        .iter()
        .map(|col| {
            let mut seen = HashSet::new();
            let values: Vec<String> = dataset
                .rows
                .iter()
                .filter_map(|row| row.get(&col.key))
                .filter(|v| !v.is_empty() && seen.insert(*v))
                .map(str::to_string)
                .collect();
            (col.key.clone(), values)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Active filter: at most one (field, value) criterion
// ---------------------------------------------------------------------------

/// The single criterion restricting the visible rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    pub field: String,
    pub value: String,
}

impl ActiveFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        ActiveFilter {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.field, self.value)
    }
}

/// Return indices of rows whose `field` cell equals `value` exactly.
///
/// * Source order is preserved.
/// * No trimming, case folding or numeric coercion.
/// * An empty `value` is the unselected placeholder → every row.
/// * A `field` the dataset has no column for → every row (fail-open).
pub fn apply_filter(dataset: &Dataset, field: &str, value: &str) -> Vec<usize> {
    if value.is_empty() {
        return clear_filter(dataset);
    }
    if !dataset.has_column(field) {
        log::warn!("Filter on unknown column {field:?} ignored, showing all rows");
        return clear_filter(dataset);
    }

    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.get(field) == Some(value))
        .map(|(i, _)| i)
        .collect()
}

/// Every row, in source order.
pub fn clear_filter(dataset: &Dataset) -> Vec<usize> {
    (0..dataset.len()).collect()
}
