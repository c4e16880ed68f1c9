use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Row – one record of the CSV file
// ---------------------------------------------------------------------------

/// A single record: column name → raw cell text, exactly as parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: BTreeMap<String, String>,
}

impl Row {
    /// Cell value for `key`, or `None` when the row has no such column.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.cells.get(key).map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded file
// ---------------------------------------------------------------------------

/// The full parsed dataset. Created once per load and never mutated;
/// filtering produces index lists into `rows`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// Header fields in file order.
    pub columns: Vec<String>,
    /// All records in file order.
    pub rows: Vec<Row>,
    /// Records dropped while parsing (malformed or wrong field count).
    pub skipped_rows: usize,
}

impl Dataset {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Dataset {
            columns,
            rows,
            skipped_rows: 0,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `key` is one of the header fields.
    pub fn has_column(&self, key: &str) -> bool {
        self.columns.iter().any(|c| c == key)
    }

    /// Resolve a list of row indices to rows, skipping out-of-range entries.
    pub fn select<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a Row> + 'a {
        indices.iter().filter_map(|&i| self.rows.get(i))
    }
}
