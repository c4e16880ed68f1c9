/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///      .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  bytes → UTF-8 → header + records → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Row>, header order
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  distinct values per column, (field == value) → row indices
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
