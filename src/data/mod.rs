/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  student-mat.csv  (semicolon-delimited, header row)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows → Dataset (bad rows dropped + warned)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │    Dataset    │  Vec<StudentRecord>, skipped-row count
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterCriteria → subset, order preserved
///   └──────────┘
/// ```
pub mod dictionary;
pub mod filter;
pub mod loader;
pub mod model;
