/// Data layer: sheet model, cohort split, column resolution, extraction and
/// aggregation. Nothing here depends on the UI.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (row 0 title, row 1 header)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Session   │  ColumnIndex, VariableList, TSA/DT CohortTables
///   └──────────┘
///        │  Selection (zone, variable, stimulus)
///        ▼
///   ┌──────────┐
///   │ pipeline  │  resolve → filter/extract → aggregate → ChartData
///   └──────────┘
/// ```

pub mod aggregate;
pub mod cohort;
pub mod domain;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod variable;
