/// Data layer: core types, loading, filtering and derived metrics.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable (10 positional columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop athletes measured only once
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ metrics   │  sum of seven + lean mass index → WorkingSet
///   └──────────┘
/// ```

pub mod date;
pub mod filter;
pub mod loader;
pub mod metrics;
pub mod model;
