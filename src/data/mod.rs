/// Data layer: core types and series file I/O.
///
/// Architecture:
/// ```text
///       rates.csv
///           │
///           ▼
///     ┌──────────┐
///     │  loader   │  parse file → Series
///     └──────────┘
///           │
///           ▼
///     ┌──────────┐
///     │  Series   │  Schema + Vec<Row>, file order
///     └──────────┘
///           │
///           ▼
///   partition / query / annotate
/// ```

pub mod loader;
pub mod model;
