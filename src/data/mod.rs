/// Data layer: typed tables read from delimited text.
///
/// Architecture:
/// ```text
///   .csv / any io::Read
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  header row → names, first data row → types
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ RecordSet │  Arrow RecordBatch, one Int64/Float64/Utf8 column per field
///   └───────────┘
/// ```

pub mod loader;
pub mod model;
