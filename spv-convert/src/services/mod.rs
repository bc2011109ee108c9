//! Transform services: load CSV tables, normalize rows, build viewer records

pub mod annotated;
pub mod normalizer;
pub mod table_loader;
pub mod threads;

pub use annotated::{convert_annotated, AnnotatedOutput};
pub use normalizer::{normalize_row, parse_vaccine_types, FieldFallback};
pub use table_loader::{load_table, read_table, TableSchema, ANNOTATED_SCHEMA, THREADS_SCHEMA};
pub use threads::convert_threads;
