//! Data model: tagged cells, tables, and the viewer's record shapes

pub mod cell;
pub mod records;
pub mod table;

pub use cell::CellValue;
pub use records::{AnnotatedRecord, ParseError, ThreadMap, ThreadPost, THREAD_ID, VACCINE_TYPES};
pub use table::{TabularRow, Table};
