//! FILENAME: core/records/src/lib.rs
//! PURPOSE: Shared record model for the staffing drilldown.
//! CONTEXT: Raw worksheet cells, their normalization into `FlatRecord`, and
//! the measure types every other crate aggregates.

pub mod cell;
pub mod error;
pub mod measure;
pub mod record;
pub mod sample;

pub use cell::{format_number_key, CellValue, RawRow};
pub use error::{MeasureError, RecordError};
pub use measure::{Measure, MeasureTotals};
pub use record::{columns, normalize_row, normalize_rows, FlatRecord, Organization};
pub use sample::sample_records;
