//! FILENAME: core/records/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("Unknown organization '{value}' in sheet row {row}")]
    UnknownOrganization { row: usize, value: String },

    #[error("Invalid organization code: {0}")]
    InvalidOrganizationCode(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("Unknown measure identifier: {0}")]
    Unknown(String),
}
