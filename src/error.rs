//! Error types for the attendance PDF library

use std::path::PathBuf;
use thiserror::Error;

use crate::period::PeriodError;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the attendance PDF library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive writing error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid PDF (no pages)
    #[error("PDF has no pages")]
    EmptyPdf,

    /// Month/year combination that has no calendar
    #[error("Invalid period: month {month}, year {year}")]
    InvalidPeriod { month: u32, year: i32 },

    /// Month/year could not be read from document text
    #[error("Could not determine the period: {0}")]
    Period(#[from] PeriodError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// General error
    #[error("{0}")]
    General(String),
}
