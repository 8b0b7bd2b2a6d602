//! Attendance PDF Library
//!
//! Tools for monthly attendance records ("registro de jornada"):
//! - Split a multi-page attendance PDF into one document per worker
//! - Generate a month's work schedule, skipping weekends and holidays
//! - Read the month/year printed on a document
//! - Overlay the schedule table onto a worker's document
//!
//! # Example
//!
//! ```no_run
//! use attendance_pdf::config::Config;
//! use attendance_pdf::pdf::{overlay_schedule, split_by_worker, OverlayOptions};
//! use attendance_pdf::schedule::generate_schedule;
//!
//! let config = Config::default();
//!
//! let input = std::fs::read("registros.pdf").unwrap();
//! let split = split_by_worker(&input, &config.split).unwrap();
//! std::fs::write("documentos_divididos.zip", &split.archive).unwrap();
//!
//! let holidays = config.holidays.days_in_month(2025, 1);
//! let schedule = generate_schedule(2025, 1, &holidays, &config.schedule).unwrap();
//! let individual = std::fs::read("Juan_Perez.pdf").unwrap();
//! let completed = overlay_schedule(&individual, &schedule, &OverlayOptions::default()).unwrap();
//! std::fs::write("output_completed.pdf", completed).unwrap();
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod holidays;
pub mod layout;
pub mod output;
pub mod pdf;
pub mod period;
pub mod schedule;

// Re-export commonly used items
pub use error::{Error, Result};
