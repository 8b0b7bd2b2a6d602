//! Month/year extraction from document text
//!
//! Attendance sheets print their period as `<marker> M/YYYY`, for example
//! `Periodo: 1/2025`. The accepted grammar is:
//!
//! ```text
//! period := marker WS* month "/" year TERM
//! month  := DIGIT DIGIT?            (1..=12)
//! year   := DIGIT DIGIT DIGIT DIGIT
//! TERM   := end of text | any character other than a digit or "/"
//! ```
//!
//! Only the first occurrence of the marker is considered.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

/// Default marker preceding the period token
pub const DEFAULT_PERIOD_MARKER: &str = "Periodo:";

/// A calendar month of a specific year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// Build a period, rejecting months outside 1..=12 and years chrono cannot represent
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

/// Why a period could not be read from text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// The marker does not occur in the text
    #[error("marker {marker:?} not found")]
    MarkerNotFound { marker: String },

    /// The marker is present but what follows does not parse
    #[error("malformed period {token:?}: {reason}")]
    Malformed { token: String, reason: String },
}

impl PeriodError {
    fn malformed(token: &str, reason: impl Into<String>) -> Self {
        PeriodError::Malformed {
            token: token.to_string(),
            reason: reason.into(),
        }
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    /// Parse a bare `M/YYYY` token
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (month_str, year_str) = token
            .split_once('/')
            .ok_or_else(|| PeriodError::malformed(token, "expected month/year"))?;

        if month_str.is_empty() || month_str.len() > 2 || !month_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PeriodError::malformed(token, "month must be one or two digits"));
        }
        if year_str.len() != 4 || !year_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PeriodError::malformed(token, "year must be four digits"));
        }

        let month: u32 = month_str
            .parse()
            .map_err(|_| PeriodError::malformed(token, "month is not a number"))?;
        let year: i32 = year_str
            .parse()
            .map_err(|_| PeriodError::malformed(token, "year is not a number"))?;

        if !(1..=12).contains(&month) {
            return Err(PeriodError::malformed(token, format!("month {} out of range", month)));
        }

        Period::new(year, month).ok_or_else(|| PeriodError::malformed(token, "not a calendar month"))
    }
}

/// Find the marker in `text` and parse the `month/year` token after it
pub fn extract_period(text: &str, marker: &str) -> Result<Period, PeriodError> {
    let start = text.find(marker).ok_or_else(|| PeriodError::MarkerNotFound {
        marker: marker.to_string(),
    })?;

    let rest = text[start + marker.len()..].trim_start();

    // The token runs while characters belong to the grammar's alphabet
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '/'))
        .unwrap_or(rest.len());
    let token = &rest[..end];

    if token.is_empty() {
        let shown: String = rest.chars().take_while(|c| !c.is_whitespace()).collect();
        return Err(PeriodError::malformed(&shown, "no month/year after marker"));
    }

    token.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token() {
        let period: Period = "1/2025".parse().unwrap();
        assert_eq!(period, Period { year: 2025, month: 1 });

        let period: Period = "12/2024".parse().unwrap();
        assert_eq!(period, Period { year: 2024, month: 12 });

        let period: Period = "03/2026".parse().unwrap();
        assert_eq!(period.month, 3);
    }

    #[test]
    fn test_extract_with_surrounding_text() {
        let text = "Empresa: Colaboring\nPeriodo: 2/2025 Centro: Barcelona\nTrabajador: Ana";
        let period = extract_period(text, DEFAULT_PERIOD_MARKER).unwrap();
        assert_eq!(period, Period { year: 2025, month: 2 });
    }

    #[test]
    fn test_extract_without_space_after_marker() {
        let period = extract_period("Periodo:11/2025", DEFAULT_PERIOD_MARKER).unwrap();
        assert_eq!(period, Period { year: 2025, month: 11 });
    }

    #[test]
    fn test_extract_uses_first_marker() {
        let text = "Periodo: 4/2025\nPeriodo: 5/2025";
        assert_eq!(extract_period(text, DEFAULT_PERIOD_MARKER).unwrap().month, 4);
    }

    #[test]
    fn test_marker_not_found() {
        let err = extract_period("Trabajador: Ana", DEFAULT_PERIOD_MARKER).unwrap_err();
        assert!(matches!(err, PeriodError::MarkerNotFound { .. }));
    }

    #[test]
    fn test_malformed_tokens() {
        let cases = vec![
            "Periodo: enero 2025",
            "Periodo: 13/2025",
            "Periodo: 0/2025",
            "Periodo: 1/25",
            "Periodo: 1-2025",
            "Periodo: 123/2025",
            "Periodo:",
        ];

        for text in cases {
            let err = extract_period(text, DEFAULT_PERIOD_MARKER).unwrap_err();
            assert!(
                matches!(err, PeriodError::Malformed { .. }),
                "expected Malformed for {:?}, got {:?}",
                text,
                err
            );
        }
    }

    #[test]
    fn test_custom_marker() {
        let period = extract_period("Mes/Año: 7/2026", "Mes/Año:").unwrap();
        assert_eq!(period, Period { year: 2026, month: 7 });
    }

    #[test]
    fn test_display() {
        assert_eq!(Period { year: 2025, month: 1 }.to_string(), "1/2025");
    }
}
