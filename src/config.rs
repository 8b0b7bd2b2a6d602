//! Configuration loading
//!
//! Everything is optional: a missing file, section or key falls back to the
//! built-in defaults. A `[holidays]` table replaces the built-in calendar
//! entirely.
//!
//! ```toml
//! period_marker = "Periodo:"
//!
//! [split]
//! worker_marker = "Trabajador:"
//! fallback_prefix = "page_"
//!
//! [schedule]
//! morning_entry = "08:00"
//! morning_exit = "14:00"
//! afternoon_entry = "15:00"
//! afternoon_exit = "18:00"
//! daily_hours = 8
//!
//! [holidays]
//! 2025 = ["01-01", "01-06"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::holidays::HolidayCalendar;
use crate::pdf::SplitOptions;
use crate::period::DEFAULT_PERIOD_MARKER;
use crate::schedule::WorkTimes;

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub period_marker: String,
    pub split: SplitOptions,
    pub schedule: WorkTimes,
    pub holidays: HolidayCalendar,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            period_marker: DEFAULT_PERIOD_MARKER.to_string(),
            split: SplitOptions::default(),
            schedule: WorkTimes::default(),
            holidays: HolidayCalendar::builtin(),
        }
    }
}

/// On-disk shape of the configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    period_marker: Option<String>,
    split: Option<SplitOptions>,
    schedule: Option<WorkTimes>,
    /// Year (as a TOML key) to `MM-DD` dates
    holidays: Option<BTreeMap<String, Vec<String>>>,
}

impl Config {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(e.to_string()))?;

        let mut config = Config::default();

        if let Some(marker) = raw.period_marker {
            if marker.trim().is_empty() {
                return Err(Error::Config("period_marker must not be empty".to_string()));
            }
            config.period_marker = marker;
        }

        if let Some(split) = raw.split {
            if split.worker_marker.trim().is_empty() {
                return Err(Error::Config("split.worker_marker must not be empty".to_string()));
            }
            config.split = split;
        }

        if let Some(schedule) = raw.schedule {
            schedule.validate()?;
            config.schedule = schedule;
        }

        if let Some(years) = raw.holidays {
            let mut calendar = HolidayCalendar::new();
            for (year, dates) in years {
                let year: i32 = year
                    .trim()
                    .parse()
                    .map_err(|_| Error::Config(format!("holiday year {:?} is not a number", year)))?;
                for date in dates {
                    calendar.insert_month_day(year, &date)?;
                }
            }
            config.holidays = calendar;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.period_marker, "Periodo:");
        assert_eq!(config.split.worker_marker, "Trabajador:");
        assert_eq!(config.schedule, WorkTimes::default());
        assert_eq!(config.holidays, HolidayCalendar::builtin());
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_toml(
            r#"
period_marker = "Mes:"

[split]
worker_marker = "Empleado:"
fallback_prefix = "hoja_"

[schedule]
morning_entry = "09:00"
morning_exit = "13:00"
afternoon_entry = "14:00"
afternoon_exit = "18:00"
daily_hours = 8

[holidays]
2024 = ["01-01", "12-25"]
"#,
        )
        .unwrap();

        assert_eq!(config.period_marker, "Mes:");
        assert_eq!(config.split.worker_marker, "Empleado:");
        assert_eq!(config.split.fallback_prefix, "hoja_");
        assert_eq!(config.schedule.morning_entry, "09:00");
        assert!(config.holidays.is_holiday(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()));
        // Replaces the built-in calendar
        assert!(!config.holidays.covers_year(2025));
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config = Config::from_toml("[schedule]\ndaily_hours = 7\n").unwrap();
        assert_eq!(config.schedule.daily_hours, 7);
        assert_eq!(config.schedule.morning_entry, "08:00");
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_toml("[holidays]\n2025 = [\"02-30\"]\n").is_err());
        assert!(Config::from_toml("[holidays]\nnext = [\"01-01\"]\n").is_err());
        assert!(Config::from_toml("[schedule]\nmorning_entry = \"8am\"\n").is_err());
        assert!(Config::from_toml("[schedule]\ndaily_hours = 4000000000\n").is_err());
        assert!(Config::from_toml("unknown_key = 1\n").is_err());
        assert!(Config::from_toml("period_marker = \"  \"\n").is_err());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load(Path::new("nonexistent.toml"));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }
}
