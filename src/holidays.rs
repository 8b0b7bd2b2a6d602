//! Year-keyed holiday calendar

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::error::{Error, Result};

/// Public holidays in Barcelona, as (month, day)
const BARCELONA_2025: &[(u32, u32)] = &[
    (1, 1),
    (1, 6),
    (4, 18),
    (4, 21),
    (5, 1),
    (6, 9),
    (6, 24),
    (8, 15),
    (9, 11),
    (9, 24),
    (11, 1),
    (12, 8),
    (12, 25),
    (12, 26),
];

const BARCELONA_2026: &[(u32, u32)] = &[
    (1, 1),
    (1, 6),
    (4, 3),
    (4, 6),
    (5, 1),
    (5, 25),
    (6, 24),
    (8, 15),
    (9, 11),
    (9, 24),
    (10, 12),
    (12, 8),
    (12, 25),
    (12, 26),
];

/// Holiday dates grouped by year
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    years: BTreeMap<i32, BTreeSet<NaiveDate>>,
}

impl HolidayCalendar {
    /// An empty calendar (weekends are the only non-workdays)
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in Barcelona calendar for 2025 and 2026
    pub fn builtin() -> Self {
        let mut calendar = Self::new();
        for (year, days) in [(2025, BARCELONA_2025), (2026, BARCELONA_2026)] {
            for &(month, day) in days {
                if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                    calendar.insert(date);
                }
            }
        }
        calendar
    }

    /// Add a single holiday
    pub fn insert(&mut self, date: NaiveDate) {
        self.years.entry(date.year()).or_default().insert(date);
    }

    /// Add a holiday given as `MM-DD` for `year`
    pub fn insert_month_day(&mut self, year: i32, month_day: &str) -> Result<()> {
        let date = NaiveDate::parse_from_str(&format!("{}-{}", year, month_day.trim()), "%Y-%m-%d")
            .map_err(|e| {
                Error::Config(format!("invalid holiday {:?} for {}: {}", month_day, year, e))
            })?;
        self.insert(date);
        Ok(())
    }

    /// Whether the calendar has any entry for `year`
    pub fn covers_year(&self, year: i32) -> bool {
        self.years.contains_key(&year)
    }

    /// Years that have holidays configured
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.years.keys().copied()
    }

    /// All holidays of a year, in date order
    pub fn holidays_in_year(&self, year: i32) -> Vec<NaiveDate> {
        self.years
            .get(&year)
            .map(|dates| dates.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Day numbers of the holidays falling in the given month
    ///
    /// An unknown year yields an empty set and a warning.
    pub fn days_in_month(&self, year: i32, month: u32) -> BTreeSet<u32> {
        match self.years.get(&year) {
            Some(dates) => dates
                .iter()
                .filter(|date| date.month() == month)
                .map(|date| date.day())
                .collect(),
            None => {
                warn!(year, "no holidays configured for year; only weekends are excluded");
                BTreeSet::new()
            }
        }
    }

    /// Whether `date` is a holiday
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.years
            .get(&date.year())
            .is_some_and(|dates| dates.contains(&date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_two_years() {
        let calendar = HolidayCalendar::builtin();
        assert_eq!(calendar.years().collect::<Vec<_>>(), vec![2025, 2026]);
        assert!(!calendar.covers_year(2024));
    }

    #[test]
    fn test_builtin_january_2025() {
        let calendar = HolidayCalendar::builtin();
        let days = calendar.days_in_month(2025, 1);
        assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![1, 6]);
    }

    #[test]
    fn test_is_holiday() {
        let calendar = HolidayCalendar::builtin();
        assert!(calendar.is_holiday(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()));
        assert!(!calendar.is_holiday(NaiveDate::from_ymd_opt(2025, 12, 24).unwrap()));
        assert!(!calendar.is_holiday(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
    }

    #[test]
    fn test_unknown_year_is_empty() {
        let calendar = HolidayCalendar::builtin();
        assert!(calendar.days_in_month(2031, 1).is_empty());
    }

    #[test]
    fn test_insert_month_day() {
        let mut calendar = HolidayCalendar::new();
        calendar.insert_month_day(2024, "02-29").unwrap();
        calendar.insert_month_day(2024, "12-25").unwrap();
        assert_eq!(calendar.holidays_in_year(2024).len(), 2);

        // 2025 is not a leap year
        assert!(calendar.insert_month_day(2025, "02-29").is_err());
        assert!(calendar.insert_month_day(2025, "13-01").is_err());
        assert!(calendar.insert_month_day(2025, "Navidad").is_err());
    }
}
