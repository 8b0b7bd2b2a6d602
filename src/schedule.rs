//! Monthly work-schedule generation
//!
//! A schedule has one row per calendar day. Workdays (Monday to Friday and not a
//! holiday) carry the fixed clock-in/clock-out times and the daily hours; every
//! other day is left blank. The hours column is the configured constant (8 by
//! default) and is never derived from the clock times.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Column headers of the rendered table
pub const HEADERS: [&str; 6] = [
    "DIA",
    "MAÑANAS ENTRADA",
    "MAÑANAS SALIDA",
    "TARDES ENTRADA",
    "TARDES SALIDA",
    "HORAS ORDINARIAS",
];

/// Upper bound for the hours credited to one workday
pub const MAX_DAILY_HOURS: u32 = 24;

/// Fixed clock times and credited hours for a workday
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkTimes {
    pub morning_entry: String,
    pub morning_exit: String,
    pub afternoon_entry: String,
    pub afternoon_exit: String,
    pub daily_hours: u32,
}

impl Default for WorkTimes {
    fn default() -> Self {
        Self {
            morning_entry: "08:00".to_string(),
            morning_exit: "14:00".to_string(),
            afternoon_entry: "15:00".to_string(),
            afternoon_exit: "18:00".to_string(),
            daily_hours: 8,
        }
    }
}

impl WorkTimes {
    /// Check that every time is a valid `HH:MM` and the hours fit in a day
    pub fn validate(&self) -> Result<()> {
        if self.daily_hours > MAX_DAILY_HOURS {
            return Err(Error::Config(format!(
                "daily_hours {} exceeds {}",
                self.daily_hours, MAX_DAILY_HOURS
            )));
        }

        for (name, value) in [
            ("morning_entry", &self.morning_entry),
            ("morning_exit", &self.morning_exit),
            ("afternoon_entry", &self.afternoon_entry),
            ("afternoon_exit", &self.afternoon_exit),
        ] {
            chrono::NaiveTime::parse_from_str(value, "%H:%M").map_err(|e| {
                Error::Config(format!("{} {:?} is not a HH:MM time: {}", name, value, e))
            })?;
        }
        Ok(())
    }
}

/// The populated part of a workday row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    pub morning_entry: String,
    pub morning_exit: String,
    pub afternoon_entry: String,
    pub afternoon_exit: String,
    pub hours: u32,
}

impl From<&WorkTimes> for Shift {
    fn from(times: &WorkTimes) -> Self {
        Self {
            morning_entry: times.morning_entry.clone(),
            morning_exit: times.morning_exit.clone(),
            afternoon_entry: times.afternoon_entry.clone(),
            afternoon_exit: times.afternoon_exit.clone(),
            hours: times.daily_hours,
        }
    }
}

/// One calendar day of the schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    pub day: u32,
    pub weekday: Weekday,
    /// `None` on weekends and holidays
    pub shift: Option<Shift>,
}

impl ScheduleRow {
    pub fn is_workday(&self) -> bool {
        self.shift.is_some()
    }

    /// Table cells for this row; blank days have five empty cells after the day
    pub fn cells(&self) -> [String; 6] {
        match &self.shift {
            Some(shift) => [
                self.day.to_string(),
                shift.morning_entry.clone(),
                shift.morning_exit.clone(),
                shift.afternoon_entry.clone(),
                shift.afternoon_exit.clone(),
                shift.hours.to_string(),
            ],
            None => [
                self.day.to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ],
        }
    }
}

/// A generated month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub year: i32,
    pub month: u32,
    pub rows: Vec<ScheduleRow>,
    pub total_hours: u32,
}

impl Schedule {
    pub fn workday_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_workday()).count()
    }

    /// Header row, one row per day, then the `TOTAL` row
    pub fn table(&self) -> Vec<[String; 6]> {
        let mut table = Vec::with_capacity(self.rows.len() + 2);
        table.push(HEADERS.map(String::from));
        table.extend(self.rows.iter().map(ScheduleRow::cells));
        table.push([
            "TOTAL".to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            self.total_hours.to_string(),
        ]);
        table
    }
}

/// Build the schedule for `month`/`year`, leaving weekends and `holidays` blank
///
/// `holidays` holds day-of-month numbers.
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use attendance_pdf::schedule::{generate_schedule, WorkTimes};
///
/// let holidays: BTreeSet<u32> = [1, 6].into_iter().collect();
/// let schedule = generate_schedule(2025, 1, &holidays, &WorkTimes::default()).unwrap();
///
/// assert_eq!(schedule.rows.len(), 31);
/// assert_eq!(schedule.total_hours, 8 * schedule.workday_count() as u32);
/// ```
pub fn generate_schedule(
    year: i32,
    month: u32,
    holidays: &BTreeSet<u32>,
    times: &WorkTimes,
) -> Result<Schedule> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(Error::InvalidPeriod { month, year })?;

    let mut rows = Vec::with_capacity(31);
    let mut total_hours: u32 = 0;

    for date in first.iter_days().take_while(|date| date.month() == month) {
        let weekday = date.weekday();
        let day = date.day();
        let is_workday = weekday.num_days_from_monday() < 5 && !holidays.contains(&day);

        let shift = if is_workday {
            total_hours = total_hours
                .checked_add(times.daily_hours)
                .ok_or_else(|| Error::Config(format!("daily_hours {} overflows the total", times.daily_hours)))?;
            Some(Shift::from(times))
        } else {
            None
        };

        rows.push(ScheduleRow { day, weekday, shift });
    }

    Ok(Schedule {
        year,
        month,
        rows,
        total_hours,
    })
}
