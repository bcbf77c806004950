//! Shared traits, calendar periods, and helpers for finance records.

use std::{collections::BTreeMap, fmt};

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Unknown fields carried through load, merge, and save untouched.
pub type Extra = BTreeMap<String, Value>;

/// Exposes a stable identifier for entities stored in a collection.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Merges `incoming` into `target`, skipping keys owned by typed fields.
pub fn merge_extra(target: &mut Extra, incoming: Extra, reserved: &[&str]) {
    for (key, value) in incoming {
        if reserved.contains(&key.as_str()) {
            continue;
        }
        target.insert(key, value);
    }
}

/// Calendar bucket used by budgets and by period-scoped aggregates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl Period {
    /// Returns the calendar window (weeks start on Monday) that holds `date`.
    pub fn window_containing(self, date: NaiveDate) -> DateWindow {
        let start = self.start_of(date);
        DateWindow {
            start,
            end: self.advance(start),
        }
    }

    /// Returns `true` when `date` falls in the same calendar period as `reference`.
    pub fn contains(self, reference: NaiveDate, date: NaiveDate) -> bool {
        self.window_containing(reference).contains(date)
    }

    fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Week => date - Duration::days(date.weekday().num_days_from_monday() as i64),
            Period::Month => date - Duration::days(date.day0() as i64),
            Period::Quarter => {
                let month_start = date - Duration::days(date.day0() as i64);
                month_start
                    .checked_sub_months(Months::new(month_start.month0() % 3))
                    .unwrap_or(month_start)
            }
            Period::Year => date - Duration::days(date.ordinal0() as i64),
        }
    }

    fn advance(self, start: NaiveDate) -> NaiveDate {
        let months = match self {
            Period::Week => return start + Duration::days(7),
            Period::Month => 1,
            Period::Quarter => 3,
            Period::Year => 12,
        };
        start
            .checked_add_months(Months::new(months))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Period::Week => "Week",
            Period::Month => "Month",
            Period::Quarter => "Quarter",
            Period::Year => "Year",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Half-open `[start, end)` date range used to scope aggregates.
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateWindowError> {
        if end <= start {
            return Err(DateWindowError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`DateWindow`] values.
pub enum DateWindowError {
    InvalidRange,
}

impl fmt::Display for DateWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateWindowError::InvalidRange => f.write_str("date window end must be after start"),
        }
    }
}

impl std::error::Error for DateWindowError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_window_starts_on_monday() {
        // 2024-01-10 is a Wednesday.
        let window = Period::Week.window_containing(date(2024, 1, 10));
        assert_eq!(window.start, date(2024, 1, 8));
        assert_eq!(window.end, date(2024, 1, 15));
    }

    #[test]
    fn month_window_covers_calendar_month() {
        let window = Period::Month.window_containing(date(2024, 2, 29));
        assert_eq!(window.start, date(2024, 2, 1));
        assert_eq!(window.end, date(2024, 3, 1));
        assert!(window.contains(date(2024, 2, 1)));
        assert!(!window.contains(date(2024, 3, 1)));
    }

    #[test]
    fn quarter_window_aligns_to_calendar_quarters() {
        let window = Period::Quarter.window_containing(date(2024, 8, 17));
        assert_eq!(window.start, date(2024, 7, 1));
        assert_eq!(window.end, date(2024, 10, 1));

        let q4 = Period::Quarter.window_containing(date(2024, 12, 31));
        assert_eq!(q4.start, date(2024, 10, 1));
        assert_eq!(q4.end, date(2025, 1, 1));
    }

    #[test]
    fn year_window_spans_january_to_january() {
        let window = Period::Year.window_containing(date(2023, 6, 5));
        assert_eq!(window.start, date(2023, 1, 1));
        assert_eq!(window.end, date(2024, 1, 1));
        assert!(Period::Year.contains(date(2023, 12, 31), date(2023, 1, 1)));
        assert!(!Period::Year.contains(date(2023, 12, 31), date(2024, 1, 1)));
    }

    #[test]
    fn date_window_rejects_inverted_ranges() {
        assert_eq!(
            DateWindow::new(date(2024, 1, 2), date(2024, 1, 1)),
            Err(DateWindowError::InvalidRange)
        );
    }

    #[test]
    fn merge_extra_skips_reserved_keys() {
        let mut target = Extra::new();
        target.insert("icon".into(), json!("old"));
        let mut incoming = Extra::new();
        incoming.insert("icon".into(), json!("new"));
        incoming.insert("id".into(), json!(42));

        merge_extra(&mut target, incoming, &["id"]);

        assert_eq!(target.get("icon"), Some(&json!("new")));
        assert!(!target.contains_key("id"));
    }

    #[test]
    fn period_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Period::Quarter).unwrap(), "\"quarter\"");
        let parsed: Period = serde_json::from_str("\"week\"").unwrap();
        assert_eq!(parsed, Period::Week);
    }
}
