use std::fmt;

use serde::{Deserialize, Serialize};

/// Days in each month of the fixed calendar. No leap years: the generator
/// caps sampled days at 28 and only ever compares whole dates, so leap-day
/// bookkeeping buys nothing.
const MONTH_DAYS: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Calendar date with total chronological ordering.
///
/// Serialized as an ISO `YYYY-MM-DD` string. Field order (year, month, day)
/// makes the derived `Ord` chronological.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Date {
    year: i32,
    month: u8,
    day: u8,
}

impl Date {
    /// Create a date from year, month (1–12), and day (1–days in month).
    ///
    /// # Panics
    /// Panics if the month or day is out of range.
    pub fn new(year: i32, month: u8, day: u8) -> Self {
        assert!((1..=12).contains(&month), "month out of range: {month}");
        let max_day = MONTH_DAYS[(month - 1) as usize];
        assert!(
            day >= 1 && day <= max_day,
            "day out of range for month {month}: {day}"
        );
        Self { year, month, day }
    }

    /// January 1st of the given year.
    pub fn from_year(year: i32) -> Self {
        Self::new(year, 1, 1)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// Date shifted forward by the given years, months, and days,
    /// normalizing month and day overflow.
    pub fn add(&self, years: i32, months: u32, days: u32) -> Self {
        let mut year = self.year + years;
        let mut month = self.month as u32 + months;
        year += ((month - 1) / 12) as i32;
        month = (month - 1) % 12 + 1;

        // Clamp before day arithmetic: e.g. Jan 31 + 1 month → Feb 28.
        let mut day = self.day.min(MONTH_DAYS[(month - 1) as usize]) as u32;
        day += days;
        while day > MONTH_DAYS[(month - 1) as usize] as u32 {
            day -= MONTH_DAYS[(month - 1) as usize] as u32;
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }

        Self {
            year,
            month: month as u8,
            day: day as u8,
        }
    }

    pub fn add_years(&self, years: i32) -> Self {
        self.add(years, 0, 0)
    }

    /// Whole years elapsed from `earlier` to `self` (an age, when `earlier`
    /// is a birth date). One year is subtracted if the anniversary has not
    /// yet been reached.
    pub fn years_since(&self, earlier: Date) -> i32 {
        let mut years = self.year - earlier.year;
        if (self.month, self.day) < (earlier.month, earlier.day) {
            years -= 1;
        }
        years
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl From<Date> for String {
    fn from(d: Date) -> Self {
        d.to_string()
    }
}

impl TryFrom<String> for Date {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let mut parts = s.split('-');
        let (Some(y), Some(m), Some(d), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("malformed date: {s}"));
        };
        let year: i32 = y.parse().map_err(|_| format!("malformed year in: {s}"))?;
        let month: u8 = m.parse().map_err(|_| format!("malformed month in: {s}"))?;
        let day: u8 = d.parse().map_err(|_| format!("malformed day in: {s}"))?;
        if !(1..=12).contains(&month) {
            return Err(format!("month out of range in: {s}"));
        }
        if day < 1 || day > MONTH_DAYS[(month - 1) as usize] {
            return Err(format!("day out of range in: {s}"));
        }
        Ok(Date { year, month, day })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_chronological() {
        assert!(Date::new(1970, 5, 12) < Date::new(1970, 5, 13));
        assert!(Date::new(1970, 5, 12) < Date::new(1970, 6, 1));
        assert!(Date::new(1970, 12, 31) < Date::new(1971, 1, 1));
    }

    #[test]
    fn serializes_iso_string() {
        let d = Date::new(1970, 3, 7);
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"1970-03-07\"");
        let back: Date = serde_json::from_str("\"1970-03-07\"").unwrap();
        assert_eq!(back, d);
    }

    #[test]
    fn rejects_malformed_strings() {
        assert!(serde_json::from_str::<Date>("\"1970-13-01\"").is_err());
        assert!(serde_json::from_str::<Date>("\"1970-02-30\"").is_err());
        assert!(serde_json::from_str::<Date>("\"soon\"").is_err());
    }

    #[test]
    fn add_years_keeps_month_day() {
        let d = Date::new(1970, 6, 15).add_years(25);
        assert_eq!(d, Date::new(1995, 6, 15));
    }

    #[test]
    fn add_months_normalizes_year() {
        let d = Date::new(1970, 11, 10).add(0, 3, 0);
        assert_eq!(d, Date::new(1971, 2, 10));
    }

    #[test]
    fn add_days_carries_month() {
        let d = Date::new(1970, 1, 28).add(0, 0, 10);
        assert_eq!(d, Date::new(1970, 2, 7));
    }

    #[test]
    fn add_clamps_day_to_target_month() {
        let d = Date::new(1970, 1, 31).add(0, 1, 0);
        assert_eq!(d, Date::new(1970, 2, 28));
    }

    #[test]
    fn years_since_respects_anniversary() {
        let birth = Date::new(1970, 6, 15);
        assert_eq!(Date::new(2000, 6, 15).years_since(birth), 30);
        assert_eq!(Date::new(2000, 6, 14).years_since(birth), 29);
        assert_eq!(Date::new(2000, 12, 1).years_since(birth), 30);
    }
}
