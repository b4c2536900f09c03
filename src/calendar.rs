//! Calendar arithmetic for billing schedules.
//!
//! Everything here works on calendar days (`NaiveDate`) only. Timestamps are
//! collapsed to their calendar date through [`normalize_to_day`] before they
//! reach any month-key comparison.

use crate::error::{Result, ScheduleError};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Legacy payment-day value meaning "last day of the month".
pub const LAST_DAY_SENTINEL: u32 = 30;

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-based) of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

pub fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    MonthKey::new(year, month)?.billing_date(days_in_month(year, month))
}

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ScheduleError::DateError(format!(
                "Invalid month {} for year {}: must be between 1 and 12",
                month, year
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following month. Only the month field moves; day resolution is
    /// redone by the caller for each month.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn days(self) -> u32 {
        days_in_month(self.year, self.month)
    }

    /// Builds the date for `day` in this month. `day` must already be clamped.
    pub fn billing_date(self, day: u32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day).ok_or_else(|| {
            ScheduleError::DateError(format!(
                "Day {} does not exist in {}-{:02}",
                day, self.year, self.month
            ))
        })
    }

    /// Months from `self` to `other`, negative when `other` is earlier.
    pub fn months_until(self, other: MonthKey) -> i64 {
        let year_diff = i64::from(other.year) - i64::from(self.year);
        let month_diff = i64::from(other.month) - i64::from(self.month);
        year_diff * 12 + month_diff
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Number of months in the inclusive range `[first, last]`, zero when empty.
pub fn months_in_range(first: MonthKey, last: MonthKey) -> u32 {
    let span = first.months_until(last);
    if span < 0 {
        0
    } else {
        u32::try_from(span + 1).unwrap_or(u32::MAX)
    }
}

/// The configured day of month a lease bills on.
///
/// Stored leases encode this as an integer where `30` is a sentinel for the
/// last day of the month. In memory the two meanings are kept apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BillingDay {
    /// Bill on this day, clamped to the month length.
    FixedDay(u32),
    /// Always bill on the final day of the month.
    LastDayOfMonth,
}

impl BillingDay {
    pub fn from_payment_day(day: u32) -> Result<Self> {
        match day {
            LAST_DAY_SENTINEL => Ok(BillingDay::LastDayOfMonth),
            1..=31 => Ok(BillingDay::FixedDay(day)),
            _ => Err(ScheduleError::InvalidPaymentDay(day)),
        }
    }

    /// The legacy integer encoding.
    pub fn as_payment_day(self) -> u32 {
        match self {
            BillingDay::FixedDay(day) => day,
            BillingDay::LastDayOfMonth => LAST_DAY_SENTINEL,
        }
    }

    /// Resolves the effective day of month for `year`/`month`.
    pub fn effective_day(self, year: i32, month: u32) -> u32 {
        let length = days_in_month(year, month);
        match self {
            BillingDay::LastDayOfMonth => length,
            BillingDay::FixedDay(day) => day.min(length),
        }
    }
}

impl TryFrom<u32> for BillingDay {
    type Error = ScheduleError;

    fn try_from(day: u32) -> Result<Self> {
        BillingDay::from_payment_day(day)
    }
}

impl From<BillingDay> for u32 {
    fn from(day: BillingDay) -> Self {
        day.as_payment_day()
    }
}

/// Effective billing day for a month.
///
/// Without a configured billing day the day of month of `fallback` is used,
/// clamped to the month length so short months still yield a real date.
pub fn resolve_effective_day(
    year: i32,
    month: u32,
    billing_day: Option<BillingDay>,
    fallback: NaiveDate,
) -> u32 {
    match billing_day {
        Some(day) => day.effective_day(year, month),
        None => BillingDay::FixedDay(fallback.day()).effective_day(year, month),
    }
}

/// Anything that can be reduced to a calendar day.
pub trait ToCalendarDay {
    fn to_calendar_day(&self) -> NaiveDate;
}

impl ToCalendarDay for NaiveDate {
    fn to_calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl ToCalendarDay for NaiveDateTime {
    fn to_calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

/// Uses the calendar date as seen in the timestamp's own offset.
impl<Tz: TimeZone> ToCalendarDay for DateTime<Tz> {
    fn to_calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

pub fn normalize_to_day<D: ToCalendarDay + ?Sized>(date: &D) -> NaiveDate {
    date.to_calendar_day()
}

/// Parses `YYYY-MM-DD`, RFC 3339 timestamps, or naive `YYYY-MM-DDTHH:MM:SS`
/// timestamps into a calendar day.
pub fn parse_calendar_day(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(normalize_to_day(&timestamp));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(normalize_to_day(&timestamp));
        }
    }

    Err(ScheduleError::DateError(format!(
        "Unrecognised date '{}'. Expected YYYY-MM-DD or an RFC 3339 timestamp",
        input
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2023, 1), 31);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 12), 31);
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2023, 2).unwrap(), date(2023, 2, 28));
        assert_eq!(last_day_of_month(2024, 2).unwrap(), date(2024, 2, 29));
        assert_eq!(last_day_of_month(2023, 4).unwrap(), date(2023, 4, 30));
        assert!(last_day_of_month(2023, 13).is_err());
    }

    #[test]
    fn test_month_key_next_rolls_year() {
        let dec = MonthKey::new(2023, 12).unwrap();
        assert_eq!(dec.next(), MonthKey::new(2024, 1).unwrap());
        assert_eq!(MonthKey::of(date(2024, 2, 29)).next().month, 3);
    }

    #[test]
    fn test_months_in_range() {
        let jan = MonthKey::new(2024, 1).unwrap();
        let apr = MonthKey::new(2024, 4).unwrap();
        assert_eq!(months_in_range(jan, apr), 4);
        assert_eq!(months_in_range(apr, apr), 1);
        assert_eq!(months_in_range(apr, jan), 0);
        assert_eq!(
            months_in_range(MonthKey::new(2023, 11).unwrap(), MonthKey::new(2024, 2).unwrap()),
            4
        );
    }

    #[test]
    fn test_sentinel_is_always_last_day() {
        let day = BillingDay::from_payment_day(30).unwrap();
        assert_eq!(day, BillingDay::LastDayOfMonth);
        assert_eq!(day.effective_day(2024, 1), 31);
        assert_eq!(day.effective_day(2024, 2), 29);
        assert_eq!(day.effective_day(2023, 2), 28);
        assert_eq!(day.effective_day(2024, 4), 30);
    }

    #[test]
    fn test_fixed_day_clamping() {
        let day = BillingDay::from_payment_day(31).unwrap();
        assert_eq!(day.effective_day(2024, 4), 30);
        assert_eq!(day.effective_day(2023, 2), 28);
        assert_eq!(day.effective_day(2024, 2), 29);
        assert_eq!(day.effective_day(2024, 3), 31);

        let day = BillingDay::from_payment_day(15).unwrap();
        assert_eq!(day.effective_day(2023, 2), 15);
    }

    #[test]
    fn test_invalid_payment_days() {
        assert!(matches!(
            BillingDay::from_payment_day(0),
            Err(ScheduleError::InvalidPaymentDay(0))
        ));
        assert!(matches!(
            BillingDay::from_payment_day(32),
            Err(ScheduleError::InvalidPaymentDay(32))
        ));
    }

    #[test]
    fn test_resolve_effective_day_fallback() {
        let fallback = date(2024, 1, 31);
        assert_eq!(resolve_effective_day(2024, 2, None, fallback), 29);
        assert_eq!(resolve_effective_day(2024, 3, None, fallback), 31);
        assert_eq!(
            resolve_effective_day(2024, 3, Some(BillingDay::FixedDay(5)), fallback),
            5
        );
    }

    #[test]
    fn test_billing_day_serde_uses_legacy_integer() {
        let json = serde_json::to_string(&BillingDay::LastDayOfMonth).unwrap();
        assert_eq!(json, "30");

        let parsed: BillingDay = serde_json::from_str("31").unwrap();
        assert_eq!(parsed, BillingDay::FixedDay(31));

        assert!(serde_json::from_str::<BillingDay>("0").is_err());
    }

    #[test]
    fn test_normalize_to_day() {
        let late_evening = FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 31, 23, 30, 0)
            .unwrap();
        assert_eq!(normalize_to_day(&late_evening), date(2024, 3, 31));

        let utc = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 1).unwrap();
        assert_eq!(normalize_to_day(&utc), date(2024, 1, 15));
    }

    #[test]
    fn test_parse_calendar_day_formats() {
        assert_eq!(parse_calendar_day("2024-01-15").unwrap(), date(2024, 1, 15));
        assert_eq!(
            parse_calendar_day("2024-01-15T23:59:59-08:00").unwrap(),
            date(2024, 1, 15)
        );
        assert_eq!(
            parse_calendar_day("2024-02-29T10:00:00.000Z").unwrap(),
            date(2024, 2, 29)
        );
        assert_eq!(
            parse_calendar_day(" 2024-03-01T08:15:00 ").unwrap(),
            date(2024, 3, 1)
        );
        assert!(parse_calendar_day("2023-02-29").is_err());
        assert!(parse_calendar_day("next tuesday").is_err());
    }
}
