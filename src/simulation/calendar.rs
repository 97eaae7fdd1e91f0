//! Saturday/Sunday calendar helpers for the simulated year

use chrono::{Datelike, Duration, NaiveDate, Weekday};

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Last calendar day of `month` (1-12) in `year`
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Last weekday on or before the final calendar day of the month.
///
/// Saturday rolls back one day and Sunday two, landing on Friday.
pub fn last_working_day(year: i32, month: u32) -> Option<NaiveDate> {
    let last = month_end(year, month)?;
    let rollback = match last.weekday() {
        Weekday::Sat => 1,
        Weekday::Sun => 2,
        _ => 0,
    };
    last.checked_sub_signed(Duration::days(rollback))
}

/// Last working day of each month, January first
pub fn last_working_days(year: i32) -> Option<[NaiveDate; 12]> {
    let mut days = [NaiveDate::MIN; 12];
    for (i, slot) in days.iter_mut().enumerate() {
        *slot = last_working_day(year, i as u32 + 1)?;
    }
    Some(days)
}
