use chrono::{Duration, NaiveDate};

/// Anchor Monday for the sale rotation. Sale weeks are counted in whole
/// 7-day steps from this date.
pub const WEEK_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2025, 8, 4) {
    Some(date) => date,
    None => panic!("invalid week epoch"),
};

pub const DAYS_PER_WEEK: i64 = 7;

/// Returns the `[start, end)` range of the sale week containing `now`.
/// Euclidean division keeps pre-epoch dates in the right bucket.
pub fn current_week_range(now: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days_passed = (now - WEEK_EPOCH).num_days();
    let weeks_passed = days_passed.div_euclid(DAYS_PER_WEEK);
    let start = WEEK_EPOCH + Duration::days(weeks_passed * DAYS_PER_WEEK);
    (start, start + Duration::days(DAYS_PER_WEEK))
}

/// "August 4, 2025" style, for header text only.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn format_week_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} - {}", format_long_date(start), format_long_date(end))
}
