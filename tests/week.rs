use chrono::NaiveDate;

use skinsales_terminal::week::{WEEK_EPOCH, current_week_range, format_long_date, format_week_range};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn epoch_week_contains_its_own_days() {
    let (start, end) = current_week_range(date(2025, 8, 10));
    assert_eq!(start, date(2025, 8, 4));
    assert_eq!(end, date(2025, 8, 11));

    let (start, end) = current_week_range(WEEK_EPOCH);
    assert_eq!(start, WEEK_EPOCH);
    assert_eq!(end, date(2025, 8, 11));
}

#[test]
fn week_boundary_rolls_over_exactly() {
    // Last day of the epoch week vs the first day of the next.
    let (start, _) = current_week_range(date(2025, 8, 10));
    assert_eq!(start, date(2025, 8, 4));

    let (start, end) = current_week_range(date(2025, 8, 11));
    assert_eq!(start, date(2025, 8, 11));
    assert_eq!(end, date(2025, 8, 18));
}

#[test]
fn later_weeks_stay_aligned_to_the_epoch() {
    let (start, end) = current_week_range(date(2025, 12, 25));
    assert_eq!(start, date(2025, 12, 22));
    assert_eq!(end, date(2025, 12, 29));
    assert_eq!((start - WEEK_EPOCH).num_days() % 7, 0);
}

#[test]
fn pre_epoch_dates_bucket_backwards() {
    let (start, end) = current_week_range(date(2025, 8, 3));
    assert_eq!(start, date(2025, 7, 28));
    assert_eq!(end, date(2025, 8, 4));
}

#[test]
fn long_date_formatting() {
    assert_eq!(format_long_date(date(2025, 8, 4)), "August 4, 2025");
    assert_eq!(
        format_week_range(date(2025, 8, 4), date(2025, 8, 11)),
        "August 4, 2025 - August 11, 2025"
    );
}
