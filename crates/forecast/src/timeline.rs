//! Campaign timeline: duration parsing and period dates.

use chrono::{Datelike, Days, NaiveDate};

pub const DEFAULT_TIMELINE_WEEKS: u32 = 4;

/// Week count from a free-text duration such as `"4 weeks"` or `"campaign of 6wk"`.
///
/// Takes the first run of ASCII digits. No digits, zero, or an out-of-range
/// number yields `default`.
pub fn parse_timeline_weeks(text: &str, default: u32) -> u32 {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();

    match digits.parse::<u32>() {
        Ok(weeks) if weeks >= 1 => weeks,
        _ => default,
    }
}

/// The Monday strictly after `today` (a Monday maps to the following week).
pub fn next_monday(today: NaiveDate) -> NaiveDate {
    let days_ahead = 7 - u64::from(today.weekday().num_days_from_monday());
    today + Days::new(days_ahead)
}

/// First and last day of the 1-based `period` of a weekly schedule starting on `start`.
pub fn period_dates(start: NaiveDate, period: u32) -> (NaiveDate, NaiveDate) {
    let offset = u64::from(period.saturating_sub(1)) * 7;
    let first = start + Days::new(offset);
    (first, first + Days::new(6))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn extracts_first_number() {
        assert_eq!(parse_timeline_weeks("4 weeks", 4), 4);
        assert_eq!(parse_timeline_weeks("run for 12 weeks, 3 flights", 4), 12);
        assert_eq!(parse_timeline_weeks("6wk", 4), 6);
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(parse_timeline_weeks("a couple of weeks", 4), 4);
        assert_eq!(parse_timeline_weeks("", 4), 4);
        assert_eq!(parse_timeline_weeks("0 weeks", 4), 4);
        assert_eq!(parse_timeline_weeks("99999999999999 weeks", 4), 4);
    }

    #[test]
    fn next_monday_is_strictly_after_today() {
        // 2026-10-18 is a Sunday.
        assert_eq!(next_monday(date(2026, 10, 18)), date(2026, 10, 19));
        // Monday → following Monday.
        assert_eq!(next_monday(date(2026, 10, 19)), date(2026, 10, 26));
        assert_eq!(next_monday(date(2026, 10, 21)), date(2026, 10, 26));
    }

    #[test]
    fn periods_are_consecutive_weeks() {
        let start = date(2026, 10, 19);
        assert_eq!(period_dates(start, 1), (date(2026, 10, 19), date(2026, 10, 25)));
        assert_eq!(period_dates(start, 3), (date(2026, 11, 2), date(2026, 11, 8)));
    }
}
