//! Clock formatting helpers.
//!
//! The clock shown in the header row is computed from local system time,
//! never from anything embedded in the fetched page.

use chrono::NaiveDateTime;

/// Grid column where the clock overlay starts on the header row.
pub const CLOCK_COLUMN: usize = 25;

/// Format a timestamp for the header clock, `DD.MM. HH:MM:SS`.
pub fn format_clock(now: NaiveDateTime) -> String {
    now.format("%d.%m. %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_format_clock() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let time = NaiveTime::from_hms_opt(20, 15, 7).unwrap();
        assert_eq!(format_clock(date.and_time(time)), "24.08. 20:15:07");
    }

    #[test]
    fn test_format_clock_pads_single_digits() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap();
        let time = NaiveTime::from_hms_opt(4, 5, 6).unwrap();
        assert_eq!(format_clock(date.and_time(time)), "03.01. 04:05:06");
    }

    #[test]
    fn test_clock_fits_the_header_row() {
        let date = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let time = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
        let clock = format_clock(date.and_time(time));
        assert!(CLOCK_COLUMN + clock.chars().count() <= crate::models::GRID_WIDTH);
    }
}
