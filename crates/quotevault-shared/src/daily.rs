//! Quote-of-the-day selection.
//!
//! The offset depends only on the calendar date and the number of quotes, so
//! every user sees the same quote all day without any server-side state.

use chrono::{Datelike, NaiveDate};

/// Offset (in creation-descending order) of the quote to show on `date`.
///
/// Uses the 1-based ordinal day of the year. Returns `None` when there are
/// no quotes at all.
pub fn daily_offset(date: NaiveDate, total: u64) -> Option<u64> {
    if total == 0 {
        return None;
    }
    Some(u64::from(date.ordinal()) % total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn offset_is_ordinal_mod_total() {
        assert_eq!(daily_offset(date(2026, 1, 1), 10), Some(1));
        assert_eq!(daily_offset(date(2026, 2, 1), 10), Some(2)); // day 32
        assert_eq!(daily_offset(date(2026, 12, 31), 365), Some(0));
    }

    #[test]
    fn same_day_same_offset() {
        let today = date(2026, 10, 19);
        assert_eq!(daily_offset(today, 45), daily_offset(today, 45));
    }

    #[test]
    fn empty_table_selects_nothing() {
        assert_eq!(daily_offset(date(2026, 6, 1), 0), None);
    }

    #[test]
    fn single_quote_always_selected() {
        assert_eq!(daily_offset(date(2026, 3, 14), 1), Some(0));
    }
}
