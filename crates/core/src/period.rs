use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive span between the earliest and latest transaction seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn single(date: NaiveDate) -> Self {
        DateRange::new(date, date)
    }

    /// Stretch the range so it covers `date`. Dates already inside leave it unchanged.
    pub fn widen(&mut self, date: NaiveDate) {
        if date > self.end {
            self.end = date;
        } else if date < self.start {
            self.start = date;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn widen_later_moves_end() {
        let mut range = DateRange::single(date(2024, 3, 1));
        range.widen(date(2024, 3, 9));
        assert_eq!(range, DateRange::new(date(2024, 3, 1), date(2024, 3, 9)));
    }

    #[test]
    fn widen_earlier_moves_start() {
        let mut range = DateRange::single(date(2024, 3, 1));
        range.widen(date(2024, 2, 1));
        assert_eq!(range, DateRange::new(date(2024, 2, 1), date(2024, 3, 1)));
    }

    #[test]
    fn widen_inside_or_on_bounds_is_noop() {
        let mut range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));
        range.widen(date(2024, 1, 1));
        range.widen(date(2024, 1, 31));
        range.widen(date(2024, 1, 15));
        assert_eq!(range, DateRange::new(date(2024, 1, 1), date(2024, 1, 31)));
    }

    #[test]
    fn widen_is_order_independent() {
        let dates = [date(2024, 5, 1), date(2024, 1, 9), date(2024, 8, 2), date(2024, 3, 3)];

        let mut forward = DateRange::single(dates[0]);
        dates[1..].iter().for_each(|d| forward.widen(*d));

        let mut backward = DateRange::single(dates[3]);
        dates[..3].iter().rev().for_each(|d| backward.widen(*d));

        assert_eq!(forward, backward);
        assert_eq!(forward, DateRange::new(date(2024, 1, 9), date(2024, 8, 2)));
    }
}
