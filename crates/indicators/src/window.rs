use chrono::{Datelike, Days, Months, NaiveDate};
use core_types::Timeframe;

/// Resolves the exclusive left edge of a display window.
///
/// `first` and `last` are the first and last dates of the full history. Rows
/// dated strictly after the returned date belong to the window. Month and year
/// offsets clamp to the end of a shorter month (31 March minus one month is
/// 28/29 February).
pub fn window_start(first: NaiveDate, last: NaiveDate, timeframe: Timeframe) -> NaiveDate {
    let shifted = match timeframe {
        Timeframe::FiveDays => last.checked_sub_days(Days::new(5)),
        Timeframe::OneMonth => last.checked_sub_months(Months::new(1)),
        Timeframe::ThreeMonths => last.checked_sub_months(Months::new(3)),
        Timeframe::SixMonths => last.checked_sub_months(Months::new(6)),
        Timeframe::OneYear => last.checked_sub_months(Months::new(12)),
        Timeframe::FiveYears => last.checked_sub_months(Months::new(60)),
        Timeframe::YearToDate => NaiveDate::from_ymd_opt(last.year(), 1, 1),
        Timeframe::Max => Some(first),
    };
    // Only reachable at the edge of chrono's date range.
    shifted.unwrap_or(NaiveDate::MIN)
}

/// Index of the first row inside the window, given ascending dates.
pub fn window_offset(dates: &[NaiveDate], timeframe: Timeframe) -> usize {
    let (Some(&first), Some(&last)) = (dates.first(), dates.last()) else {
        return 0;
    };
    let start = window_start(first, last, timeframe);
    dates.partition_point(|d| *d <= start)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn calendar_offsets() {
        let first = d(2015, 1, 2);
        let last = d(2024, 3, 31);
        assert_eq!(window_start(first, last, Timeframe::FiveDays), d(2024, 3, 26));
        assert_eq!(window_start(first, last, Timeframe::OneMonth), d(2024, 2, 29));
        assert_eq!(window_start(first, last, Timeframe::ThreeMonths), d(2023, 12, 31));
        assert_eq!(window_start(first, last, Timeframe::SixMonths), d(2023, 9, 30));
        assert_eq!(window_start(first, last, Timeframe::OneYear), d(2023, 3, 31));
        assert_eq!(window_start(first, last, Timeframe::FiveYears), d(2019, 3, 31));
        assert_eq!(window_start(first, last, Timeframe::YearToDate), d(2024, 1, 1));
        assert_eq!(window_start(first, last, Timeframe::Max), first);
    }

    #[test]
    fn rows_on_the_start_date_are_excluded() {
        let dates = vec![d(2023, 3, 30), d(2023, 3, 31), d(2023, 4, 3), d(2024, 3, 28), d(2024, 3, 31)];
        assert_eq!(window_offset(&dates, Timeframe::OneYear), 2);
        // `max` keeps everything after the first date.
        assert_eq!(window_offset(&dates, Timeframe::Max), 1);
    }

    #[test]
    fn empty_dates_have_zero_offset() {
        assert_eq!(window_offset(&[], Timeframe::OneMonth), 0);
    }
}
