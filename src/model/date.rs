use chrono::{Datelike, NaiveDate};

/// Average length of a year used by the timeline scale.
pub const DAYS_PER_YEAR: f64 = 365.25;
/// Average length of a month used by the timeline scale.
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Convert a calendar date into an approximate, monotonic day count.
///
/// This is a proportional scale, not a calendar: leap years and month
/// lengths are averaged out, so two dates a few decades apart drift by a
/// day or so against the real calendar. Labels shown to the user are
/// formatted with `chrono` instead.
pub fn day_number(year: i32, month: u32, day: u32) -> f64 {
    year as f64 * DAYS_PER_YEAR + (month as f64 - 1.0) * DAYS_PER_MONTH + day as f64
}

/// Day number of the first of January of `year`.
pub fn year_start(year: i32) -> f64 {
    day_number(year, 1, 1)
}

/// Day number of a `chrono` date.
pub fn day_number_of(date: NaiveDate) -> f64 {
    day_number(date.year(), date.month(), date.day())
}

/// The local calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// A start/end pair of day numbers.
///
/// A span whose end does not lie after its start is a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaySpan {
    pub start: f64,
    pub end: f64,
}

impl DaySpan {
    /// Build a span, clamping an end that precedes the start.
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn point(at: f64) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_point(&self) -> bool {
        self.end <= self.start
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Ranges are half-open `[start, end)`; a point covers only itself.
    #[cfg(test)]
    pub fn covers(&self, instant: f64) -> bool {
        if self.is_point() {
            instant == self.start
        } else {
            self.start <= instant && instant < self.end
        }
    }

    #[cfg(test)]
    pub fn overlaps(&self, other: &DaySpan) -> bool {
        self.covers(other.start) || other.covers(self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_number_matches_formula() {
        assert_eq!(day_number(2000, 1, 1), 2000.0 * 365.25 + 1.0);
        assert_eq!(day_number(2000, 3, 10), 2000.0 * 365.25 + 2.0 * 30.44 + 10.0);
        assert_eq!(year_start(1988), day_number(1988, 1, 1));
    }

    #[test]
    fn day_number_is_monotonic_in_calendar_order() {
        let mut previous: Option<((i32, u32, u32), f64)> = None;
        for year in 1899..=1903 {
            for month in 1..=12 {
                for day in 1..=31 {
                    let n = day_number(year, month, day);
                    if let Some((prev_date, prev)) = previous {
                        assert!(
                            prev < n,
                            "{:?} ({}) should precede {:?} ({})",
                            prev_date,
                            prev,
                            (year, month, day),
                            n
                        );
                    }
                    previous = Some(((year, month, day), n));
                }
            }
        }
    }

    #[test]
    fn chrono_dates_map_onto_the_same_scale() {
        let date = NaiveDate::from_ymd_opt(2023, 6, 5).unwrap();
        assert_eq!(day_number_of(date), day_number(2023, 6, 5));
    }

    #[test]
    fn span_clamps_reversed_ends() {
        let span = DaySpan::new(10.0, 4.0);
        assert!(span.is_point());
        assert_eq!(span.duration(), 0.0);
    }

    #[test]
    fn half_open_ranges_touching_do_not_overlap() {
        let a = DaySpan::new(0.0, 5.0);
        let b = DaySpan::new(5.0, 8.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&DaySpan::new(4.9, 6.0)));
    }

    #[test]
    fn identical_points_overlap_distinct_points_do_not() {
        assert!(DaySpan::point(3.0).overlaps(&DaySpan::point(3.0)));
        assert!(!DaySpan::point(3.0).overlaps(&DaySpan::point(3.5)));
        // A point sitting on the start of a range is inside it, on its end is not.
        assert!(DaySpan::point(2.0).overlaps(&DaySpan::new(2.0, 6.0)));
        assert!(!DaySpan::point(6.0).overlaps(&DaySpan::new(2.0, 6.0)));
    }
}
