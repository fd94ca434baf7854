//! Carry-chain search of the nearest matching time, forward and backward.

use crate::{days, pattern::FieldValue, set::ValueSet, Schedule};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Civil (wall clock) time with whole-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Moment {
    pub(crate) year: FieldValue,
    pub(crate) month: FieldValue,
    pub(crate) day: FieldValue,
    pub(crate) hour: FieldValue,
    pub(crate) minute: FieldValue,
    pub(crate) second: FieldValue,
}

impl Moment {
    /// Drops the fractional part of the second, years outside of `u16` are saturated.
    pub(crate) fn from_naive(value: &NaiveDateTime) -> Self {
        Self {
            year: value.year().clamp(0, FieldValue::MAX.into()) as FieldValue,
            month: value.month() as FieldValue,
            day: value.day() as FieldValue,
            hour: value.hour() as FieldValue,
            minute: value.minute() as FieldValue,
            second: value.second() as FieldValue,
        }
    }

    pub(crate) fn to_naive(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())?.and_hms_opt(
            self.hour.into(),
            self.minute.into(),
            self.second.into(),
        )
    }
}

/// Resolved days of the single month.
#[derive(Debug)]
struct MonthDays {
    year: FieldValue,
    month: FieldValue,
    days: ValueSet,
}

/// State of a single search.
///
/// Holds the list of days resolved for the last visited month, so it's never shared between searches.
#[derive(Debug)]
pub(crate) struct Search<'a> {
    schedule: &'a Schedule,
    month_days: Option<MonthDays>,
}

impl<'a> Search<'a> {
    pub(crate) fn new(schedule: &'a Schedule) -> Self {
        Self {
            schedule,
            month_days: None,
        }
    }

    /// Returns days of the month allowed by the schedule, resolving them if the month differs from the cached one.
    fn days(&mut self, year: FieldValue, month: FieldValue) -> &ValueSet {
        let schedule = self.schedule;
        let month_days = match self.month_days.take() {
            Some(cached) if cached.year == year && cached.month == month => cached,
            _ => MonthDays {
                year,
                month,
                days: days::resolve(year, month, &schedule.dom, &schedule.dow),
            },
        };

        &self.month_days.insert(month_days).days
    }

    /// Earliest matching moment strictly after `from`.
    pub(crate) fn next(&mut self, from: Moment) -> Option<Moment> {
        let schedule = self.schedule;

        // `from` may fall between two matching moments,
        // so the first mismatching level jumps over to the closest matching value.
        match schedule.year.ceil(from.year) {
            None => return None,
            Some(year) if year != from.year => return self.next_year(from.year),
            _ => {}
        }
        match schedule.month.ceil(from.month) {
            None => return self.next_year(from.year),
            Some(month) if month != from.month => return self.next_month(from.year, from.month),
            _ => {}
        }
        match self.days(from.year, from.month).ceil(from.day) {
            None => return self.next_month(from.year, from.month),
            Some(day) if day != from.day => return self.next_day(from),
            _ => {}
        }
        match schedule.hour.ceil(from.hour) {
            None => return self.next_day(from),
            Some(hour) if hour != from.hour => return self.next_hour(from),
            _ => {}
        }
        match schedule.minute.ceil(from.minute) {
            None => return self.next_hour(from),
            Some(minute) if minute != from.minute => return self.next_minute(from),
            _ => {}
        }
        match schedule.second.ceil(from.second) {
            None => self.next_minute(from),
            _ => self.next_second(from),
        }
    }

    /// Latest matching moment strictly before `from`.
    pub(crate) fn prev(&mut self, from: Moment) -> Option<Moment> {
        let schedule = self.schedule;

        match schedule.year.floor(from.year) {
            None => return None,
            Some(year) if year != from.year => return self.prev_year(from.year),
            _ => {}
        }
        match schedule.month.floor(from.month) {
            None => return self.prev_year(from.year),
            Some(month) if month != from.month => return self.prev_month(from.year, from.month),
            _ => {}
        }
        match self.days(from.year, from.month).floor(from.day) {
            None => return self.prev_month(from.year, from.month),
            Some(day) if day != from.day => return self.prev_day(from),
            _ => {}
        }
        match schedule.hour.floor(from.hour) {
            None => return self.prev_day(from),
            Some(hour) if hour != from.hour => return self.prev_hour(from),
            _ => {}
        }
        match schedule.minute.floor(from.minute) {
            None => return self.prev_hour(from),
            Some(minute) if minute != from.minute => return self.prev_minute(from),
            _ => {}
        }
        match schedule.second.floor(from.second) {
            None => self.prev_minute(from),
            _ => self.prev_second(from),
        }
    }

    /// First matching moment of the month, `None` if the month has no matching days.
    fn first_of_month(&mut self, year: FieldValue, month: FieldValue) -> Option<Moment> {
        let schedule = self.schedule;
        Some(Moment {
            year,
            month,
            day: self.days(year, month).first()?,
            hour: schedule.hour.first()?,
            minute: schedule.minute.first()?,
            second: schedule.second.first()?,
        })
    }

    /// Last matching moment of the month, `None` if the month has no matching days.
    fn last_of_month(&mut self, year: FieldValue, month: FieldValue) -> Option<Moment> {
        let schedule = self.schedule;
        Some(Moment {
            year,
            month,
            day: self.days(year, month).last()?,
            hour: schedule.hour.last()?,
            minute: schedule.minute.last()?,
            second: schedule.second.last()?,
        })
    }

    fn next_year(&mut self, year: FieldValue) -> Option<Moment> {
        let year = self.schedule.year.after(year)?;
        let month = self.schedule.month.first()?;
        self.first_of_month(year, month)
            .or_else(|| self.next_month(year, month))
    }

    /// Carries over months without matching days until the years are exhausted.
    fn next_month(&mut self, mut year: FieldValue, mut month: FieldValue) -> Option<Moment> {
        let schedule = self.schedule;
        loop {
            match schedule.month.after(month) {
                Some(next) => month = next,
                None => {
                    year = schedule.year.after(year)?;
                    month = schedule.month.first()?;
                }
            }

            if let Some(moment) = self.first_of_month(year, month) {
                return Some(moment);
            }
        }
    }

    fn next_day(&mut self, from: Moment) -> Option<Moment> {
        let schedule = self.schedule;
        match self.days(from.year, from.month).after(from.day) {
            Some(day) => Some(Moment {
                day,
                hour: schedule.hour.first()?,
                minute: schedule.minute.first()?,
                second: schedule.second.first()?,
                ..from
            }),
            None => self.next_month(from.year, from.month),
        }
    }

    fn next_hour(&mut self, from: Moment) -> Option<Moment> {
        let schedule = self.schedule;
        match schedule.hour.after(from.hour) {
            Some(hour) => Some(Moment {
                hour,
                minute: schedule.minute.first()?,
                second: schedule.second.first()?,
                ..from
            }),
            None => self.next_day(from),
        }
    }

    fn next_minute(&mut self, from: Moment) -> Option<Moment> {
        let schedule = self.schedule;
        match schedule.minute.after(from.minute) {
            Some(minute) => Some(Moment {
                minute,
                second: schedule.second.first()?,
                ..from
            }),
            None => self.next_hour(from),
        }
    }

    fn next_second(&mut self, from: Moment) -> Option<Moment> {
        match self.schedule.second.after(from.second) {
            Some(second) => Some(Moment { second, ..from }),
            None => self.next_minute(from),
        }
    }

    fn prev_year(&mut self, year: FieldValue) -> Option<Moment> {
        let year = self.schedule.year.before(year)?;
        let month = self.schedule.month.last()?;
        self.last_of_month(year, month)
            .or_else(|| self.prev_month(year, month))
    }

    /// Carries over months without matching days until the years are exhausted.
    fn prev_month(&mut self, mut year: FieldValue, mut month: FieldValue) -> Option<Moment> {
        let schedule = self.schedule;
        loop {
            match schedule.month.before(month) {
                Some(prev) => month = prev,
                None => {
                    year = schedule.year.before(year)?;
                    month = schedule.month.last()?;
                }
            }

            if let Some(moment) = self.last_of_month(year, month) {
                return Some(moment);
            }
        }
    }

    fn prev_day(&mut self, from: Moment) -> Option<Moment> {
        let schedule = self.schedule;
        match self.days(from.year, from.month).before(from.day) {
            Some(day) => Some(Moment {
                day,
                hour: schedule.hour.last()?,
                minute: schedule.minute.last()?,
                second: schedule.second.last()?,
                ..from
            }),
            None => self.prev_month(from.year, from.month),
        }
    }

    fn prev_hour(&mut self, from: Moment) -> Option<Moment> {
        let schedule = self.schedule;
        match schedule.hour.before(from.hour) {
            Some(hour) => Some(Moment {
                hour,
                minute: schedule.minute.last()?,
                second: schedule.second.last()?,
                ..from
            }),
            None => self.prev_day(from),
        }
    }

    fn prev_minute(&mut self, from: Moment) -> Option<Moment> {
        let schedule = self.schedule;
        match schedule.minute.before(from.minute) {
            Some(minute) => Some(Moment {
                minute,
                second: schedule.second.last()?,
                ..from
            }),
            None => self.prev_hour(from),
        }
    }

    fn prev_second(&mut self, from: Moment) -> Option<Moment> {
        match self.schedule.second.before(from.second) {
            Some(second) => Some(Moment { second, ..from }),
            None => self.prev_minute(from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;

    fn moment(value: &str) -> Moment {
        Moment::from_naive(&NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap())
    }

    #[rstest]
    #[case("* * * * * * *", "2024-01-01 00:00:00", "2024-01-01 00:00:01")]
    #[case("* * * * * * *", "2024-12-31 23:59:59", "2025-01-01 00:00:00")]
    #[case("0 * * * * * *", "2024-02-28 23:59:00", "2024-02-29 00:00:00")]
    #[case("0 0 0 * * * *", "2023-02-28 12:00:00", "2023-03-01 00:00:00")]
    #[case("30 15 10 * * * *", "2024-01-01 10:15:30", "2024-01-02 10:15:30")]
    #[case("30 15 10 * * * *", "2024-01-01 10:15:29", "2024-01-01 10:15:30")]
    #[case("30 15 10 * * * *", "2024-01-01 10:16:00", "2024-01-02 10:15:30")]
    #[case("0 0 0 31 * * *", "2024-01-31 00:00:00", "2024-03-31 00:00:00")]
    #[case("0 0 0 31 * * *", "2024-04-01 00:00:00", "2024-05-31 00:00:00")]
    #[case("0 0 0 29 2 * *", "2024-02-29 00:00:00", "2028-02-29 00:00:00")]
    #[case("0 0 0 * * 1#5 *", "2024-02-01 00:00:00", "2024-04-29 00:00:00")]
    #[case("0 0 0 1 1 * 2024", "2024-01-01 00:00:00", "None")]
    #[case("0 0 0 1 1 * 2024", "1900-06-01 00:00:00", "2024-01-01 00:00:00")]
    #[case("0 0 0 30 2 * *", "2024-01-01 00:00:00", "None")]
    #[timeout(Duration::from_secs(1))]
    fn test_next(#[case] pattern: &str, #[case] from: &str, #[case] expected: &str) {
        let schedule = Schedule::new(pattern).unwrap();
        let next = Search::new(&schedule).next(moment(from));
        let expected = (expected != "None").then(|| moment(expected));
        assert_eq!(next, expected, "pattern = {pattern}, from = {from}");
    }

    #[rstest]
    #[case("* * * * * * *", "2024-01-01 00:00:00", "2023-12-31 23:59:59")]
    #[case("0 * * * * * *", "2024-03-01 00:00:00", "2024-02-29 23:59:00")]
    #[case("0 0 0 * * * *", "2023-03-01 00:00:00", "2023-02-28 00:00:00")]
    #[case("30 15 10 * * * *", "2024-01-02 10:15:30", "2024-01-01 10:15:30")]
    #[case("30 15 10 * * * *", "2024-01-02 10:15:31", "2024-01-02 10:15:30")]
    #[case("0 0 0 31 * * *", "2024-03-31 00:00:00", "2024-01-31 00:00:00")]
    #[case("0 0 0 29 2 * *", "2028-02-29 00:00:00", "2024-02-29 00:00:00")]
    #[case("0 0 0 * * 1#5 *", "2024-04-01 00:00:00", "2024-01-29 00:00:00")]
    #[case("0 0 0 1 1 * 2024", "2024-01-01 00:00:00", "None")]
    #[case("0 0 0 1 1 * 2024", "2030-06-01 00:00:00", "2024-01-01 00:00:00")]
    #[case("59 59 23 L 12 * 2020-2022", "2099-01-01 00:00:00", "2022-12-31 23:59:59")]
    #[case("0 0 0 30 2 * *", "2024-01-01 00:00:00", "None")]
    #[timeout(Duration::from_secs(1))]
    fn test_prev(#[case] pattern: &str, #[case] from: &str, #[case] expected: &str) {
        let schedule = Schedule::new(pattern).unwrap();
        let prev = Search::new(&schedule).prev(moment(from));
        let expected = (expected != "None").then(|| moment(expected));
        assert_eq!(prev, expected, "pattern = {pattern}, from = {from}");
    }

    #[test]
    fn test_days_cache_follows_month() {
        let schedule = Schedule::new("0 0 0 L * *").unwrap();
        let mut search = Search::new(&schedule);

        assert_eq!(search.days(2024, 2).as_slice(), &[29]);
        assert_eq!(search.days(2024, 4).as_slice(), &[30]);
        assert_eq!(search.days(2023, 2).as_slice(), &[28]);
        assert_eq!(search.days(2023, 2).as_slice(), &[28]);
    }

    #[test]
    fn test_moment_conversion() {
        let naive = NaiveDateTime::parse_from_str("2024-02-29 13:14:15", "%Y-%m-%d %H:%M:%S").unwrap();
        let moment = Moment::from_naive(&naive);
        assert_eq!(
            moment,
            Moment {
                year: 2024,
                month: 2,
                day: 29,
                hour: 13,
                minute: 14,
                second: 15
            }
        );
        assert_eq!(moment.to_naive(), Some(naive));

        let before_epoch = NaiveDate::from_ymd_opt(-44, 3, 15).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(Moment::from_naive(&before_epoch).year, 0);
    }
}
