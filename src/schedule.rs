use crate::{
    alias, days,
    pattern::{DaysOfMonth, DaysOfWeek, Field},
    search::{Moment, Search},
    set::ValueSet,
    CronError, Result,
};
use chrono::{DateTime, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Timelike};
use std::{fmt::Display, iter::FusedIterator, str::FromStr};
use tracing::{debug, trace};

/// Minimum valid year.
pub const MIN_YEAR: u16 = 1970;
/// Maximum valid year.
pub const MAX_YEAR: u16 = 2099;

/// Represents a compiled cron schedule with its query methods.
///
/// Schedule is immutable, so a single instance may be shared and queried from many threads.
///
/// For cron schedule clarification and usage examples, please refer to the [crate documentation](crate).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
#[cfg_attr(feature = "serde", serde(into = "String"))]
pub struct Schedule {
    source: String,
    pub(crate) second: ValueSet,
    pub(crate) minute: ValueSet,
    pub(crate) hour: ValueSet,
    pub(crate) dom: DaysOfMonth,
    pub(crate) month: ValueSet,
    pub(crate) dow: DaysOfWeek,
    pub(crate) year: ValueSet,
}

impl Schedule {
    /// Parses and validates provided `pattern` and constructs [`Schedule`] instance.
    ///
    /// Alternative way to construct [`Schedule`] is to use one of `try_from` or `from_str` methods.
    ///
    /// Returns [`CronError`] in a case provided pattern is unparsable or has format errors.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let schedule = Self::compile(pattern.into()).inspect_err(|err| debug!(%err, "invalid cron schedule"))?;
        trace!(schedule = %schedule.source, "cron schedule compiled");

        Ok(schedule)
    }

    fn compile(source: String) -> Result<Self> {
        let expression = alias::expand(source.trim()).unwrap_or(source.as_str());
        let elements: Vec<&str> = expression.split_whitespace().collect();

        // Augment short forms with defaults, extra fields are ignored.
        let (second, minute, hour, dom, month, dow, year) = match elements.as_slice() {
            [minute, hour, dom, month, dow] => ("0", *minute, *hour, *dom, *month, *dow, "*"),
            [second, minute, hour, dom, month, dow] => (*second, *minute, *hour, *dom, *month, *dow, "*"),
            [second, minute, hour, dom, month, dow, year, ..] => (*second, *minute, *hour, *dom, *month, *dow, *year),
            _ => return Err(CronError::InvalidFieldCount(source.clone())),
        };

        let second = Field::Second.parse_values(second)?;
        let minute = Field::Minute.parse_values(minute)?;
        let hour = Field::Hour.parse_values(hour)?;
        let dom = DaysOfMonth::parse(dom)?;
        let month = Field::Month.parse_values(month)?;
        let dow = DaysOfWeek::parse(dow)?;
        let year = Field::Year.parse_values(year)?;

        Ok(Self {
            source,
            second,
            minute,
            hour,
            dom,
            month,
            dow,
            year,
        })
    }

    /// Returns time of the earliest schedule's event strictly after the `current`.
    ///
    /// Search is performed in the local (wall clock) time of the `current` timezone,
    /// the result has the same timezone:
    /// - local times which don't exist (DST gap) are skipped;
    /// - ambiguous local times (DST overlap) resolve to the earliest instant after the `current`,
    ///   both passes of the repeated interval are visited.
    ///
    /// Returns `None` if there is no such event within the year bounds.
    pub fn next<Tz: TimeZone>(&self, current: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        [self.next_by_wall_clock(current), self.next_in_second_pass(current)]
            .into_iter()
            .flatten()
            .min()
    }

    fn next_by_wall_clock<Tz: TimeZone>(&self, current: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let tz = current.timezone();
        let mut search = Search::new(self);
        let mut from = Moment::from_naive(&current.naive_local());

        loop {
            let moment = search.next(from)?;
            let candidate = match tz.from_local_datetime(&moment.to_naive()?) {
                LocalResult::Single(dt) => Some(dt).filter(|dt| dt > current),
                LocalResult::Ambiguous(earliest, latest) => [earliest, latest].into_iter().find(|dt| dt > current),
                LocalResult::None => {
                    trace!(?moment, "skipping nonexistent local time");
                    None
                }
            };

            if candidate.is_some() {
                return candidate;
            }
            from = moment;
        }
    }

    /// Returns time of the latest schedule's event strictly before the `current`.
    ///
    /// Timezone handling is the same as for [`next()`](Schedule::next),
    /// ambiguous local times resolve to the latest instant before the `current`.
    ///
    /// Returns `None` if there is no such event within the year bounds.
    pub fn prev<Tz: TimeZone>(&self, current: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        [self.prev_by_wall_clock(current), self.prev_in_first_pass(current)]
            .into_iter()
            .flatten()
            .max()
    }

    fn prev_by_wall_clock<Tz: TimeZone>(&self, current: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let tz = current.timezone();
        let mut search = Search::new(self);

        let mut local = current.naive_local();
        if local.nanosecond() > 0 {
            // the whole second itself is before `current`
            local = local.with_nanosecond(0)?.checked_add_signed(TimeDelta::seconds(1))?;
        }
        let mut from = Moment::from_naive(&local);

        loop {
            let moment = search.prev(from)?;
            let candidate = match tz.from_local_datetime(&moment.to_naive()?) {
                LocalResult::Single(dt) => Some(dt).filter(|dt| dt < current),
                LocalResult::Ambiguous(earliest, latest) => [latest, earliest].into_iter().find(|dt| dt < current),
                LocalResult::None => {
                    trace!(?moment, "skipping nonexistent local time");
                    None
                }
            };

            if candidate.is_some() {
                return candidate;
            }
            from = moment;
        }
    }

    /// If `current` is in the first pass of a repeated local interval (DST overlap),
    /// returns the earliest event of the second pass of the same interval.
    /// Wall clock search never returns to local times at or before the `current`, so they are checked here.
    fn next_in_second_pass<Tz: TimeZone>(&self, current: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let tz = current.timezone();
        let local = current.naive_local();
        let (first, _) = match tz.from_local_datetime(&local) {
            LocalResult::Ambiguous(earliest, latest) if &earliest == current => {
                fold_bounds(&tz, &local, &earliest, &latest)?
            }
            _ => return None,
        };

        let from = first.checked_sub_signed(TimeDelta::seconds(1))?;
        let moment = Search::new(self).next(Moment::from_naive(&from))?;
        match tz.from_local_datetime(&moment.to_naive()?) {
            LocalResult::Ambiguous(_, latest) => Some(latest).filter(|dt| dt > current),
            _ => None,
        }
    }

    /// If `current` is in the second pass of a repeated local interval (DST overlap),
    /// returns the latest event of the first pass of the same interval.
    fn prev_in_first_pass<Tz: TimeZone>(&self, current: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let tz = current.timezone();
        let local = current.naive_local();
        let (_, last) = match tz.from_local_datetime(&local) {
            LocalResult::Ambiguous(earliest, latest) if &latest == current => {
                fold_bounds(&tz, &local, &earliest, &latest)?
            }
            _ => return None,
        };

        let from = last.checked_add_signed(TimeDelta::seconds(1))?;
        let moment = Search::new(self).prev(Moment::from_naive(&from))?;
        match tz.from_local_datetime(&moment.to_naive()?) {
            LocalResult::Ambiguous(earliest, _) => Some(earliest).filter(|dt| dt < current),
            _ => None,
        }
    }

    /// Returns up to `n` upcoming events strictly after the `current`, in ascending order.
    ///
    /// Result is shorter than `n` if the schedule runs out of events.
    pub fn next_n<Tz: TimeZone>(&self, current: &DateTime<Tz>, n: usize) -> Vec<DateTime<Tz>> {
        self.iter(current).take(n).collect()
    }

    /// Returns `true` if the `current` time (with zero fraction of the second) matches the schedule.
    pub fn includes<Tz: TimeZone>(&self, current: &DateTime<Tz>) -> bool {
        if current.nanosecond() > 0 {
            return false;
        }

        let moment = Moment::from_naive(&current.naive_local());
        self.year.contains(moment.year)
            && self.month.contains(moment.month)
            && self.hour.contains(moment.hour)
            && self.minute.contains(moment.minute)
            && self.second.contains(moment.second)
            && days::resolve(moment.year, moment.month, &self.dom, &self.dow).contains(moment.day)
    }

    /// Returns iterator of events strictly after the `current`, in ascending order.
    #[inline]
    pub fn iter<Tz: TimeZone>(&self, current: &DateTime<Tz>) -> ScheduleIterator<'_, Tz> {
        ScheduleIterator {
            schedule: self,
            current: Some(current.clone()),
            direction: Direction::Forward,
        }
    }

    /// Returns iterator of events strictly before the `current`, in descending order.
    #[inline]
    pub fn iter_back<Tz: TimeZone>(&self, current: &DateTime<Tz>) -> ScheduleIterator<'_, Tz> {
        ScheduleIterator {
            schedule: self,
            current: Some(current.clone()),
            direction: Direction::Backward,
        }
    }
}

/// Returns the first and the last whole seconds of the repeated local interval which contains `local`,
/// `earliest` and `latest` are both instants of the `local` time.
fn fold_bounds<Tz: TimeZone>(
    tz: &Tz,
    local: &NaiveDateTime,
    earliest: &DateTime<Tz>,
    latest: &DateTime<Tz>,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let length = earliest.offset().fix().local_minus_utc() - latest.offset().fix().local_minus_utc();
    let length = TimeDelta::seconds(length.into());
    let local = local.with_nanosecond(0)?;

    // Interval is exactly `length` long, so both points are outside of it.
    let first = fold_edge(tz, local.checked_sub_signed(length)?, local);
    let last = fold_edge(tz, local.checked_add_signed(length)?, local);

    Some((first, last))
}

/// Bisects between a non-ambiguous `outside` and an ambiguous `inside` local times,
/// returns the ambiguous second adjacent to the edge.
fn fold_edge<Tz: TimeZone>(tz: &Tz, mut outside: NaiveDateTime, mut inside: NaiveDateTime) -> NaiveDateTime {
    while (inside - outside).num_seconds().abs() > 1 {
        let middle = outside + (inside - outside) / 2;
        match tz.from_local_datetime(&middle) {
            LocalResult::Ambiguous(..) => inside = middle,
            _ => outside = middle,
        }
    }
    inside
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Iterator of schedule's events, see [`Schedule::iter`] and [`Schedule::iter_back`].
#[derive(Debug, Clone)]
pub struct ScheduleIterator<'a, Tz: TimeZone> {
    schedule: &'a Schedule,
    current: Option<DateTime<Tz>>,
    direction: Direction,
}

impl<Tz: TimeZone> Iterator for ScheduleIterator<'_, Tz> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        let next = match self.direction {
            Direction::Forward => self.schedule.next(&current),
            Direction::Backward => self.schedule.prev(&current),
        };
        self.current = next.clone();
        next
    }
}

impl<Tz: TimeZone> FusedIterator for ScheduleIterator<'_, Tz> {}

impl From<Schedule> for String {
    fn from(value: Schedule) -> Self {
        value.source
    }
}

impl From<&Schedule> for String {
    fn from(value: &Schedule) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Schedule {
    type Error = CronError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&String> for Schedule {
    type Error = CronError;

    fn try_from(value: &String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Schedule {
    type Error = CronError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for Schedule {
    type Err = CronError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}
