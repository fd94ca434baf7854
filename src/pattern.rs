use crate::{
    schedule::{MAX_YEAR, MIN_YEAR},
    set::ValueSet,
    CronError, Result,
};
use std::{collections::BTreeSet, fmt::Display};

pub(crate) type FieldValue = u16;

/// Field of the cron schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Seconds, `0-59`.
    Second,
    /// Minutes, `0-59`.
    Minute,
    /// Hours, `0-23`.
    Hour,
    /// Day of month, `1-31`.
    DayOfMonth,
    /// Month, `1-12` or `JAN-DEC`.
    Month,
    /// Day of week, `0-7` or `SUN-SAT`.
    DayOfWeek,
    /// Year, `1970-2099`.
    Year,
}

impl Field {
    const DAYS_OF_WEEK: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];
    const DAYS_OF_WEEK_FULL: [&str; 7] = [
        "SUNDAY",
        "MONDAY",
        "TUESDAY",
        "WEDNESDAY",
        "THURSDAY",
        "FRIDAY",
        "SATURDAY",
    ];
    const MONTHS: [&str; 12] = [
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ];
    const MONTHS_FULL: [&str; 12] = [
        "JANUARY",
        "FEBRUARY",
        "MARCH",
        "APRIL",
        "MAY",
        "JUNE",
        "JULY",
        "AUGUST",
        "SEPTEMBER",
        "OCTOBER",
        "NOVEMBER",
        "DECEMBER",
    ];

    /// Field bounds used by wildcards and open-ended steps.
    pub(crate) fn min_max(&self) -> (FieldValue, FieldValue) {
        match self {
            Self::Second | Self::Minute => (0, 59),
            Self::Hour => (0, 23),
            Self::DayOfMonth => (1, 31),
            Self::Month => (1, 12),
            Self::DayOfWeek => (0, 6),
            Self::Year => (MIN_YEAR, MAX_YEAR),
        }
    }

    /// Converts a single (upper-cased) token into a field value.
    fn parse_value(&self, input: &str) -> Result<FieldValue> {
        let (min, max) = self.min_max();
        // `7` is an alias of Sunday
        let max = if *self == Self::DayOfWeek { 7 } else { max };

        if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
            return match input.parse::<FieldValue>() {
                Ok(value) if (min..=max).contains(&value) => Ok(value),
                _ => Err(CronError::OutOfRange {
                    field: *self,
                    value: input.to_owned(),
                }),
            };
        }

        let (short, full, shift): (&[&str], &[&str], FieldValue) = match self {
            Self::Month => (&Self::MONTHS, &Self::MONTHS_FULL, 1),
            Self::DayOfWeek => (&Self::DAYS_OF_WEEK, &Self::DAYS_OF_WEEK_FULL, 0),
            _ => (&[], &[], 0),
        };

        short
            .iter()
            .position(|&name| name == input)
            .or_else(|| full.iter().position(|&name| name == input))
            .map(|index| index as FieldValue + shift)
            .ok_or_else(|| CronError::UnknownToken {
                field: *self,
                value: input.to_owned(),
            })
    }

    fn parse_step(&self, item: &str, step: &str) -> Result<FieldValue> {
        let digits = !step.is_empty() && step.bytes().all(|b| b.is_ascii_digit());
        match step.parse::<FieldValue>() {
            Ok(value) if digits && value > 0 => Ok(value),
            _ => Err(CronError::InvalidStep {
                field: *self,
                value: item.to_owned(),
            }),
        }
    }

    /// Expands a single list element (`*`, `N`, `N-M`, `N/S`, `*/S`, `N-M/S`) into `values`.
    fn expand(&self, item: &str, values: &mut BTreeSet<FieldValue>) -> Result<()> {
        let (range, step) = match item.split_once('/') {
            Some((range, step)) => (range, Some(self.parse_step(item, step)?)),
            None => (item, None),
        };

        let (min, max) = self.min_max();
        let (start, end) = if is_wildcard(range) {
            (min, max)
        } else if let Some((start, end)) = range.split_once('-') {
            if start.is_empty() || end.is_empty() {
                return Err(CronError::InvalidRange {
                    field: *self,
                    value: item.to_owned(),
                });
            }
            let start = self.parse_value(start)?;
            let end = self.parse_value(end)?;
            if start > end {
                return Err(CronError::InvalidRange {
                    field: *self,
                    value: item.to_owned(),
                });
            }
            (start, end)
        } else {
            let start = self.parse_value(range)?;
            match step {
                Some(_) => (start, max.max(start)),
                None => (start, start),
            }
        };

        values.extend((start..=end).step_by(step.unwrap_or(1) as usize));
        Ok(())
    }

    /// Parses the whole field text of a plain numeric field.
    pub(crate) fn parse_values(&self, input: &str) -> Result<ValueSet> {
        let input = input.to_ascii_uppercase();
        let mut values = BTreeSet::new();
        for item in self.split(&input)? {
            self.expand(item, &mut values)?;
        }

        Ok(values.into())
    }

    /// Splits comma-separated list, rejecting empty field and empty elements.
    fn split<'a>(&self, input: &'a str) -> Result<Vec<&'a str>> {
        let items: Vec<&str> = input.split(',').collect();
        if items.iter().any(|item| item.is_empty()) {
            return Err(CronError::EmptyField(*self));
        }

        Ok(items)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::Second => "second",
            Field::Minute => "minute",
            Field::Hour => "hour",
            Field::DayOfMonth => "day of month",
            Field::Month => "month",
            Field::DayOfWeek => "day of week",
            Field::Year => "year",
        };
        f.write_str(name)
    }
}

#[inline]
fn is_wildcard(input: &str) -> bool {
    input == "*" || input == "?"
}

/// Compiled day-of-month field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub(crate) struct DaysOfMonth {
    /// Particular days, may exceed the length of a specific month.
    pub(crate) days: BTreeSet<FieldValue>,
    /// Days to find the nearest workday to (`15W`).
    pub(crate) workdays: BTreeSet<FieldValue>,
    /// `L`
    pub(crate) last_day: bool,
    /// `LW`
    pub(crate) last_workday: bool,
    pub(crate) restricted: bool,
}

impl DaysOfMonth {
    pub(crate) fn parse(input: &str) -> Result<Self> {
        const FIELD: Field = Field::DayOfMonth;

        let input = input.to_ascii_uppercase();
        let mut parsed = Self {
            restricted: !is_wildcard(&input),
            ..Default::default()
        };

        for item in FIELD.split(&input)? {
            if item == "L" {
                parsed.last_day = true;
            } else if item == "LW" || item == "WL" {
                parsed.last_workday = true;
            } else if let Some(day) = item.strip_suffix('W') {
                parsed.workdays.insert(FIELD.parse_value(day)?);
            } else {
                FIELD.expand(item, &mut parsed.days)?;
            }
        }

        Ok(parsed)
    }
}

/// Compiled day-of-week field, Sunday is `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub(crate) struct DaysOfWeek {
    pub(crate) days: BTreeSet<FieldValue>,
    /// (day of week, occurrence) pairs of `5#3`.
    pub(crate) nth: BTreeSet<(FieldValue, FieldValue)>,
    /// Days of week of `5L`.
    pub(crate) last: BTreeSet<FieldValue>,
    pub(crate) restricted: bool,
}

impl DaysOfWeek {
    pub(crate) fn parse(input: &str) -> Result<Self> {
        const FIELD: Field = Field::DayOfWeek;

        let input = input.to_ascii_uppercase();
        let mut parsed = Self {
            restricted: !is_wildcard(&input),
            ..Default::default()
        };
        let mut days = BTreeSet::new();

        for item in FIELD.split(&input)? {
            // `L` and `#` need a day of week before them
            if item.starts_with(['L', '#']) {
                return Err(CronError::UnknownToken {
                    field: FIELD,
                    value: item.to_owned(),
                });
            }

            if let Some((dow, nth)) = item.split_once('#') {
                let dow = FIELD.parse_value(dow)? % 7;
                let nth = match nth.parse::<FieldValue>() {
                    Ok(nth) if (1..=5).contains(&nth) => nth,
                    _ => {
                        return Err(CronError::InvalidOccurrence {
                            field: FIELD,
                            value: item.to_owned(),
                        })
                    }
                };
                parsed.nth.insert((dow, nth));
            } else if let Some(dow) = item.strip_suffix('L') {
                parsed.last.insert(FIELD.parse_value(dow)? % 7);
            } else {
                FIELD.expand(item, &mut days)?;
            }
        }

        parsed.days = days.into_iter().map(|dow| dow % 7).collect();
        Ok(parsed)
    }
}
