//! Calendar arithmetic over plain field values.

use crate::pattern::FieldValue;

/// Returns `true` if provided year is leap.
#[inline]
pub(crate) fn is_leap_year(year: FieldValue) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns number of days in specified month.
pub(crate) fn days_in_month(year: FieldValue, month: FieldValue) -> FieldValue {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => panic!("Invalid month: {month}"),
    }
}

/// Calculates day of week (Sunday is `0`) for specified date.
pub(crate) fn day_of_week(year: FieldValue, month: FieldValue, day: FieldValue) -> FieldValue {
    if day == 0 || day > days_in_month(year, month) {
        panic!("Invalid date: {year:04}-{month:02}-{day:02}");
    }

    let month_offset: FieldValue = if is_leap_year(year) {
        [0, 3, 4, 0, 2, 5, 0, 3, 6, 1, 4, 6]
    } else {
        [0, 3, 3, 6, 1, 4, 6, 2, 5, 0, 3, 5]
    }[(month - 1) as usize];

    let year = year - 1;

    (day + month_offset + 5 * (year % 4) + 4 * (year % 100) + 6 * (year % 400)) % 7
}

/// Returns all days of the month which fall on the specified day of the week.
pub(crate) fn dow_days(
    year: FieldValue,
    month: FieldValue,
    dow: FieldValue,
) -> impl Iterator<Item = FieldValue> {
    let first = 1 + (dow + 7 - day_of_week(year, month, 1)) % 7;
    (first..=days_in_month(year, month)).step_by(7)
}

/// Returns day in the month for the N-th specified day of the week, if the month has one.
pub(crate) fn nth_dow(year: FieldValue, month: FieldValue, dow: FieldValue, n: FieldValue) -> Option<FieldValue> {
    dow_days(year, month, dow).nth(n.checked_sub(1)? as usize)
}

/// Returns day in the month for the last specified day of the week.
pub(crate) fn last_dow(year: FieldValue, month: FieldValue, dow: FieldValue) -> FieldValue {
    let last_day = days_in_month(year, month);
    last_day - (day_of_week(year, month, last_day) + 7 - dow) % 7
}

/// Returns the workday (Monday to Friday) nearest to the specified date without leaving the month.
pub(crate) fn nearest_workday(year: FieldValue, month: FieldValue, day: FieldValue) -> FieldValue {
    let last_day = days_in_month(year, month);

    match day_of_week(year, month, day) {
        // sunday
        0 if day == last_day => day - 2,
        0 => day + 1,
        // saturday
        6 if day == 1 => day + 2,
        6 => day - 1,
        _ => day,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const DAYS: [&str; 7] = ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

    #[rstest]
    #[case(2024, true)]
    #[case(1996, true)]
    #[case(2000, true)]
    #[case(1600, true)]
    #[case(2023, false)]
    #[case(2021, false)]
    #[case(1900, false)]
    #[case(2100, false)]
    fn test_is_leap_year(#[case] year: FieldValue, #[case] expected: bool) {
        assert_eq!(is_leap_year(year), expected, "{year}");
    }

    #[rstest]
    #[case(2023, 1, 31)]
    #[case(2023, 3, 31)]
    #[case(2023, 4, 30)]
    #[case(2023, 6, 30)]
    #[case(2023, 9, 30)]
    #[case(2023, 11, 30)]
    #[case(2023, 12, 31)]
    #[case(2023, 2, 28)]
    #[case(2024, 2, 29)]
    #[case(2000, 2, 29)]
    #[case(1900, 2, 28)]
    #[case(2100, 2, 28)]
    fn test_days_in_month(#[case] y: FieldValue, #[case] m: FieldValue, #[case] expected: FieldValue) {
        assert_eq!(days_in_month(y, m), expected, "{y:04}-{m:02} has {expected} days");
    }

    #[rstest]
    #[case(2023, 0)]
    #[case(2023, 13)]
    #[should_panic(expected = "Invalid month")]
    fn test_days_in_month_invalid(#[case] y: FieldValue, #[case] m: FieldValue) {
        days_in_month(y, m);
    }

    #[rstest]
    #[case(2023, 12, 25, 1)]
    #[case(2024, 1, 1, 1)]
    #[case(2025, 1, 1, 3)]
    #[case(2024, 2, 29, 4)]
    #[case(2023, 1, 1, 0)]
    #[case(2000, 1, 1, 6)]
    #[case(1900, 1, 1, 1)]
    #[case(1970, 1, 1, 4)]
    #[case(2024, 6, 15, 6)]
    #[case(2024, 9, 15, 0)]
    #[case(2099, 1, 1, 4)]
    fn test_day_of_week(
        #[case] y: FieldValue,
        #[case] m: FieldValue,
        #[case] d: FieldValue,
        #[case] expected: FieldValue,
    ) {
        assert_eq!(day_of_week(y, m, d), expected, "{y}-{m:02}-{d:02} is {}", DAYS[expected as usize]);
    }

    #[rstest]
    #[case(2023, 2, 29)]
    #[case(2025, 1, 0)]
    #[case(2023, 4, 31)]
    #[should_panic(expected = "Invalid date")]
    fn test_day_of_week_invalid_date(#[case] y: FieldValue, #[case] m: FieldValue, #[case] d: FieldValue) {
        day_of_week(y, m, d);
    }

    #[rstest]
    // 2024-01-01 is Monday
    #[case(2024, 1, 1, vec![1, 8, 15, 22, 29])]
    #[case(2024, 1, 0, vec![7, 14, 21, 28])]
    #[case(2024, 1, 3, vec![3, 10, 17, 24, 31])]
    #[case(2024, 2, 4, vec![1, 8, 15, 22, 29])]
    #[case(2023, 2, 4, vec![2, 9, 16, 23])]
    fn test_dow_days(
        #[case] y: FieldValue,
        #[case] m: FieldValue,
        #[case] dow: FieldValue,
        #[case] expected: Vec<FieldValue>,
    ) {
        assert_eq!(dow_days(y, m, dow).collect::<Vec<_>>(), expected);
    }

    #[rstest]
    #[case(2023, 12, 0, 1, Some(3))]
    #[case(2023, 12, 5, 1, Some(1))]
    #[case(2023, 12, 0, 4, Some(24))]
    #[case(2023, 12, 0, 5, Some(31))]
    #[case(2023, 12, 1, 5, None)]
    #[case(2000, 2, 1, 4, Some(28))]
    #[case(2024, 1, 0, 3, Some(21))]
    #[case(2024, 1, 1, 0, None)]
    fn test_nth_dow(
        #[case] y: FieldValue,
        #[case] m: FieldValue,
        #[case] dow: FieldValue,
        #[case] n: FieldValue,
        #[case] expected: Option<FieldValue>,
    ) {
        assert_eq!(nth_dow(y, m, dow, n), expected, "#{n} {} of {y}-{m:02}", DAYS[dow as usize]);
    }

    #[rstest]
    #[case(2023, 12, 0, 31)]
    #[case(2023, 11, 0, 26)]
    #[case(2024, 2, 0, 25)]
    #[case(2023, 2, 0, 26)]
    #[case(2023, 12, 1, 25)]
    #[case(2023, 12, 6, 30)]
    #[case(2024, 2, 4, 29)]
    #[case(1900, 2, 0, 25)]
    fn test_last_dow(#[case] y: FieldValue, #[case] m: FieldValue, #[case] dow: FieldValue, #[case] expected: FieldValue) {
        assert_eq!(last_dow(y, m, dow), expected, "last {} of {y}-{m:02}", DAYS[dow as usize]);
    }

    #[rstest]
    #[case(2024, 1, 1, 1)]
    #[case(2024, 1, 5, 5)]
    // saturday -> friday
    #[case(2024, 1, 6, 5)]
    // sunday -> monday
    #[case(2024, 1, 7, 8)]
    #[case(2024, 6, 15, 14)]
    #[case(2024, 9, 15, 16)]
    #[case(2024, 6, 29, 28)]
    #[case(2024, 6, 30, 28)]
    // last day is sunday
    #[case(2024, 3, 31, 29)]
    // last day is saturday
    #[case(2024, 8, 31, 30)]
    // first day is saturday
    #[case(2024, 6, 1, 3)]
    // first day is sunday
    #[case(2024, 9, 1, 2)]
    fn test_nearest_workday(
        #[case] y: FieldValue,
        #[case] m: FieldValue,
        #[case] d: FieldValue,
        #[case] expected: FieldValue,
    ) {
        assert_eq!(nearest_workday(y, m, d), expected, "{y}-{m:02}-{d:02}");
    }
}
