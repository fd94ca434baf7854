//! Resolution of the day-of-month and day-of-week fields into concrete days of a specific month.

use crate::{
    pattern::{DaysOfMonth, DaysOfWeek, FieldValue},
    set::ValueSet,
    utils,
};
use std::collections::BTreeSet;

/// Returns ascending list of days of the `month` which satisfy both day fields.
///
/// When both fields are restricted the result is a union of days matched by either of them,
/// if only one is restricted it's the only constraint, otherwise every day of the month matches.
/// The result may be empty, i.e. `5#5` in a month without the fifth Friday.
pub(crate) fn resolve(year: FieldValue, month: FieldValue, dom: &DaysOfMonth, dow: &DaysOfWeek) -> ValueSet {
    let last_day = utils::days_in_month(year, month);

    if !dom.restricted && !dow.restricted {
        return (1..=last_day).collect();
    }

    let mut days = BTreeSet::new();

    if dom.restricted {
        days.extend(dom.days.iter().copied().filter(|day| *day <= last_day));
        days.extend(
            dom.workdays
                .iter()
                .filter(|day| **day <= last_day)
                .map(|day| utils::nearest_workday(year, month, *day)),
        );
        if dom.last_day {
            days.insert(last_day);
        }
        if dom.last_workday {
            days.insert(utils::nearest_workday(year, month, last_day));
        }
    }

    if dow.restricted {
        for weekday in &dow.days {
            days.extend(utils::dow_days(year, month, *weekday));
        }
        days.extend(
            dow.nth
                .iter()
                .filter_map(|(weekday, nth)| utils::nth_dow(year, month, *weekday, *nth)),
        );
        days.extend(dow.last.iter().map(|weekday| utils::last_dow(year, month, *weekday)));
    }

    days.into()
}
