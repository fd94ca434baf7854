use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::{America::New_York, Asia::Tokyo};
use cronseek::{CronError, Field, Result, Schedule, MAX_YEAR};
use rstest::rstest;

#[test]
fn next_and_prev() -> Result<()> {
    let schedule = Schedule::new("0 30 9 * * MON-FRI")?;
    // Friday
    let current = Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 5).unwrap();

    assert_eq!(
        schedule.next(&current),
        Some(Utc.with_ymd_and_hms(2024, 1, 8, 9, 30, 0).unwrap())
    );
    assert_eq!(
        schedule.prev(&current),
        Some(Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap())
    );

    Ok(())
}

#[test]
fn new_years() -> Result<()> {
    let schedule = Schedule::new("0 0 0 1 1 * *")?;
    let current = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();

    let expected: Vec<DateTime<Utc>> = (2024..=2026)
        .map(|year| Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap())
        .collect();
    assert_eq!(schedule.next_n(&current, 3), expected);

    Ok(())
}

#[test]
fn timezone_is_preserved() -> Result<()> {
    let schedule = Schedule::new("@daily")?;

    let current = Tokyo.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let next = schedule.next(&current).unwrap();
    assert_eq!(next, Tokyo.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap());
    assert_eq!(next.timezone(), Tokyo);

    Ok(())
}

#[test]
fn dst_gap_in_new_york() -> Result<()> {
    // 2024-03-10 02:00-02:59 doesn't exist in New York
    let schedule = Schedule::new("0 15 2 * * *")?;
    let current = New_York.with_ymd_and_hms(2024, 3, 9, 3, 0, 0).unwrap();

    let events = schedule.next_n(&current, 2);
    assert_eq!(
        events,
        vec![
            New_York.with_ymd_and_hms(2024, 3, 11, 2, 15, 0).unwrap(),
            New_York.with_ymd_and_hms(2024, 3, 12, 2, 15, 0).unwrap(),
        ]
    );

    Ok(())
}

#[test]
fn end_of_year_range() -> Result<()> {
    let schedule = Schedule::new("59 59 23 31 12 *")?;
    let last = Utc
        .with_ymd_and_hms(MAX_YEAR.into(), 12, 31, 23, 59, 59)
        .unwrap();

    assert_eq!(schedule.next(&last), None);
    assert_eq!(schedule.iter_back(&Utc.with_ymd_and_hms(2100, 6, 1, 0, 0, 0).unwrap()).next(), Some(last));

    Ok(())
}

#[rstest]
#[case("* * *", None)]
#[case("0 0 * * MON#0", Some(Field::DayOfWeek))]
#[case("0 0 0 0 * *", Some(Field::DayOfMonth))]
#[case("0 0 0 * JANUAR *", Some(Field::Month))]
fn invalid_schedules(#[case] input: &str, #[case] field: Option<Field>) {
    let error: CronError = Schedule::new(input).unwrap_err();
    assert_eq!(error.field(), field, "input = {input}, error = {error}");
}
