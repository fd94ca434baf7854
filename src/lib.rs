//! Cron expression parser with the next/previous occurrence search.
#![deny(unsafe_code, missing_docs)]

//! This crate is intended to:
//! - parse almost all kinds of popular cron schedule formats;
//! - find the nearest time matching the schedule, forward or backward from any given time;
//! - generate series of timestamps according to the schedule.
//!
//! _This is not a cron jobs scheduler or runner._ It never sleeps, runs jobs or converts time between timezones:
//! schedule is always evaluated in the local time of the provided timestamp.
//!
//! ## Cron schedule format
//!
//! Traditionally, cron schedule expression has a 5-fields format: minutes, hours, days, months and days of week.
//! This crate uses such a format by default, but two optional fields may be added, seconds and years:
//! - if _seconds_ is omitted, `0` is used by default;
//! - if _years_ is omitted, `*` is used by default;
//! - if 6-fields schedule is specified, then _seconds_ field is assumed as first and years as omitted;
//! - fields after the seventh are ignored.
//!
//! The table below describes valid values and patterns of each field:
//!
//! | Field        | Required | Allowed values          | Allowed special characters |
//! |--------------|----------|-------------------------|----------------------------|
//! | Seconds      | No       | 0-59                    | * ? , - /                  |
//! | Minutes      | Yes      | 0-59                    | * ? , - /                  |
//! | Hours        | Yes      | 0-23                    | * ? , - /                  |
//! | Day of Month | Yes      | 1-31                    | * ? , - / L W              |
//! | Month        | Yes      | 1-12 or JAN-DEC         | * ? , - /                  |
//! | Day of Week  | Yes      | 0-7 or SUN-SAT          | * ? , - / L #              |
//! | Year         | No       | 1970-2099               | * ? , - /                  |
//!
//! Patterns meanings:
//! - `*` or `?` - each possible value, i.e. `0,1,2,...,59` for minutes;
//! - `,` - list of values or patterns, i.e. `1,7,12`, `SUN,FRI`;
//! - `-` - range of values, i.e. `0-15`, `JAN-MAR`;
//! - `/` - repeating values, i.e. `*/12`, `10/5`, `30-59/2`;
//! - `L` - last day of the month (for day of month field), or last particular day of the week (for weekday field), i.e. `L` or `5L`;
//! - `W` - the weekday (not Sunday or Saturday), nearest to the specified day of month in the same month, i.e. `22W` or `LW`;
//! - `#` - specific day of the week, i.e. `fri#1`, `1#4`.
//!
//! Names of months and days of week may be short (`JAN`, `MON`) or full (`JANUARY`, `MONDAY`), all tokens are case-insensitive.
//! Both `0` and `7` mean Sunday.
//!
//! If both day of month and day of week fields are restricted (not `*` or `?`),
//! a day matches when it satisfies **either** of them, i.e. `0 0 1,15 * MON` means the 1st, the 15th and every Monday.
//!
//! Also, short aliases for well-known schedule expressions are allowed:
//!
//! | Alias                      | Expression    |
//! |----------------------------|---------------|
//! | `@yearly` (or `@annually`) | 0 0 0 1 1 * * |
//! | `@monthly`                 | 0 0 0 1 * * * |
//! | `@weekly`                  | 0 0 0 * * 0 * |
//! | `@daily` (or `@midnight`)  | 0 0 0 * * * * |
//! | `@hourly`                  | 0 0 * * * * * |
//!
//! ## How to use
//!
//! The main entity of the crate is a [`Schedule`] structure, which has a few basic methods:
//! - [new()](Schedule::new): constructor to parse and validate provided schedule;
//! - [next()](Schedule::next): returns time of the next schedule's event, strictly after the provided timestamp;
//! - [prev()](Schedule::prev): returns time of the previous schedule's event, strictly before the provided timestamp;
//! - [next_n()](Schedule::next_n): returns a batch of upcoming events;
//! - [iter()](Schedule::iter) and [iter_back()](Schedule::iter_back): return an `Iterator` which produces a series of timestamps.
//!
//! ### Example with `next` and `prev`
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use cronseek::{Result, Schedule};
//!
//! fn main() -> Result<()> {
//!     let schedule = Schedule::new("0 30 9 * * MON-FRI")?;
//!     // Friday
//!     let current = Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 5).unwrap();
//!
//!     let next = schedule.next(&current);
//!     assert_eq!(next, Some(Utc.with_ymd_and_hms(2024, 1, 8, 9, 30, 0).unwrap()));
//!
//!     let prev = schedule.prev(&current);
//!     assert_eq!(prev, Some(Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap()));
//!
//!     Ok(())
//! }
//! ```
//!
//! ### Example with `next_n`
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use cronseek::{Result, Schedule};
//!
//! fn main() -> Result<()> {
//!     let schedule = Schedule::new("@yearly")?;
//!     let current = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
//!
//!     // Get the next 3 timestamps
//!     for t in schedule.next_n(&current, 3) {
//!         println!("next: {t}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Feature flags
//! * `serde`: adds [`Serialize`](https://docs.rs/serde/latest/serde/trait.Serialize.html) and [`Deserialize`](https://docs.rs/serde/latest/serde/trait.Deserialize.html) trait implementation for [`Schedule`].

mod alias;
mod days;
/// Crate specific Error implementation.
pub mod error;
mod pattern;
/// Cron schedule parser and events search.
pub mod schedule;
mod search;
mod set;
mod utils;

// Re-export of public entities.
pub use error::CronError;
pub use pattern::Field;
pub use schedule::{Schedule, ScheduleIterator, MAX_YEAR, MIN_YEAR};

/// Convenient alias for `Result`.
pub type Result<T, E = CronError> = std::result::Result<T, E>;
