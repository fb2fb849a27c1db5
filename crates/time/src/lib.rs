//! Utilities for dealing with time.
//!
//! This crate is divided into three parts: [`time`] deals with Unix timestamps at nanosecond
//! granularity and reading the current time; [`calendar`] converts between timestamps and
//! validated calendar time ([`CalendarTime`]); [`parse`] reads calendar time from text.
//!
//! The crate has no notion of timezones. Callers that need local time add their UTC offset to the
//! timestamp before converting, which is all a fixed-offset zone such as Japan standard time
//! (UTC+9) requires.
//!
//! This crate is `no_std`. If the `now` feature is enabled, [`time::now`] reads the system clock
//! through `libc`.
//!
//! # Examples
//!
//! ```
//! # use time::CalendarTime;
//! // Sun, May 26, 2024. 16:57:25 UTC, shown in JST (UTC+9)
//! let t = CalendarTime::from_timestamp(1716742645 + 9 * 3600).unwrap();
//! assert_eq!(t.to_string(), "2024-05-27 01:57:25");
//! assert_eq!(t.weekday(), 0); // Monday
//! assert_eq!(t.day_of_year(), 148);
//! ```

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod time;
pub mod calendar;
pub mod parse;

pub use time::*;
pub use calendar::*;
pub use parse::*;
