//! Parse calendar time strings like `YYYY-MM-DD HH:MM:SS`.
//!
//! [`CalendarTime`] implements [`FromStr`], accepting a date and a time of day separated by a
//! space or `T`. Seconds are optional and default to zero. No timezone suffix is accepted: the
//! result is in whatever frame the caller intends (for this workspace, local time).
//!
//! # Examples
//! ```
//! # use time::{CalendarTime, ParseError};
//! let t: CalendarTime = "2025-02-18T12:30:45".parse().unwrap();
//! assert_eq!(t, CalendarTime::new(2025, 2, 18, 12, 30, 45).unwrap());
//!
//! let t: CalendarTime = "2025-02-18 12:30".parse().unwrap();
//! assert_eq!(t.second(), 0);
//!
//! assert_eq!("2025-02-18".parse::<CalendarTime>(), Err(ParseError::MissingTime));
//! ```

use core::str::FromStr;
use crate::calendar::{CalendarError, CalendarTime};

/// Error type for parsing calendar time strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
	/// The date part was not of the form `YYYY-MM-DD`.
	#[error("date must be of the form YYYY-MM-DD")]
	MalformedDate,
	/// No time of day followed the date.
	#[error("missing time of day after the date")]
	MissingTime,
	/// The time part was not of the form `HH:MM` or `HH:MM:SS`.
	#[error("time must be of the form HH:MM or HH:MM:SS")]
	MalformedTime,
	/// All fields were well formed, but at least one was out of range.
	#[error(transparent)]
	OutOfRange(#[from] CalendarError)
}

/// Parse an unsigned decimal field of exactly `width` digits.
fn parse_field<T: FromStr>(s: &str, width: usize) -> Option<T> {
	if s.len() != width || !s.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	s.parse().ok()
}

impl FromStr for CalendarTime {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		let (date, time) = match s.find([' ', 'T']) {
			Some(i) => (&s[..i], s[i + 1..].trim_start()),
			None => (s, "")
		};

		let mut date_parts = date.split('-');
		let (Some(y), Some(mo), Some(d), None) =
			(date_parts.next(), date_parts.next(), date_parts.next(), date_parts.next())
		else {
			return Err(ParseError::MalformedDate);
		};
		let year = parse_field::<u16>(y, 4).ok_or(ParseError::MalformedDate)?;
		let month = parse_field::<u8>(mo, 2).ok_or(ParseError::MalformedDate)?;
		let day = parse_field::<u8>(d, 2).ok_or(ParseError::MalformedDate)?;

		if time.is_empty() {
			return Err(ParseError::MissingTime);
		}
		let mut time_parts = time.split(':');
		let (Some(h), Some(mi), sec, None) =
			(time_parts.next(), time_parts.next(), time_parts.next(), time_parts.next())
		else {
			return Err(ParseError::MalformedTime);
		};
		let hour = parse_field::<u8>(h, 2).ok_or(ParseError::MalformedTime)?;
		let minute = parse_field::<u8>(mi, 2).ok_or(ParseError::MalformedTime)?;
		let second = match sec {
			Some(v) => parse_field::<u8>(v, 2).ok_or(ParseError::MalformedTime)?,
			None => 0
		};

		Ok(CalendarTime::new(year, month, day, hour, minute, second)?)
	}
}
