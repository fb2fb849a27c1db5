//! Gregorian calendar time, unaware of timezone.
//!
//! [`CalendarTime`] is a validated calendar tuple: every value that exists satisfies the field
//! ranges documented on its accessors, because the only ways to build one ([`CalendarTime::new`],
//! [`CalendarTime::from_timestamp`] and parsing) check them. Code that consumes a
//! [`CalendarTime`] can therefore index tables by its fields without further checks.
//!
//! Conversions use the proleptic Gregorian calendar and work on timestamps before and after the
//! Unix epoch. The calendar repeats every 400 years, so converting between days and dates reduces
//! to arithmetic within a 400-year era whose years run March to February (which puts the leap day
//! at the end of the rotated year). More details:
//! http://howardhinnant.github.io/date_algorithms.html
//!
//! # Examples
//!
//! ```
//! # use time::CalendarTime;
//! let t = CalendarTime::new(2024, 12, 31, 23, 59, 30).unwrap();
//! assert_eq!(t.day_of_year(), 366);
//! assert_eq!(t.weekday(), 1); // Tuesday
//!
//! let n = t.next_minute().unwrap();
//! assert_eq!(n.to_string(), "2025-01-01 00:00:00");
//! assert_eq!(n.day_of_year(), 1);
//! ```

use core::fmt;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: i64 = 60;
/// Seconds per hour.
pub const SECONDS_PER_HOUR: i64 = SECONDS_PER_MINUTE * 60;
/// Seconds per day.
pub const SECONDS_PER_DAY: i64 = SECONDS_PER_HOUR * 24;
/// Days per 400-year era.
const DAYS_PER_ERA: i64 = 146097;
/// Days from March 1, 0000 (start of the rotated calendar) to January 1, 1970.
const DAYS_FROM_MARCH_0000_TO_EPOCH: i64 = 719468;
/// Weekday of January 1, 1970 (a Thursday), counting Monday as 0.
const EPOCH_WEEKDAY: i64 = 3;

/// The error type for building a [`CalendarTime`] from out-of-range fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
	/// The month was not in [1, 12].
	#[error("month {0} out of range")]
	Month(u8),
	/// The day does not exist in the given year and month.
	#[error("day {day} does not exist in {year:04}-{month:02}")]
	Day { year: u16, month: u8, day: u8 },
	/// The hour was not in [0, 23].
	#[error("hour {0} out of range")]
	Hour(u8),
	/// The minute was not in [0, 59].
	#[error("minute {0} out of range")]
	Minute(u8),
	/// The second was not in [0, 59].
	#[error("second {0} out of range")]
	Second(u8)
}

/// Check whether a given absolute Gregorian `year` is a leap year.
///
/// ```
/// # use time::is_leap_year;
/// assert!(!is_leap_year(1900));
/// assert!(is_leap_year(2000));
/// assert!(is_leap_year(2024));
/// assert!(!is_leap_year(2023));
/// ```
#[inline]
pub const fn is_leap_year(year: u16) -> bool {
	year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// The number of days in `month` (1-indexed) of `year`, or `0` for an invalid month.
pub const fn days_in_month(year: u16, month: u8) -> u8 {
	match month {
		1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
		4 | 6 | 9 | 11 => 30,
		2 if is_leap_year(year) => 29,
		2 => 28,
		_ => 0
	}
}

/// Days since the Unix epoch for a given year, month (1-indexed) and day.
const fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
	let y = if month <= 2 { year - 1 } else { year };
	let era = y.div_euclid(400);
	let yoe = y - era * 400;
	let mp = if month > 2 { month - 3 } else { month + 9 };
	let doy = (153 * mp + 2) / 5 + day - 1;
	let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
	era * DAYS_PER_ERA + doe - DAYS_FROM_MARCH_0000_TO_EPOCH
}

/// Year, month (1-indexed) and day for a count of days since the Unix epoch.
const fn civil_from_days(days: i64) -> (i64, i64, i64) {
	let z = days + DAYS_FROM_MARCH_0000_TO_EPOCH;
	let era = z.div_euclid(DAYS_PER_ERA);
	let doe = z - era * DAYS_PER_ERA;
	let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
	let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
	let mp = (5 * doy + 2) / 153;
	let day = doy - (153 * mp + 2) / 5 + 1;
	let month = if mp < 10 { mp + 3 } else { mp - 9 };
	let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
	(year, month, day)
}

/// A validated Gregorian calendar date and time of day.
///
/// The type carries no timezone: it is whatever frame the timestamp it was built from was in.
/// Ordering follows chronological order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarTime {
	year: u16,
	month: u8,
	day: u8,
	hour: u8,
	minute: u8,
	second: u8,
	weekday: u8,
	day_of_year: u16
}

impl CalendarTime {
	/// Build a calendar time from its fields, deriving weekday and day of year.
	///
	/// # Errors
	///
	/// Returns the [`CalendarError`] variant naming the first field that is out of range.
	///
	/// # Examples
	///
	/// ```
	/// # use time::{CalendarTime, CalendarError};
	/// let t = CalendarTime::new(2020, 7, 4, 11, 36, 58).unwrap();
	/// assert_eq!(t.day_of_year(), 186);
	/// assert_eq!(t.weekday(), 5); // Saturday
	///
	/// assert_eq!(
	/// 	CalendarTime::new(2023, 2, 29, 0, 0, 0),
	/// 	Err(CalendarError::Day { year: 2023, month: 2, day: 29 })
	/// );
	/// ```
	pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8)
		-> Result<CalendarTime, CalendarError>
	{
		if !(1..=12).contains(&month) {
			return Err(CalendarError::Month(month));
		}
		if day == 0 || day > days_in_month(year, month) {
			return Err(CalendarError::Day { year, month, day });
		}
		if hour > 23 {
			return Err(CalendarError::Hour(hour));
		}
		if minute > 59 {
			return Err(CalendarError::Minute(minute));
		}
		if second > 59 {
			return Err(CalendarError::Second(second));
		}

		let days = days_from_civil(year as i64, month as i64, day as i64);
		let jan1 = days_from_civil(year as i64, 1, 1);
		Ok(CalendarTime {
			year,
			month,
			day,
			hour,
			minute,
			second,
			weekday: (days + EPOCH_WEEKDAY).rem_euclid(7) as u8,
			day_of_year: (days - jan1 + 1) as u16
		})
	}

	/// Convert seconds since 1970-01-01 00:00:00 into calendar time.
	///
	/// Returns `None` if the resulting year is outside [0, 65535].
	///
	/// # Examples
	///
	/// ```
	/// # use time::CalendarTime;
	/// let t = CalendarTime::from_timestamp(1718617807).unwrap();
	/// assert_eq!(t.to_string(), "2024-06-17 09:50:07");
	/// assert_eq!(t.weekday(), 0); // Monday
	/// assert_eq!(t.day_of_year(), 169);
	/// ```
	pub fn from_timestamp(timestamp: i64) -> Option<CalendarTime> {
		let days = timestamp.div_euclid(SECONDS_PER_DAY);
		let rem = timestamp.rem_euclid(SECONDS_PER_DAY);
		let (year, month, day) = civil_from_days(days);
		if !(0..=u16::MAX as i64).contains(&year) {
			return None;
		}

		Some(CalendarTime {
			year: year as u16,
			month: month as u8,
			day: day as u8,
			hour: (rem / SECONDS_PER_HOUR) as u8,
			minute: (rem % SECONDS_PER_HOUR / SECONDS_PER_MINUTE) as u8,
			second: (rem % SECONDS_PER_MINUTE) as u8,
			weekday: (days + EPOCH_WEEKDAY).rem_euclid(7) as u8,
			day_of_year: (days - days_from_civil(year, 1, 1) + 1) as u16
		})
	}

	/// Seconds since 1970-01-01 00:00:00 in the same frame as this time.
	pub fn timestamp(&self) -> i64 {
		days_from_civil(self.year as i64, self.month as i64, self.day as i64) * SECONDS_PER_DAY
			+ self.hour as i64 * SECONDS_PER_HOUR
			+ self.minute as i64 * SECONDS_PER_MINUTE
			+ self.second as i64
	}

	/// Add (or subtract, if negative) whole seconds.
	///
	/// Returns `None` if the result is not representable.
	pub fn add_seconds(&self, seconds: i64) -> Option<CalendarTime> {
		Self::from_timestamp(self.timestamp().checked_add(seconds)?)
	}

	/// Signed number of seconds from `self` until `other`.
	///
	/// ```
	/// # use time::CalendarTime;
	/// let a = CalendarTime::new(2024, 1, 1, 14, 30, 0).unwrap();
	/// let b = CalendarTime::new(2024, 1, 1, 16, 58, 10).unwrap();
	/// assert_eq!(a.seconds_until(&b), 8890);
	/// assert_eq!(b.seconds_until(&a), -8890);
	/// ```
	pub fn seconds_until(&self, other: &CalendarTime) -> i64 {
		other.timestamp() - self.timestamp()
	}

	/// The same time with the second field replaced.
	///
	/// Returns `None` if `second > 59`.
	pub fn with_second(&self, second: u8) -> Option<CalendarTime> {
		(second < 60).then_some(CalendarTime { second, ..*self })
	}

	/// The start (minute 0, second 0) of this time's hour.
	pub fn start_of_hour(&self) -> CalendarTime {
		CalendarTime { minute: 0, second: 0, ..*self }
	}

	/// The start of the minute after this one: 60 seconds later with the second forced to 0.
	///
	/// Returns `None` only at the end of year 65535.
	pub fn next_minute(&self) -> Option<CalendarTime> {
		self.with_second(0)?.add_seconds(SECONDS_PER_MINUTE)
	}

	/// Absolute Gregorian year.
	#[inline]
	pub fn year(&self) -> u16 { self.year }

	/// Month of the year, ranged [1, 12].
	#[inline]
	pub fn month(&self) -> u8 { self.month }

	/// Day of the month, ranged [1, 31].
	#[inline]
	pub fn day(&self) -> u8 { self.day }

	/// Hour, ranged [0, 23].
	#[inline]
	pub fn hour(&self) -> u8 { self.hour }

	/// Minute, ranged [0, 59].
	#[inline]
	pub fn minute(&self) -> u8 { self.minute }

	/// Second, ranged [0, 59].
	#[inline]
	pub fn second(&self) -> u8 { self.second }

	/// Day of the week, ranged [0, 6] => [Monday, Sunday].
	#[inline]
	pub fn weekday(&self) -> u8 { self.weekday }

	/// Day of the year, ranged [1, 366].
	#[inline]
	pub fn day_of_year(&self) -> u16 { self.day_of_year }
}

impl fmt::Display for CalendarTime {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
			self.year, self.month, self.day, self.hour, self.minute, self.second
		)
	}
}
