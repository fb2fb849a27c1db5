//! Unix time with nanosecond granularity.
//!
//! [`TimeSpec`] is the raw form of time used before conversion to a calendar: it is what the
//! system clock returns and what network time corrections are applied to.

#[cfg(feature = "now")]
use core::mem::MaybeUninit;
#[cfg(feature = "now")]
use libc::{timespec, clock_gettime, CLOCK_REALTIME};

/// Nanoseconds per second.
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Unix time with nanosecond granularity.
///
/// `nsec` is always kept in the range `[0, 999999999]`, so negative times are represented with a
/// negative `sec` and a positive `nsec` (e.g. -0.25 s is `{ sec: -1, nsec: 750000000 }`).
///
/// # Examples
///
/// ```
/// # use time::TimeSpec;
/// let t = TimeSpec::from_nanos(-250_000_000);
/// assert_eq!(t, TimeSpec { sec: -1, nsec: 750_000_000 });
/// assert_eq!(t.as_nanos(), -250_000_000);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeSpec {
	/// Seconds since the Unix epoch
	pub sec: i64,
	/// Nanoseconds since the beginning of `sec`, ranging [0-999999999]
	pub nsec: i64
}

impl TimeSpec {
	/// Build a [`TimeSpec`] from a signed count of nanoseconds since the Unix epoch.
	pub const fn from_nanos(nanos: i128) -> Self {
		let n = NANOS_PER_SECOND as i128;
		TimeSpec {
			sec: nanos.div_euclid(n) as i64,
			nsec: nanos.rem_euclid(n) as i64
		}
	}

	/// Total nanoseconds since the Unix epoch.
	pub const fn as_nanos(self) -> i128 {
		self.sec as i128 * NANOS_PER_SECOND as i128 + self.nsec as i128
	}

	/// Shift this time by a signed number of nanoseconds.
	///
	/// ```
	/// # use time::TimeSpec;
	/// let t = TimeSpec { sec: 10, nsec: 900_000_000 };
	/// assert_eq!(t.shifted(200_000_000), TimeSpec { sec: 11, nsec: 100_000_000 });
	/// assert_eq!(t.shifted(-1_000_000_000), TimeSpec { sec: 9, nsec: 900_000_000 });
	/// ```
	pub const fn shifted(self, nanos: i64) -> Self {
		Self::from_nanos(self.as_nanos() + nanos as i128)
	}
}

#[cfg_attr(docsrs, doc(cfg(feature = "now")))]
#[cfg(feature = "now")]
impl From<timespec> for TimeSpec {
	fn from(value: timespec) -> Self {
		TimeSpec {
			sec: value.tv_sec as i64,
			nsec: value.tv_nsec as i64
		}
	}
}

/// Get the current time as a Unix timestamp with nanosecond granularity.
///
/// Returns `None` if `libc::clock_gettime` fails. This function is thread safe.
///
/// # Examples
///
/// ```
/// # use time::now;
/// let c = now().expect("Failed to get current time");
/// assert!(c.sec > 0);
/// ```
#[cfg_attr(docsrs, doc(cfg(feature = "now")))]
#[cfg(feature = "now")]
pub fn now() -> Option<TimeSpec> {
	let mut time = MaybeUninit::<timespec>::uninit();
	// Safety: clock_gettime only writes to `time`, and fully initializes it when it returns zero.
	unsafe {
		match clock_gettime(CLOCK_REALTIME, time.as_mut_ptr()) {
			0 => Some(time.assume_init().into()),
			_ => None
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn nanos_test() {
		assert_eq!(TimeSpec::from_nanos(0), TimeSpec { sec: 0, nsec: 0 });
		assert_eq!(TimeSpec::from_nanos(1_500_000_000), TimeSpec { sec: 1, nsec: 500_000_000 });
		assert_eq!(TimeSpec::from_nanos(-1), TimeSpec { sec: -1, nsec: 999_999_999 });
		assert_eq!(TimeSpec { sec: -3, nsec: 1 }.as_nanos(), -2_999_999_999);

		let t = TimeSpec { sec: 1716742645, nsec: 123456789 };
		assert_eq!(TimeSpec::from_nanos(t.as_nanos()), t);
	}

	#[test]
	fn shifted_test() {
		let t = TimeSpec { sec: 1716742645, nsec: 123456789 };
		assert_eq!(t.shifted(0), t);
		assert_eq!(t.shifted(876543211), TimeSpec { sec: 1716742646, nsec: 0 });
		assert_eq!(t.shifted(-123456790), TimeSpec { sec: 1716742644, nsec: 999999999 });
		assert_eq!(t.shifted(9 * 3600 * NANOS_PER_SECOND).sec, 1716742645 + 32400);
	}

	#[cfg(feature = "now")]
	#[test]
	fn now_test() {
		let a = now().unwrap();
		let b = now().unwrap();
		assert!(a.sec > 1_700_000_000);
		assert!(b >= a);
		assert!((0..NANOS_PER_SECOND).contains(&a.nsec));
	}
}
