//! Broadcast windows.
//!
//! The beacon only transmits around the hours in [`TARGET_HOURS`]: each window opens at
//! [`OPEN_SECONDS`] past minute 58 of the preceding hour and closes when minute
//! [`CLOSE_MINUTE`] of the target hour begins. For target hour 14 that is 13:58:10 up to (but not
//! including) 14:08:00. Outside a window the device should be asleep.

use time::{CalendarTime, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};

/// Hours of the day around which a broadcast window is opened.
pub const TARGET_HOURS: [u8; 8] = [2, 5, 8, 11, 14, 17, 20, 23];

/// Minute of the preceding hour during which a window opens.
pub const OPEN_MINUTE: u8 = 58;

/// Second of [`OPEN_MINUTE`] at which a window opens.
pub const OPEN_SECONDS: u8 = 10;

/// First minute of the target hour that is no longer transmitted.
pub const CLOSE_MINUTE: u8 = 8;

/// Whether `hour` is one of [`TARGET_HOURS`].
pub fn is_target_hour(hour: u8) -> bool {
	TARGET_HOURS.contains(&hour)
}

/// Seconds from `now` until the next broadcast window opens, or zero (or less) when a window is
/// open now.
///
/// `now` is local time. The window rules are applied to its hour `H` and minute `M`:
///
/// - if `H + 1` is a target hour, transmit now if `M > 58`, otherwise wait until `H:58:10`;
/// - if `H` is a target hour, transmit now if `M < 8`, otherwise wait until `(H + 2):58:10`;
/// - otherwise wait until `(H + 1):58:10`.
///
/// The waiting time is measured from `now`, so it is at most zero from `H:58:10` onwards.
///
/// # Examples
/// ```
/// # use jjy::window::sleep_seconds;
/// # use time::CalendarTime;
/// let t = |h, m, s| CalendarTime::new(2024, 5, 27, h, m, s).unwrap();
/// assert_eq!(sleep_seconds(&t(13, 59, 20)), 0);
/// assert_eq!(sleep_seconds(&t(14, 5, 0)), 0);
/// assert_eq!(sleep_seconds(&t(14, 30, 0)), 8890);
/// assert_eq!(sleep_seconds(&t(13, 58, 5)), 5);
/// ```
pub fn sleep_seconds(now: &CalendarTime) -> i64 {
	let (hour, minute) = (now.hour(), now.minute());
	let hours_ahead = if is_target_hour(hour + 1) {
		if minute > OPEN_MINUTE {
			return 0;
		}
		0
	} else if is_target_hour(hour) {
		if minute < CLOSE_MINUTE {
			return 0;
		}
		2
	} else {
		1
	};

	let open = now.start_of_hour().timestamp()
		+ hours_ahead * SECONDS_PER_HOUR
		+ OPEN_MINUTE as i64 * SECONDS_PER_MINUTE
		+ OPEN_SECONDS as i64;
	open - now.timestamp()
}

/// Whether a frame for `minute` still belongs to the current broadcast window.
///
/// Transmission continues through the end of the hour and into the target hour, and stops at the
/// first minute in `[8, 58]`.
pub fn window_continues(minute: u8) -> bool {
	!(CLOSE_MINUTE..=OPEN_MINUTE).contains(&minute)
}

/// How long the device should sleep at the end of an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SleepDecision {
	/// Seconds to sleep. Zero means transmit now.
	pub seconds: u32
}

impl SleepDecision {
	/// Transmit immediately.
	pub const TRANSMIT_NOW: SleepDecision = SleepDecision { seconds: 0 };

	/// Decision for a signed number of seconds, where zero or less means transmit now.
	pub fn from_seconds(seconds: i64) -> SleepDecision {
		SleepDecision { seconds: seconds.clamp(0, u32::MAX as i64) as u32 }
	}

	/// Limit the sleep to at most `max` seconds.
	pub fn clamp(self, max: u32) -> SleepDecision {
		SleepDecision { seconds: self.seconds.min(max) }
	}

	/// Whether a broadcast window is open.
	pub fn is_transmit_now(&self) -> bool {
		self.seconds == 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn t(hour: u8, minute: u8, second: u8) -> CalendarTime {
		CalendarTime::new(2024, 5, 27, hour, minute, second).unwrap()
	}

	#[test]
	fn sleep_seconds_test() {
		// Before and at the opening of the window for 14:00
		assert_eq!(sleep_seconds(&t(13, 0, 0)), 58 * 60 + 10);
		assert_eq!(sleep_seconds(&t(13, 58, 9)), 1);
		assert!(sleep_seconds(&t(13, 58, 10)) <= 0);
		assert!(sleep_seconds(&t(13, 58, 30)) <= 0);
		assert_eq!(sleep_seconds(&t(13, 59, 0)), 0);

		// Inside the target hour
		assert_eq!(sleep_seconds(&t(14, 0, 0)), 0);
		assert_eq!(sleep_seconds(&t(14, 7, 59)), 0);

		// After the window closed, wait for the next target hour
		assert_eq!(sleep_seconds(&t(14, 8, 0)), 2 * 3600 + 50 * 60 + 10);
		assert_eq!(sleep_seconds(&t(14, 30, 0)), 8890);
		assert_eq!(sleep_seconds(&t(14, 59, 30)), 7120);
		assert_eq!(sleep_seconds(&t(15, 0, 0)), 3600 + 58 * 60 + 10);
	}

	#[test]
	fn sleep_seconds_day_boundary_test() {
		// Target hour 23 rolls over into the window for 02:00 the next day
		assert_eq!(sleep_seconds(&t(23, 30, 0)), 8890);
		assert_eq!(sleep_seconds(&t(23, 59, 59)), 3600 + 58 * 60 + 11);
		assert_eq!(sleep_seconds(&t(0, 0, 0)), 3600 + 58 * 60 + 10);
		assert_eq!(sleep_seconds(&t(1, 58, 10)), 0);
		assert_eq!(sleep_seconds(&t(22, 58, 10)), 0);
	}

	#[test]
	fn sleep_seconds_all_hours_test() {
		// Whatever the time, the wait never overshoots three hours
		let mut now = t(0, 0, 0);
		for _ in 0..(24 * 60) {
			let s = sleep_seconds(&now);
			assert!(s <= 3 * 3600, "time {}: {}", now, s);
			if s > 0 {
				let open = now.add_seconds(s).unwrap();
				assert!(is_target_hour(open.hour() + 1), "time {}: opens at {}", now, open);
				assert_eq!((open.minute(), open.second()), (OPEN_MINUTE, OPEN_SECONDS));
			}
			now = now.next_minute().unwrap();
		}
	}

	#[test]
	fn window_continues_test() {
		for minute in 0..60 {
			assert_eq!(window_continues(minute), !(8..=58).contains(&minute), "minute {}", minute);
		}
		assert!(window_continues(59));
		assert!(window_continues(7));
		assert!(!window_continues(8));
		assert!(!window_continues(58));
	}

	#[test]
	fn decision_test() {
		assert_eq!(SleepDecision::from_seconds(-20), SleepDecision::TRANSMIT_NOW);
		assert!(SleepDecision::from_seconds(0).is_transmit_now());
		assert!(!SleepDecision::from_seconds(1).is_transmit_now());
		assert_eq!(SleepDecision::from_seconds(8890).clamp(3600).seconds, 3600);
		assert_eq!(SleepDecision::from_seconds(600).clamp(3600).seconds, 600);
		assert_eq!(SleepDecision::from_seconds(i64::MAX).seconds, u32::MAX);
	}
}
