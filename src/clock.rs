//! Local time for the beacon.
//!
//! The system clock is never changed. Instead, [`LocalClock`] keeps the correction measured by
//! SNTP and applies it, along with the UTC offset, to every reading.

use std::time::Instant;
use jjy::{ClockError, ClockSource};
use sntp::{Offset, SntpClient, SntpError};
use time::{CalendarTime, TimeSpec};
use tracing::info;

/// Where readings come from.
#[derive(Debug)]
enum Source {
	/// The system clock plus the last SNTP correction.
	System { correction: Offset },
	/// A fixed local start time that advances in real time.
	Simulated { start: CalendarTime, origin: Instant }
}

/// Local time at one-second resolution.
#[derive(Debug)]
pub struct LocalClock {
	source: Source,
	utc_offset_seconds: i64
}

impl LocalClock {
	/// The system clock, shifted by `utc_offset_seconds`.
	pub fn system(utc_offset_seconds: i64) -> Self {
		LocalClock { source: Source::System { correction: Offset { nanos: 0, error_nanos: 0 } }, utc_offset_seconds }
	}

	/// A clock that reads `start` now and runs in real time from there.
	pub fn simulated(start: CalendarTime) -> Self {
		LocalClock { source: Source::Simulated { start, origin: Instant::now() }, utc_offset_seconds: 0 }
	}

	pub fn is_simulated(&self) -> bool {
		matches!(self.source, Source::Simulated { .. })
	}

	/// Measure the system clock against `server` and correct all further readings.
	///
	/// Has no effect on a simulated clock. On failure the previous correction is kept.
	pub fn sync(&mut self, client: &SntpClient, server: &str) -> Result<(), SntpError> {
		if let Source::System { correction } = &mut self.source {
			let offset = client.query_offset(server)?;
			*correction = offset;
			info!(server, correction_ms = offset.nanos / 1_000_000, "clock synchronized");
		}
		Ok(())
	}

	/// Local time for a UTC instant.
	fn local(&self, utc: TimeSpec) -> Result<CalendarTime, ClockError> {
		CalendarTime::from_timestamp(utc.sec + self.utc_offset_seconds).ok_or(ClockError::OutOfRange)
	}
}

impl ClockSource for LocalClock {
	fn now(&mut self) -> Result<CalendarTime, ClockError> {
		match &self.source {
			Source::System { correction } => {
				let utc = correction.apply(time::now().ok_or(ClockError::Unavailable)?);
				self.local(utc)
			},
			Source::Simulated { start, origin } => {
				let elapsed = origin.elapsed().as_secs() as i64;
				start.add_seconds(elapsed).ok_or(ClockError::OutOfRange)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn system_clock_test() {
		let mut utc = LocalClock::system(0);
		let mut jst = LocalClock::system(9 * 3600);
		let a = utc.now().unwrap();
		let b = jst.now().unwrap();
		// Allow for a second boundary between the reads
		let diff = a.seconds_until(&b);
		assert!((9 * 3600..=9 * 3600 + 1).contains(&diff), "{} vs {}", a, b);
		assert!(!jst.is_simulated());
	}

	#[test]
	fn correction_test() {
		let mut clock = LocalClock::system(0);
		clock.source = Source::System { correction: Offset { nanos: -86_400 * 1_000_000_000, error_nanos: 0 } };
		let corrected = clock.now().unwrap();
		let actual = LocalClock::system(0).now().unwrap();
		let diff = corrected.seconds_until(&actual);
		assert!((86_400..=86_401).contains(&diff));
	}

	#[test]
	fn simulated_clock_test() {
		let start = CalendarTime::new(2024, 5, 27, 13, 58, 10).unwrap();
		let mut clock = LocalClock::simulated(start);
		assert!(clock.is_simulated());
		assert_eq!(clock.now().unwrap(), start);

		// Syncing a simulated clock does nothing, not even a network request
		assert!(clock.sync(&SntpClient::default(), "").is_ok());
	}
}
