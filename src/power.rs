//! Power controllers for hosted runs.

use std::{thread, time::Duration};
use jjy::PowerController;
use time::CalendarTime;
use tracing::info;

/// Stands in for deep sleep by blocking the process. The next activation starts when it returns.
#[derive(Debug, Default)]
pub struct ThreadSleep;

impl PowerController for ThreadSleep {
	fn sleep_for(&mut self, seconds: u32) {
		if seconds > 0 {
			info!(seconds, "sleeping");
			thread::sleep(Duration::from_secs(seconds as u64));
		}
	}
}

/// Records the decision without sleeping, for `--once`.
#[derive(Debug, Default)]
pub struct Report {
	pub seconds: Option<u32>
}

impl Report {
	/// When the next activation would start, seen from `now`.
	pub fn wake_time(&self, now: &CalendarTime) -> Option<CalendarTime> {
		now.add_seconds(self.seconds? as i64)
	}
}

impl PowerController for Report {
	fn sleep_for(&mut self, seconds: u32) {
		self.seconds = Some(seconds);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn report_test() {
		let mut r = Report::default();
		let now = CalendarTime::new(2024, 5, 27, 14, 8, 0).unwrap();
		assert_eq!(r.wake_time(&now), None);
		r.sleep_for(3600);
		assert_eq!(r.seconds, Some(3600));
		assert_eq!(r.wake_time(&now), Some(CalendarTime::new(2024, 5, 27, 15, 8, 0).unwrap()));
	}

	#[test]
	fn thread_sleep_zero_test() {
		// Zero returns at once
		ThreadSleep.sleep_for(0);
	}
}
