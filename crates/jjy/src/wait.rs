use std::{thread, time::{Duration, Instant}};
use crate::RealTimeWait;

/// [`RealTimeWait`] for hosted targets: sleeps the calling thread and measures elapsed time with
/// [`Instant`], so the transmitter can schedule against absolute deadlines.
#[derive(Debug, Clone, Copy)]
pub struct StdWait {
	origin: Instant
}

impl StdWait {
	pub fn new() -> Self {
		StdWait { origin: Instant::now() }
	}
}

impl Default for StdWait {
	fn default() -> Self {
		Self::new()
	}
}

impl RealTimeWait for StdWait {
	fn sleep_ms(&mut self, ms: u32) {
		thread::sleep(Duration::from_millis(ms as u64));
	}

	fn monotonic_ms(&self) -> Option<u64> {
		Some(self.origin.elapsed().as_millis() as u64)
	}
}
