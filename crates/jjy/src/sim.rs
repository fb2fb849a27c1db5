//! A simulated world for tests: one millisecond clock shared by every collaborator, advanced only
//! by waiting (and optionally by carrier switching).

extern crate std;

use std::{cell::RefCell, rc::Rc, vec::Vec};
use time::CalendarTime;
use crate::{CarrierSink, ClockError, ClockSource, PowerController, RealTimeWait};

#[derive(Debug, Default)]
struct World {
	/// Local time, in milliseconds since the Unix epoch.
	millis: i64,
	/// Carrier events as (time, enabled).
	events: Vec<(i64, bool)>,
	/// Every `sleep_ms` request.
	sleeps: Vec<u32>,
	/// Every power controller request.
	power: Vec<u32>,
	/// Time consumed by each carrier switch.
	carrier_cost: i64,
	/// Waiting does not advance the clock.
	frozen: bool,
	/// Clock reads fail.
	broken: bool,
	/// `monotonic_ms` is unavailable.
	no_monotonic: bool
}

#[derive(Clone)]
pub struct Sim(Rc<RefCell<World>>);

impl Sim {
	pub fn at(time: CalendarTime) -> Sim {
		Sim(Rc::new(RefCell::new(World { millis: time.timestamp() * 1000, ..World::default() })))
	}

	pub fn millis(&self) -> i64 {
		self.0.borrow().millis
	}

	pub fn local_time(&self) -> CalendarTime {
		CalendarTime::from_timestamp(self.millis().div_euclid(1000)).unwrap()
	}

	pub fn advance(&self, ms: i64) {
		self.0.borrow_mut().millis += ms;
	}

	pub fn events(&self) -> Vec<(i64, bool)> {
		self.0.borrow().events.clone()
	}

	pub fn sleeps(&self) -> Vec<u32> {
		self.0.borrow().sleeps.clone()
	}

	pub fn power_requests(&self) -> Vec<u32> {
		self.0.borrow().power.clone()
	}

	pub fn set_carrier_cost(&self, ms: i64) {
		self.0.borrow_mut().carrier_cost = ms;
	}

	pub fn set_frozen(&self, frozen: bool) {
		self.0.borrow_mut().frozen = frozen;
	}

	pub fn set_broken(&self, broken: bool) {
		self.0.borrow_mut().broken = broken;
	}

	pub fn set_monotonic(&self, available: bool) {
		self.0.borrow_mut().no_monotonic = !available;
	}

	pub fn clock(&self) -> Sim {
		self.clone()
	}

	pub fn carrier(&self) -> Sim {
		self.clone()
	}

	pub fn wait(&self) -> Sim {
		self.clone()
	}

	pub fn power(&self) -> Sim {
		self.clone()
	}

	fn switch(&mut self, enabled: bool) {
		let mut w = self.0.borrow_mut();
		let at = w.millis;
		w.events.push((at, enabled));
		w.millis += w.carrier_cost;
	}
}

impl ClockSource for Sim {
	fn now(&mut self) -> Result<CalendarTime, ClockError> {
		if self.0.borrow().broken {
			return Err(ClockError::Unavailable);
		}
		CalendarTime::from_timestamp(self.millis().div_euclid(1000)).ok_or(ClockError::OutOfRange)
	}
}

impl CarrierSink for Sim {
	fn enable(&mut self) {
		self.switch(true);
	}

	fn disable(&mut self) {
		self.switch(false);
	}
}

impl RealTimeWait for Sim {
	fn sleep_ms(&mut self, ms: u32) {
		let mut w = self.0.borrow_mut();
		w.sleeps.push(ms);
		if !w.frozen {
			w.millis += ms as i64;
		}
	}

	fn monotonic_ms(&self) -> Option<u64> {
		let w = self.0.borrow();
		(!w.no_monotonic).then_some(w.millis as u64)
	}
}

impl PowerController for Sim {
	fn sleep_for(&mut self, seconds: u32) {
		let mut w = self.0.borrow_mut();
		w.power.push(seconds);
		w.millis += seconds as i64 * 1000;
	}
}
