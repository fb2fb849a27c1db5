//! One activation of the beacon, from wake-up to the next sleep.
//!
//! An activation is an explicit state machine:
//!
//! ```text
//! Idle ─(window open)─> WaitingForAlignment ─> WaitingForMinuteBoundary ─> Transmitting ─┐
//!  │                                                                          ^          │
//!  │                                                                          └(in window)┤
//!  └──────────────────(window closed)─────────────> PoweringDown <──(window over)─────────┘
//! ```
//!
//! Nothing carries over from one activation to the next: every activation starts from a fresh
//! clock reading, so a device that wakes late or whose clock was corrected simply recomputes.

use core::{fmt, num::NonZeroU32};
use time::CalendarTime;
use tracing::{debug, info, trace, warn};
use crate::{
	CarrierSink, ClockError, ClockSource, PowerController, RealTimeWait,
	frame::Frame,
	transmit::SymbolTransmitter,
	window::{SleepDecision, sleep_seconds, window_continues}
};

/// Stage of an activation that polls the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	/// Waiting for the alignment second in the minute before transmission.
	Alignment,
	/// Counting second ticks before the minute boundary.
	Calibration
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Stage::Alignment => "alignment",
			Stage::Calibration => "calibration"
		})
	}
}

/// Error type for a failed activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActivationError {
	#[error("failed to read clock: {0}")]
	Clock(#[from] ClockError),
	/// The clock never satisfied the condition of `stage` within the poll limit.
	#[error("clock condition for {stage} not met after {polls} polls")]
	AlignmentTimeout { stage: Stage, polls: u32 },
	/// The minute boundary reached after calibration is not the minute that was encoded.
	#[error("expected to reach {expected}, observed {observed}")]
	MinuteMismatch { expected: CalendarTime, observed: CalendarTime },
	/// Time arithmetic left the representable calendar range.
	#[error("time out of range")]
	TimeOverflow
}

/// How one clock reading counts toward a condition in [`await_clock_condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
	/// The reading satisfies the condition.
	Match,
	/// The reading neither satisfies nor breaks the condition.
	Pending,
	/// The reading is inconsistent. All matches so far are discarded.
	Mismatch
}

/// Bounds on polling the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
	/// Delay between polls, in milliseconds.
	pub interval_ms: u32,
	/// Give up after this many polls.
	pub max_polls: u32
}

impl PollPolicy {
	/// Poll every `interval_ms` for at least `seconds` seconds.
	pub fn for_seconds(interval_ms: u32, seconds: u32) -> PollPolicy {
		let interval_ms = interval_ms.max(1);
		PollPolicy { interval_ms, max_polls: (seconds * 1000).div_ceil(interval_ms) + 1 }
	}
}

/// Poll `clock` until `observe` has reported [`Observation::Match`] `stability` times with no
/// [`Observation::Mismatch`] in between.
///
/// The first poll happens immediately. Returns the reading that completed the condition, or
/// `None` if `policy.max_polls` polls were not enough.
///
/// # Examples
/// ```
/// # use jjy::{ClockError, ClockSource, RealTimeWait, PollPolicy};
/// # use jjy::scheduler::{Observation, await_clock_condition};
/// # use time::CalendarTime;
/// struct Ticking(i64);
/// impl ClockSource for Ticking {
/// 	fn now(&mut self) -> Result<CalendarTime, ClockError> {
/// 		self.0 += 1;
/// 		CalendarTime::from_timestamp(self.0).ok_or(ClockError::OutOfRange)
/// 	}
/// }
/// struct NoWait;
/// impl RealTimeWait for NoWait {
/// 	fn sleep_ms(&mut self, _ms: u32) {}
/// }
///
/// let policy = PollPolicy { interval_ms: 1, max_polls: 100 };
/// let found = await_clock_condition(
/// 	&mut Ticking(0), &mut NoWait,
/// 	|t| if t.second() == 30 { Observation::Match } else { Observation::Pending },
/// 	1, policy
/// ).unwrap();
/// assert_eq!(found.unwrap().second(), 30);
/// ```
pub fn await_clock_condition<C, W, P>(
	clock: &mut C,
	wait: &mut W,
	mut observe: P,
	stability: u32,
	policy: PollPolicy
) -> Result<Option<CalendarTime>, ClockError>
where
	C: ClockSource + ?Sized,
	W: RealTimeWait + ?Sized,
	P: FnMut(&CalendarTime) -> Observation
{
	let stability = stability.max(1);
	let mut matched = 0;
	for poll in 0..policy.max_polls {
		if poll > 0 {
			wait.sleep_ms(policy.interval_ms);
		}
		let now = clock.now()?;
		match observe(&now) {
			Observation::Match => {
				matched += 1;
				if matched >= stability {
					return Ok(Some(now));
				}
			},
			Observation::Pending => (),
			Observation::Mismatch => {
				trace!(time = %now, matched, "unstable clock reading");
				matched = 0;
			}
		}
	}
	Ok(None)
}

/// Tunable parameters of an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
	/// Longest single sleep the power controller accepts, in seconds.
	pub max_sleep_seconds: u32,
	/// Sleep after a failed activation, in seconds.
	pub retry_sleep_seconds: u32,
	/// Second of the minute at which the next frame is encoded.
	pub alignment_second: u8,
	/// Consecutive second ticks observed before sleeping to the minute boundary.
	pub calibration_ticks: u32,
	/// Delay between clock polls, in milliseconds.
	pub poll_interval_ms: u32
}

impl Default for SchedulerConfig {
	fn default() -> Self {
		SchedulerConfig {
			max_sleep_seconds: 3600,
			retry_sleep_seconds: 60,
			alignment_second: 55,
			calibration_ticks: 3,
			poll_interval_ms: 1
		}
	}
}

/// What an activation transmits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
	/// Transmit only inside broadcast windows, until the window closes.
	#[default]
	Scheduled,
	/// Transmit `frames` consecutive frames right away, regardless of the window.
	Immediate { frames: NonZeroU32 }
}

#[derive(Debug)]
enum State {
	Idle,
	WaitingForAlignment,
	WaitingForMinuteBoundary { minute: CalendarTime, frame: Frame },
	Transmitting { minute: CalendarTime, frame: Frame, sent: u32 },
	PoweringDown(SleepDecision)
}

/// A JJY transmitter emulator, built from its collaborators.
///
/// # Examples
/// ```no_run
/// # use jjy::{Beacon, CarrierSink, ClockError, ClockSource, PowerController, RealTimeWait, SchedulerConfig};
/// # use time::CalendarTime;
/// # struct Clock;
/// # impl ClockSource for Clock {
/// # 	fn now(&mut self) -> Result<CalendarTime, ClockError> { Err(ClockError::Unavailable) }
/// # }
/// # struct Carrier;
/// # impl CarrierSink for Carrier { fn enable(&mut self) {} fn disable(&mut self) {} }
/// # struct Wait;
/// # impl RealTimeWait for Wait { fn sleep_ms(&mut self, _ms: u32) {} }
/// # struct Power;
/// # impl PowerController for Power { fn sleep_for(&mut self, _seconds: u32) {} }
/// let mut beacon = Beacon::new(Clock, Carrier, Wait, SchedulerConfig::default());
/// loop {
/// 	beacon.run_one_activation(&mut Power);
/// }
/// ```
pub struct Beacon<C, K, W> {
	clock: C,
	carrier: K,
	wait: W,
	config: SchedulerConfig,
	mode: Mode,
	transmitter: SymbolTransmitter
}

impl<C, K, W> Beacon<C, K, W>
where
	C: ClockSource,
	K: CarrierSink,
	W: RealTimeWait
{
	pub fn new(clock: C, carrier: K, wait: W, config: SchedulerConfig) -> Self {
		Beacon { clock, carrier, wait, config, mode: Mode::Scheduled, transmitter: SymbolTransmitter::new() }
	}

	/// Set the mode used by subsequent activations.
	pub fn set_mode(&mut self, mode: Mode) {
		self.mode = mode;
	}

	/// Run one activation and hand the resulting sleep to `power`.
	///
	/// Failures never escape: any [`ActivationError`] is logged and turned into a retry sleep of
	/// [`SchedulerConfig::retry_sleep_seconds`].
	pub fn run_one_activation<P: PowerController + ?Sized>(&mut self, power: &mut P) -> SleepDecision {
		let decision = match self.activate() {
			Ok(decision) => decision,
			Err(e) => {
				self.carrier.disable();
				warn!(error = %e, retry = self.config.retry_sleep_seconds, "activation failed");
				SleepDecision { seconds: self.config.retry_sleep_seconds }
			}
		};
		info!(seconds = decision.seconds, "powering down");
		power.sleep_for(decision.seconds);
		decision
	}

	/// Run one activation to completion, without sleeping afterwards.
	pub fn activate(&mut self) -> Result<SleepDecision, ActivationError> {
		self.transmitter.resync();
		let mut state = State::Idle;
		loop {
			state = match state {
				State::PoweringDown(decision) => return Ok(decision),
				state => self.step(state)?
			};
		}
	}

	fn step(&mut self, state: State) -> Result<State, ActivationError> {
		Ok(match state {
			State::Idle => match self.mode {
				Mode::Scheduled => {
					let decision = self.decide()?;
					if decision.is_transmit_now() {
						info!("broadcast window open");
						State::WaitingForAlignment
					} else {
						State::PoweringDown(decision)
					}
				},
				Mode::Immediate { frames } => {
					info!(frames = frames.get(), "transmitting immediately");
					State::WaitingForAlignment
				}
			},
			State::WaitingForAlignment => {
				let now = self.await_alignment()?;
				let minute = now.next_minute().ok_or(ActivationError::TimeOverflow)?;
				let frame = Frame::encode(&minute);
				debug!(aligned = %now, minute = %minute, "encoded first frame");
				State::WaitingForMinuteBoundary { minute, frame }
			},
			State::WaitingForMinuteBoundary { minute, frame } => {
				self.await_minute_boundary(&minute)?;
				State::Transmitting { minute, frame, sent: 0 }
			},
			State::Transmitting { minute, frame, sent } => {
				debug!(minute = %minute, "transmitting");
				self.transmitter.transmit(&frame, &mut self.carrier, &mut self.wait);
				let sent = sent + 1;

				let next = minute.next_minute().ok_or(ActivationError::TimeOverflow)?;
				let more = match self.mode {
					Mode::Scheduled => window_continues(next.minute()),
					Mode::Immediate { frames } => sent < frames.get()
				};
				if more {
					State::Transmitting { minute: next, frame: Frame::encode(&next), sent }
				} else {
					info!(frames = sent, "broadcast finished");
					State::PoweringDown(self.decide()?)
				}
			}
			State::PoweringDown(decision) => State::PoweringDown(decision)
		})
	}

	/// Sleep until the next window from a fresh clock reading.
	fn decide(&mut self) -> Result<SleepDecision, ActivationError> {
		let now = self.clock.now()?;
		let seconds = sleep_seconds(&now);
		debug!(time = %now, seconds, "window computed");
		Ok(SleepDecision::from_seconds(seconds).clamp(self.config.max_sleep_seconds))
	}

	/// Poll until the clock reads the alignment second.
	fn await_alignment(&mut self) -> Result<CalendarTime, ActivationError> {
		let second = self.config.alignment_second;
		let policy = PollPolicy::for_seconds(self.config.poll_interval_ms, 61);
		await_clock_condition(
			&mut self.clock,
			&mut self.wait,
			|t| if t.second() == second { Observation::Match } else { Observation::Pending },
			1,
			policy
		)?.ok_or(ActivationError::AlignmentTimeout { stage: Stage::Alignment, polls: policy.max_polls })
	}

	/// Observe consecutive second ticks, then sleep the remainder of the minute.
	///
	/// The last tick is seen within one poll interval of the true second edge, which is what puts
	/// the first symbol on the minute boundary.
	fn await_minute_boundary(&mut self, minute: &CalendarTime) -> Result<(), ActivationError> {
		let ticks = self.config.calibration_ticks;
		let policy = PollPolicy::for_seconds(self.config.poll_interval_ms, ticks + 2);
		let mut expected: Option<u8> = None;
		let tick = await_clock_condition(
			&mut self.clock,
			&mut self.wait,
			|t| {
				let second = t.second();
				let observation = match expected {
					None => Observation::Pending,
					Some(e) if e == second => Observation::Match,
					Some(e) if (e + 59) % 60 == second => return Observation::Pending,
					Some(_) => Observation::Mismatch
				};
				expected = Some((second + 1) % 60);
				observation
			},
			ticks,
			policy
		)?.ok_or(ActivationError::AlignmentTimeout { stage: Stage::Calibration, polls: policy.max_polls })?;

		let observed = tick.next_minute().ok_or(ActivationError::TimeOverflow)?;
		if observed != *minute {
			return Err(ActivationError::MinuteMismatch { expected: *minute, observed });
		}
		let residual_ms = tick.seconds_until(&observed) as u32 * 1000;
		trace!(tick = %tick, residual_ms, "calibrated");
		self.wait.sleep_ms(residual_ms);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	extern crate std;
	use std::vec::Vec;
	use super::*;
	use crate::{Symbol, frame::SLOT_MS, sim::Sim};

	fn t(hour: u8, minute: u8, second: u8) -> CalendarTime {
		CalendarTime::new(2024, 5, 27, hour, minute, second).unwrap()
	}

	fn beacon(sim: &Sim) -> Beacon<Sim, Sim, Sim> {
		Beacon::new(sim.clock(), sim.carrier(), sim.wait(), SchedulerConfig::default())
	}

	/// Split carrier events into frames of 60 on-air durations, checking slot timing.
	fn frames(events: &[(i64, bool)]) -> Vec<(i64, Vec<i64>)> {
		assert_eq!(events.len() % 120, 0, "partial frame");
		events.chunks(120).map(|frame| {
			let start = frame[0].0;
			let durations = frame.chunks(2).enumerate().map(|(i, pair)| {
				assert!(pair[0].1 && !pair[1].1);
				assert_eq!(pair[0].0, start + i as i64 * SLOT_MS as i64);
				pair[1].0 - pair[0].0
			}).collect();
			(start, durations)
		}).collect()
	}

	fn durations(frame: &Frame) -> Vec<i64> {
		frame.iter().map(|s: &Symbol| s.on_air_ms() as i64).collect()
	}

	#[test]
	fn full_window_test() {
		let sim = Sim::at(t(13, 58, 10));
		let decision = beacon(&sim).run_one_activation(&mut sim.power());

		let frames = frames(&sim.events());
		assert_eq!(frames.len(), 9);
		let mut minute = t(13, 59, 0);
		for (start, d) in &frames {
			assert_eq!(*start, minute.timestamp() * 1000, "frame for {}", minute);
			assert_eq!(*d, durations(&Frame::encode(&minute)));
			minute = minute.next_minute().unwrap();
		}
		assert_eq!(minute, t(14, 8, 0));

		// 14:08:00 until 16:58:10, capped
		assert_eq!(decision, SleepDecision { seconds: 3600 });
		assert_eq!(sim.power_requests(), [3600]);
		assert_eq!(sim.local_time(), t(15, 8, 0));
	}

	#[test]
	fn uncapped_sleep_test() {
		let sim = Sim::at(t(13, 58, 10));
		let config = SchedulerConfig { max_sleep_seconds: 20000, ..SchedulerConfig::default() };
		let mut beacon = Beacon::new(sim.clock(), sim.carrier(), sim.wait(), config);
		assert_eq!(beacon.activate(), Ok(SleepDecision { seconds: 10210 }));
		assert!(sim.power_requests().is_empty());
	}

	#[test]
	fn outside_window_test() {
		let sim = Sim::at(t(14, 30, 0));
		let decision = beacon(&sim).run_one_activation(&mut sim.power());
		assert_eq!(decision.seconds, 3600);
		assert!(sim.events().is_empty());
		assert!(sim.sleeps().is_empty());

		let sim = Sim::at(t(14, 30, 0));
		let config = SchedulerConfig { max_sleep_seconds: 10000, ..SchedulerConfig::default() };
		let mut beacon = Beacon::new(sim.clock(), sim.carrier(), sim.wait(), config);
		assert_eq!(beacon.activate(), Ok(SleepDecision { seconds: 8890 }));
	}

	#[test]
	fn last_minute_of_window_test() {
		// Wakes inside the window with one frame left to send
		let sim = Sim::at(t(14, 6, 20));
		beacon(&sim).run_one_activation(&mut sim.power());

		let frames = frames(&sim.events());
		assert_eq!(frames.len(), 1);
		assert_eq!(frames[0].0, t(14, 7, 0).timestamp() * 1000);
		assert_eq!(frames[0].1, durations(&Frame::encode(&t(14, 7, 0))));
		assert_eq!(sim.power_requests(), [3600]);
	}

	#[test]
	fn window_consecutive_activations_test() {
		// A device that is powered around the clock transmits once per window
		let sim = Sim::at(t(12, 0, 0));
		let mut beacon = beacon(&sim);
		let mut power = sim.power();
		for _ in 0..5 {
			beacon.run_one_activation(&mut power);
		}

		// 12:00 -> 13:00 -> 13:58:10 (window for 14:00) -> 15:08 -> 16:08 -> 16:58:10 (window for 17:00)
		assert_eq!(sim.power_requests(), [3600, 3490, 3600, 3600, 3010]);
		let frames = frames(&sim.events());
		assert_eq!(frames.len(), 9);
		assert_eq!(frames[0].0, t(13, 59, 0).timestamp() * 1000);
		assert_eq!(sim.local_time(), t(16, 58, 10));
	}

	#[test]
	fn immediate_mode_test() {
		let sim = Sim::at(t(10, 20, 30));
		let mut beacon = beacon(&sim);
		beacon.set_mode(Mode::Immediate { frames: NonZeroU32::new(2).unwrap() });
		let decision = beacon.run_one_activation(&mut sim.power());

		let frames = frames(&sim.events());
		assert_eq!(frames.len(), 2);
		assert_eq!(frames[0].0, t(10, 21, 0).timestamp() * 1000);
		assert_eq!(frames[1].1, durations(&Frame::encode(&t(10, 22, 0))));

		// 10:23:00 until 10:58:10
		assert_eq!(decision.seconds, 2110);
	}

	#[test]
	fn immediate_mode_ignores_window_test() {
		// Minute 57 would not be followed by minute 58 in a scheduled broadcast
		let sim = Sim::at(t(14, 56, 0));
		let mut beacon = beacon(&sim);
		beacon.set_mode(Mode::Immediate { frames: NonZeroU32::new(3).unwrap() });
		beacon.run_one_activation(&mut sim.power());
		assert_eq!(frames(&sim.events()).len(), 3);
	}

	#[test]
	fn broken_clock_test() {
		let sim = Sim::at(t(13, 58, 10));
		sim.set_broken(true);
		let mut beacon = beacon(&sim);
		assert_eq!(beacon.activate(), Err(ActivationError::Clock(ClockError::Unavailable)));

		let decision = beacon.run_one_activation(&mut sim.power());
		assert_eq!(decision.seconds, 60);
		assert_eq!(sim.power_requests(), [60]);
		// Only the safety disable
		assert_eq!(sim.events().iter().filter(|(_, on)| *on).count(), 0);
	}

	#[test]
	fn stuck_clock_test() {
		// Waiting never advances the clock, so alignment never happens
		let sim = Sim::at(t(13, 58, 10));
		sim.set_frozen(true);
		let mut beacon = beacon(&sim);
		let policy = PollPolicy::for_seconds(1, 61);
		assert_eq!(
			beacon.activate(),
			Err(ActivationError::AlignmentTimeout { stage: Stage::Alignment, polls: policy.max_polls })
		);
		assert_eq!(sim.sleeps().len() as u32, policy.max_polls - 1);

		// Once the clock runs again, the same window is still open
		sim.set_frozen(false);
		assert_eq!(beacon.run_one_activation(&mut sim.power()).seconds, 3600);
		assert_eq!(frames(&sim.events()).len(), 9);
	}

	/// Stops the simulated clock the first time it reads `second`.
	struct StopAt(Sim, u8);

	impl ClockSource for StopAt {
		fn now(&mut self) -> Result<CalendarTime, ClockError> {
			let now = self.0.now()?;
			if now.second() == self.1 {
				self.0.set_frozen(true);
			}
			Ok(now)
		}
	}

	#[test]
	fn calibration_timeout_test() {
		// Alignment sees second 55, then the seconds never tick again
		let sim = Sim::at(t(13, 58, 50));
		let mut beacon = Beacon::new(StopAt(sim.clock(), 55), sim.carrier(), sim.wait(), SchedulerConfig::default());
		let policy = PollPolicy::for_seconds(1, 5);
		assert_eq!(
			beacon.activate(),
			Err(ActivationError::AlignmentTimeout { stage: Stage::Calibration, polls: policy.max_polls })
		);
		assert!(sim.events().is_empty());

		let decision = beacon.run_one_activation(&mut sim.power());
		assert_eq!(decision, SleepDecision { seconds: 60 });
		assert_eq!(sim.power_requests(), [60]);
		assert!(sim.events().iter().all(|(_, on)| !on));
	}

	#[test]
	fn minute_mismatch_test() {
		// Three ticks after second 58 run past the encoded minute
		let sim = Sim::at(t(13, 58, 10));
		let config = SchedulerConfig { alignment_second: 58, ..SchedulerConfig::default() };
		let mut beacon = Beacon::new(sim.clock(), sim.carrier(), sim.wait(), config);
		assert_eq!(
			beacon.activate(),
			Err(ActivationError::MinuteMismatch { expected: t(13, 59, 0), observed: t(14, 0, 0) })
		);
		assert!(sim.events().is_empty());

		assert_eq!(beacon.run_one_activation(&mut sim.power()).seconds, 60);
		assert!(sim.events().iter().all(|(_, on)| !on));
	}

	/// Clock that replays a fixed sequence of seconds, then keeps repeating the last one.
	struct Replay(Vec<u8>, usize);

	impl ClockSource for Replay {
		fn now(&mut self) -> Result<CalendarTime, ClockError> {
			let second = self.0[self.1.min(self.0.len() - 1)];
			self.1 += 1;
			Ok(t(10, 0, second))
		}
	}

	struct NoWait;

	impl RealTimeWait for NoWait {
		fn sleep_ms(&mut self, _ms: u32) {}
	}

	#[test]
	fn await_clock_condition_test() {
		let policy = PollPolicy { interval_ms: 1, max_polls: 100 };
		let exact = |target: u8| move |t: &CalendarTime| {
			if t.second() == target { Observation::Match } else { Observation::Pending }
		};

		let mut clock = Replay(std::vec![10, 11, 12, 12, 13], 0);
		assert_eq!(await_clock_condition(&mut clock, &mut NoWait, exact(12), 1, policy), Ok(Some(t(10, 0, 12))));
		assert_eq!(clock.1, 3);

		// Stability: two matching readings in a row
		let mut clock = Replay(std::vec![10, 11, 12, 12, 13], 0);
		assert_eq!(await_clock_condition(&mut clock, &mut NoWait, exact(12), 2, policy), Ok(Some(t(10, 0, 12))));
		assert_eq!(clock.1, 4);

		// Never matches
		let mut clock = Replay(std::vec![10], 0);
		assert_eq!(await_clock_condition(&mut clock, &mut NoWait, exact(12), 1, policy), Ok(None));
		assert_eq!(clock.1, 100);
	}

	#[test]
	fn await_clock_condition_mismatch_test() {
		let policy = PollPolicy { interval_ms: 1, max_polls: 100 };
		let mut expected: Option<u8> = None;
		// A spurious reading of 40 restarts the count of consecutive ticks
		let mut clock = Replay(std::vec![10, 10, 11, 11, 12, 40, 13, 14, 15, 16], 0);
		let found = await_clock_condition(&mut clock, &mut NoWait, |t| {
			let second = t.second();
			let o = match expected {
				Some(e) if e == second => Observation::Match,
				Some(e) if e == second + 1 => return Observation::Pending,
				Some(_) => Observation::Mismatch,
				None => Observation::Pending
			};
			expected = Some(second + 1);
			o
		}, 3, policy);
		assert_eq!(found, Ok(Some(t(10, 0, 16))));
	}

	#[test]
	fn poll_policy_test() {
		assert_eq!(PollPolicy::for_seconds(1, 61), PollPolicy { interval_ms: 1, max_polls: 61001 });
		assert_eq!(PollPolicy::for_seconds(0, 1).interval_ms, 1);
		assert_eq!(PollPolicy::for_seconds(300, 1).max_polls, 5);
	}
}
