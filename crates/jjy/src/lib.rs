//! Emulate a JJY longwave time signal transmitter.
//!
//! This crate encodes the [JJY] time code and drives a carrier through it during short broadcast
//! windows, so that nearby radio-controlled clocks can synchronize. It knows nothing about audio
//! devices, power management or where the time comes from: those are supplied by the caller
//! through four small traits.
//!
//! - [`ClockSource`] reports the current local (Japan standard) time.
//! - [`CarrierSink`] switches the carrier between full and reduced power.
//! - [`RealTimeWait`] blocks for a number of milliseconds.
//! - [`PowerController`] puts the device to sleep between activations.
//!
//! The pieces are layered bottom-up: [`frame`] builds the 60-symbol time code for one minute,
//! [`transmit`] plays a frame onto a carrier with millisecond timing, [`window`] decides when a
//! broadcast should happen, and [`scheduler`] ties them together into one activation of a
//! [`Beacon`].
//!
//! This crate is `no_std`. Enabling feature `std` adds [`StdWait`], a [`RealTimeWait`] backed by
//! [`std::thread::sleep`] and [`std::time::Instant`], and lets the `tracing` events reach a
//! subscriber.
//!
//! [JJY]: https://en.wikipedia.org/wiki/JJY
//!
//! # Examples
//! ```
//! # use jjy::{Frame, window};
//! # use time::CalendarTime;
//! let now = CalendarTime::new(2024, 5, 27, 14, 30, 0).unwrap();
//!
//! // Outside a broadcast window: sleep until 16:58:10
//! assert_eq!(window::sleep_seconds(&now), 8890);
//!
//! // The code for the next minute, as sent starting at 14:31:00
//! let frame = Frame::encode(&now.next_minute().unwrap());
//! assert_eq!(frame.to_string().len(), 60);
//! ```

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "std")]
extern crate std;

use time::CalendarTime;

pub mod frame;
pub mod transmit;
pub mod window;
pub mod scheduler;
#[cfg(feature = "std")]
mod wait;
#[cfg(test)]
mod sim;

pub use frame::{Frame, Symbol};
pub use transmit::SymbolTransmitter;
pub use window::{SleepDecision, sleep_seconds, window_continues};
pub use scheduler::{ActivationError, Beacon, Mode, PollPolicy, SchedulerConfig};
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[cfg(feature = "std")]
pub use wait::StdWait;

/// Error type for reading the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
	/// The underlying clock could not be read.
	#[error("clock unavailable")]
	Unavailable,
	/// The clock was read, but the time cannot be represented as a calendar time.
	#[error("clock reading out of range")]
	OutOfRange
}

/// Source of the current local time.
///
/// Readings are at one-second resolution. Successive readings may jump (e.g. after a network time
/// correction), which callers are expected to tolerate.
pub trait ClockSource {
	/// Read the current time.
	fn now(&mut self) -> Result<CalendarTime, ClockError>;
}

/// The transmitter's carrier, switched between full and reduced power.
pub trait CarrierSink {
	/// Switch the carrier to full power.
	fn enable(&mut self);
	/// Switch the carrier to reduced power.
	fn disable(&mut self);
}

/// Blocking wait with millisecond granularity.
pub trait RealTimeWait {
	/// Block for approximately `ms` milliseconds.
	fn sleep_ms(&mut self, ms: u32);

	/// Milliseconds elapsed on a monotonic clock, if one is available.
	///
	/// When this returns `Some`, the transmitter schedules symbol edges against absolute deadlines
	/// so that the overhead of each call does not accumulate across a frame. The origin is
	/// arbitrary but must not change.
	fn monotonic_ms(&self) -> Option<u64> {
		None
	}
}

/// Power management between activations.
pub trait PowerController {
	/// Sleep the device for `seconds` seconds. Zero means start the next activation immediately.
	fn sleep_for(&mut self, seconds: u32);
}

impl<T: ClockSource + ?Sized> ClockSource for &mut T {
	fn now(&mut self) -> Result<CalendarTime, ClockError> {
		(**self).now()
	}
}

impl<T: CarrierSink + ?Sized> CarrierSink for &mut T {
	fn enable(&mut self) {
		(**self).enable()
	}

	fn disable(&mut self) {
		(**self).disable()
	}
}

impl<T: RealTimeWait + ?Sized> RealTimeWait for &mut T {
	fn sleep_ms(&mut self, ms: u32) {
		(**self).sleep_ms(ms)
	}

	fn monotonic_ms(&self) -> Option<u64> {
		(**self).monotonic_ms()
	}
}
