//! Play a [`Frame`] onto a carrier.
//!
//! Each symbol is sent as one enable/disable pair: the carrier goes to full power at the start of
//! the slot, drops after the symbol's on-air time and stays down until the next slot.

use tracing::{trace, warn};
use crate::{CarrierSink, RealTimeWait, frame::{Frame, SLOT_MS}};

/// A slot start this far from the expected one is treated as a new transmission.
const RESYNC_TOLERANCE_MS: u64 = 250;

/// Sends frames symbol by symbol.
///
/// If the [`RealTimeWait`] has a monotonic clock, every edge is scheduled against an absolute
/// deadline computed from the start of the first slot, and consecutive frames continue the same
/// slot grid. Otherwise each phase sleeps its nominal duration.
///
/// # Examples
/// ```
/// # use jjy::{CarrierSink, Frame, RealTimeWait, SymbolTransmitter};
/// # use time::CalendarTime;
/// struct Count(u32);
/// impl CarrierSink for Count {
/// 	fn enable(&mut self) { self.0 += 1 }
/// 	fn disable(&mut self) { self.0 += 1 }
/// }
/// struct NoWait;
/// impl RealTimeWait for NoWait {
/// 	fn sleep_ms(&mut self, _ms: u32) {}
/// }
///
/// let frame = Frame::encode(&CalendarTime::new(2024, 5, 27, 2, 0, 0).unwrap());
/// let mut carrier = Count(0);
/// SymbolTransmitter::new().transmit(&frame, &mut carrier, &mut NoWait);
/// assert_eq!(carrier.0, 120);
/// ```
#[derive(Debug, Default)]
pub struct SymbolTransmitter {
	/// Expected start of the next slot on the monotonic clock.
	next_slot: Option<u64>
}

impl SymbolTransmitter {
	pub const fn new() -> Self {
		SymbolTransmitter { next_slot: None }
	}

	/// Forget the slot grid. The next frame starts its first slot immediately.
	pub fn resync(&mut self) {
		self.next_slot = None;
	}

	/// Transmit all 60 symbols of `frame`, in order, starting now.
	///
	/// Returns after the last slot has ended. The carrier is left disabled.
	pub fn transmit<C, W>(&mut self, frame: &Frame, carrier: &mut C, wait: &mut W)
	where
		C: CarrierSink + ?Sized,
		W: RealTimeWait + ?Sized
	{
		let mut slot = self.first_slot(wait);
		trace!(frame = %frame, "transmitting frame");

		for symbol in frame {
			carrier.enable();
			Self::wait_until(wait, slot.map(|s| s + symbol.on_air_ms() as u64), symbol.on_air_ms());
			carrier.disable();
			let end = slot.map(|s| s + SLOT_MS as u64);
			Self::wait_until(wait, end, symbol.off_air_ms());
			slot = end;
		}

		self.next_slot = slot;
	}

	/// Start of the first slot of a frame: the continuation of the previous frame's grid if the
	/// caller is still on it, otherwise now.
	fn first_slot<W: RealTimeWait + ?Sized>(&mut self, wait: &W) -> Option<u64> {
		let now = wait.monotonic_ms()?;
		match self.next_slot {
			Some(expected) if now.abs_diff(expected) <= RESYNC_TOLERANCE_MS => Some(expected),
			Some(expected) => {
				warn!(expected, now, "slot grid lost, restarting at current time");
				Some(now)
			},
			None => Some(now)
		}
	}

	fn wait_until<W: RealTimeWait + ?Sized>(wait: &mut W, deadline: Option<u64>, nominal_ms: u32) {
		let ms = match (deadline, wait.monotonic_ms()) {
			(Some(deadline), Some(now)) => deadline.saturating_sub(now).min(SLOT_MS as u64) as u32,
			_ => nominal_ms
		};
		if ms > 0 {
			wait.sleep_ms(ms);
		}
	}
}
