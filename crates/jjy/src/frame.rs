//! The JJY time code: one [`Frame`] of 60 [`Symbol`]s per minute.
//!
//! See [JJY documentation](https://www.nict.go.jp/en/sts/jjy_signal.html) for details. This module
//! implements the time-related part of the time code. The leap second warning bits, the call sign
//! announcement during minutes 15 and 45 and the service interruption bits are always transmitted
//! as zero.
//!
//! Each second of the minute carries one symbol, distinguished by how long the carrier is held at
//! full power at the start of the second: 200 ms for a position marker, 500 ms for a binary one and
//! 800 ms for a binary zero. Numeric fields are sent digit by digit (BCD-like), most significant bit
//! first.
//!
//! | Seconds | Content                           |
//! | ------- | --------------------------------- |
//! | 0       | Marker                            |
//! | 1-8     | Minute (tens: 3 bits, ones: 4)    |
//! | 9       | Marker                            |
//! | 12-18   | Hour (tens: 2 bits, ones: 4)      |
//! | 19      | Marker                            |
//! | 22-33   | Day of year (2 + 4 + 4 bits)      |
//! | 29      | Marker (inside the day of year)   |
//! | 36, 37  | Hour parity, minute parity        |
//! | 39      | Marker                            |
//! | 41-48   | Year within century (4 + 4 bits)  |
//! | 49      | Marker                            |
//! | 50-52   | Day of week, 0=Sunday             |
//! | 59      | Marker                            |
//!
//! All other seconds carry a zero.
//!
//! # Examples
//! ```
//! # use jjy::{Frame, Symbol};
//! # use time::CalendarTime;
//! // Saturday, July 4, 2020. 11:36 JST
//! let t = CalendarTime::new(2020, 7, 4, 11, 36, 0).unwrap();
//! let frame = Frame::encode(&t);
//! assert_eq!(frame[0], Symbol::Marker);
//! assert_eq!(
//! 	frame.to_string(),
//! 	"M01100110M000100001M000101000M011000000M000100000M110000000M"
//! );
//! ```

use core::{fmt, ops::Index, slice};
use time::CalendarTime;

/// Length of one symbol slot, in milliseconds.
pub const SLOT_MS: u32 = 1000;

/// Number of symbols in one frame (one per second of the minute).
pub const FRAME_LEN: usize = 60;

/// Positions of the marker symbols within a frame.
pub const MARKER_POSITIONS: [usize; 7] = [0, 9, 19, 29, 39, 49, 59];

/// One second of the time code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
	/// Position marker, 200 ms of full carrier.
	Marker,
	/// Binary one, 500 ms of full carrier.
	One,
	/// Binary zero, 800 ms of full carrier.
	Zero
}

impl Symbol {
	/// Time the carrier is held at full power, measured from the start of the slot.
	pub const fn on_air_ms(self) -> u32 {
		match self {
			Symbol::Marker => 200,
			Symbol::One => 500,
			Symbol::Zero => 800
		}
	}

	/// Remainder of the slot, during which the carrier is off.
	pub const fn off_air_ms(self) -> u32 {
		SLOT_MS - self.on_air_ms()
	}

	/// The symbol for a binary value.
	const fn bit(value: bool) -> Symbol {
		if value { Symbol::One } else { Symbol::Zero }
	}

	/// Single character form, as used in [`Frame`]'s `Display` output.
	pub const fn as_char(self) -> char {
		match self {
			Symbol::Marker => 'M',
			Symbol::One => '1',
			Symbol::Zero => '0'
		}
	}
}

/// The digits of a calendar time, as carried by the time code.
///
/// # Examples
///
/// ```ignore
/// // Saturday, July 4, 2020. 11:36 JST
/// let t = CalendarTime::new(2020, 7, 4, 11, 36, 0).unwrap();
/// let d = TimeCode::new(&t);
/// assert_eq!((d.min_tens, d.min_ones), (3, 6));
/// assert_eq!((d.yday_huns, d.yday_tens, d.yday_ones), (1, 8, 6));
/// assert_eq!(d.day_of_week, 6); // Saturday
/// ```
#[derive(Debug)]
struct TimeCode {
	/// Minutes tens digit, ranged [0, 5].
	min_tens: u8,
	/// Minutes ones digit, ranged [0, 9].
	min_ones: u8,
	/// Hour tens digit, ranged [0, 2].
	hour_tens: u8,
	/// Hour ones digit, ranged [0, 9].
	hour_ones: u8,
	/// Day of year hundreds digit, ranged [0, 3].
	yday_huns: u8,
	/// Day of year tens digit, ranged [0, 9].
	yday_tens: u8,
	/// Day of year ones digit, ranged [0, 9].
	yday_ones: u8,
	/// Year tens digit, ranged [0, 9].
	year_tens: u8,
	/// Year ones digit, ranged [0, 9].
	year_ones: u8,
	/// Day of week, ranged [0, 6], where 0=Sunday, 6=Saturday.
	day_of_week: u8
}

impl TimeCode {
	fn new(time: &CalendarTime) -> TimeCode {
		debug_assert!(time.minute() < 60 && time.hour() < 24);
		debug_assert!((1..=366).contains(&time.day_of_year()) && time.weekday() < 7);

		let yday = time.day_of_year();
		let year = time.year() % 100;
		TimeCode {
			min_tens: time.minute() / 10,
			min_ones: time.minute() % 10,
			hour_tens: time.hour() / 10,
			hour_ones: time.hour() % 10,
			yday_huns: (yday / 100) as u8,
			yday_tens: ((yday / 10) % 10) as u8,
			yday_ones: (yday % 10) as u8,
			year_tens: (year / 10) as u8,
			year_ones: (year % 10) as u8,
			// CalendarTime counts from Monday, JJY from Sunday
			day_of_week: (time.weekday() + 1) % 7
		}
	}

	/// Even parity over the hour digits: set when they contain an odd number of one bits.
	fn hour_parity(&self) -> bool {
		(self.hour_tens.count_ones() + self.hour_ones.count_ones()) & 1 == 1
	}

	/// Even parity over the minute digits.
	fn minute_parity(&self) -> bool {
		(self.min_tens.count_ones() + self.min_ones.count_ones()) & 1 == 1
	}
}

/// Sequential writer used to lay out a frame.
struct FrameWriter {
	symbols: [Symbol; FRAME_LEN],
	pos: usize
}

impl FrameWriter {
	fn push(&mut self, symbol: Symbol) -> &mut Self {
		self.symbols[self.pos] = symbol;
		self.pos += 1;
		self
	}

	fn marker(&mut self) -> &mut Self {
		self.push(Symbol::Marker)
	}

	fn zeros(&mut self, count: usize) -> &mut Self {
		for _ in 0..count {
			self.push(Symbol::Zero);
		}
		self
	}

	fn bit(&mut self, value: bool) -> &mut Self {
		self.push(Symbol::bit(value))
	}

	/// Write the low `width` bits of `digit`, MSB first.
	fn digit(&mut self, digit: u8, width: u32) -> &mut Self {
		for shift in (0..width).rev() {
			self.bit((digit >> shift) & 1 == 1);
		}
		self
	}
}

/// One minute of time code, ready to transmit.
///
/// A frame is built once from the minute it describes and is not modified afterwards. It
/// dereferences by index and iterates in transmission order.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Frame([Symbol; FRAME_LEN]);

impl Frame {
	/// Encode the time code for the minute given by `time`.
	///
	/// The hour, minute and date fields of `time` are encoded as-is and its second is ignored, so
	/// `time` should be the minute whose second 0 coincides with the start of transmission.
	/// Encoding is pure and cannot fail: every [`CalendarTime`] is already range checked.
	pub fn encode(time: &CalendarTime) -> Frame {
		let code = TimeCode::new(time);
		let mut w = FrameWriter { symbols: [Symbol::Zero; FRAME_LEN], pos: 0 };

		w.marker()
			.digit(code.min_tens, 3).zeros(1).digit(code.min_ones, 4)
			.marker()
			.zeros(2).digit(code.hour_tens, 2).zeros(1).digit(code.hour_ones, 4)
			.marker()
			.zeros(2).digit(code.yday_huns, 2).zeros(1).digit(code.yday_tens, 4)
			.marker()
			.digit(code.yday_ones, 4).zeros(2).bit(code.hour_parity()).bit(code.minute_parity()).zeros(1)
			.marker()
			.zeros(1).digit(code.year_tens, 4).digit(code.year_ones, 4)
			.marker()
			.digit(code.day_of_week, 3).zeros(6)
			.marker();

		debug_assert_eq!(w.pos, FRAME_LEN);
		Frame(w.symbols)
	}

	/// The symbols of this frame in transmission order.
	pub fn symbols(&self) -> &[Symbol; FRAME_LEN] {
		&self.0
	}

	/// Iterate over the symbols in transmission order.
	pub fn iter(&self) -> slice::Iter<'_, Symbol> {
		self.0.iter()
	}
}

impl Index<usize> for Frame {
	type Output = Symbol;

	fn index(&self, index: usize) -> &Symbol {
		&self.0[index]
	}
}

impl<'a> IntoIterator for &'a Frame {
	type Item = &'a Symbol;
	type IntoIter = slice::Iter<'a, Symbol>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl fmt::Display for Frame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.iter().try_for_each(|s| fmt::Write::write_char(f, s.as_char()))
	}
}

impl fmt::Debug for Frame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Frame({})", self)
	}
}
