//! Carrier outputs: the default audio device, or a log for dry runs.
//!
//! Audio hardware leaks a little RF as a side effect of its operation. A 20 kHz tone played at
//! full volume has harmonics at 40 kHz and 60 kHz, the two JJY carrier frequencies, strong enough
//! for a radio-controlled clock a few centimeters away to pick up. Keying the tone between full
//! and reduced level keys the harmonics the same way.

use std::{
	f32::consts::PI,
	sync::{Arc, atomic::{AtomicBool, Ordering}}
};
use color_eyre::eyre::{Error, OptionExt};
use cpal::{Sample, traits::{DeviceTrait, HostTrait, StreamTrait}};
use jjy::CarrierSink;
use tracing::{error, info, trace};
use crate::args::SAMPLE_RATE;

/// Phase at the start of each second of samples. sin(0.58236424) = 0.55, so the tone crosses 55%
/// of its amplitude on the second marker.
const SECOND_PHASE: f32 = 0.58236424;

/// Generates the keyed tone in the audio callback.
///
/// The carrier state is shared with the controlling thread through an [`AtomicBool`], which the
/// callback reads once per buffer.
pub struct ToneWriter {
	/// Samples written so far.
	i: u64,
	tone_hz: f32,
	idle_level: f32,
	on: Arc<AtomicBool>
}

impl ToneWriter {
	pub fn new(tone_hz: f32, idle_level: f32, on: Arc<AtomicBool>) -> Self {
		ToneWriter { i: 0, tone_hz, idle_level, on }
	}

	/// Fill `data` with the next samples of the tone.
	pub fn write(&mut self, data: &mut [f32]) {
		let level = if self.on.load(Ordering::Relaxed) { 1.0 } else { self.idle_level };
		if level == 0. {
			data.iter_mut().for_each(|v| *v = f32::EQUILIBRIUM);
			self.i += data.len() as u64;
			return;
		}

		let s = SAMPLE_RATE as u64;
		for sample in data.iter_mut() {
			let pos = (self.i % s) as f32 / s as f32;
			*sample = level * (PI * 2. * self.tone_hz * pos + SECOND_PHASE).sin();
			self.i += 1;
		}
	}
}

/// Carrier played on the default audio output device.
///
/// Output is 48 kHz mono `f32` in 1024 sample buffers, so a switch takes effect within about
/// 21 ms. The stream plays for as long as this value lives.
pub struct AudioCarrier {
	on: Arc<AtomicBool>,
	_stream: cpal::Stream
}

impl AudioCarrier {
	pub fn open(tone_hz: f32, idle_level: f32) -> Result<AudioCarrier, Error> {
		let host = cpal::default_host();
		let device = host.default_output_device().ok_or_eyre("Failed to get default audio output device")?;
		let config = cpal::StreamConfig {
			channels: 1,
			sample_rate: cpal::SampleRate(SAMPLE_RATE),
			buffer_size: cpal::BufferSize::Fixed(1024),
		};

		let on = Arc::new(AtomicBool::new(false));
		let mut writer = ToneWriter::new(tone_hz, idle_level, on.clone());
		let stream = device.build_output_stream(
			&config,
			move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| writer.write(data),
			|e| error!(error = %e, "audio stream error"),
			None
		)?;
		stream.play()?;
		let name = device.name().unwrap_or_default();
		info!(device = %name, tone_hz, "audio carrier ready");

		Ok(AudioCarrier { on, _stream: stream })
	}
}

impl CarrierSink for AudioCarrier {
	fn enable(&mut self) {
		self.on.store(true, Ordering::Relaxed);
	}

	fn disable(&mut self) {
		self.on.store(false, Ordering::Relaxed);
	}
}

/// Carrier that only logs, for `--dry-run`.
#[derive(Debug, Default)]
pub struct LogCarrier {
	on: bool,
	switches: u64
}

impl LogCarrier {
	pub fn switches(&self) -> u64 {
		self.switches
	}

	fn set(&mut self, on: bool) {
		if self.on != on {
			self.on = on;
			self.switches += 1;
			trace!(on, "carrier");
		}
	}
}

impl CarrierSink for LogCarrier {
	fn enable(&mut self) {
		self.set(true);
	}

	fn disable(&mut self) {
		self.set(false);
	}
}
