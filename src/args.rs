//! Command line arguments and the optional configuration file.
//!
//! Every setting can be given on the command line or in a TOML file passed with `--config`. The
//! command line wins when both are present. See [crate] documentation for the list of settings.

use std::{fs, num::NonZeroU32, path::{Path, PathBuf}, time::Duration};
use clap::Parser;
use color_eyre::eyre::{Error, WrapErr, bail};
use jjy::{Mode, SchedulerConfig};
use serde::Deserialize;
use sntp::SntpClient;
use time::CalendarTime;

/// NTP server used when none is configured.
pub const DEFAULT_NTP_SERVER: &str = "pool.ntp.org";

/// Japan standard time, UTC+9.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

/// Tone written to the audio device. Its second and third harmonics are the 40 kHz and 60 kHz
/// JJY carriers.
pub const DEFAULT_TONE_HZ: f32 = 20000.;

/// Sample rate of the audio output.
pub const SAMPLE_RATE: u32 = 48000;

/// Emulate a JJY longwave time signal station, so radio-controlled clocks nearby can set
/// themselves.
#[derive(Debug, Parser)]
#[command(name = "jjybeacon", version, about)]
pub struct Arguments {
	/// TOML configuration file
	#[arg(short, long, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// NTP server used to correct the system clock [default: pool.ntp.org]
	#[arg(long, value_name = "SERVER")]
	pub ntp: Option<String>,

	/// Trust the system clock and skip NTP
	#[arg(long, conflicts_with = "ntp")]
	pub no_ntp: bool,

	/// Local time to start from instead of the clock, e.g. "2024-05-27 13:58:00"
	#[arg(short, long, value_name = "DATETIME")]
	pub time: Option<CalendarTime>,

	/// Offset of the transmitted local time from UTC, in hours [default: 9]
	#[arg(long, value_name = "HOURS", allow_negative_numbers = true)]
	pub utc_offset: Option<i32>,

	/// Transmit FRAMES minutes right away, ignoring the broadcast windows
	#[arg(short, long, value_name = "FRAMES")]
	pub now: Option<NonZeroU32>,

	/// Run a single activation, print how long the device would sleep, and exit
	#[arg(long)]
	pub once: bool,

	/// Log carrier switching instead of playing audio
	#[arg(long)]
	pub dry_run: bool,

	/// Audio tone frequency in Hz [default: 20000]
	#[arg(long, value_name = "HZ")]
	pub tone: Option<f32>,

	/// Output level while the carrier is reduced, from 0 to 1 [default: 0]
	#[arg(long, value_name = "LEVEL")]
	pub idle_level: Option<f32>,

	/// Longest single sleep, in seconds [default: 3600]
	#[arg(long, value_name = "SECONDS")]
	pub max_sleep: Option<u32>,

	/// Sleep after a failed activation, in seconds [default: 60]
	#[arg(long, value_name = "SECONDS")]
	pub retry_sleep: Option<u32>
}

/// Contents of the configuration file. All keys are optional.
///
/// ```toml
/// ntp = "ntp.nict.jp"
/// utc_offset_hours = 9
/// tone_hz = 20000.0
/// ```
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
	/// NTP server. An empty string disables NTP.
	pub ntp: Option<String>,
	pub ntp_samples: Option<u32>,
	pub ntp_timeout_ms: Option<u64>,
	pub utc_offset_hours: Option<i32>,
	pub tone_hz: Option<f32>,
	pub idle_level: Option<f32>,
	pub max_sleep_seconds: Option<u32>,
	pub retry_sleep_seconds: Option<u32>,
	pub alignment_second: Option<u8>,
	pub calibration_ticks: Option<u32>
}

impl FileConfig {
	pub fn load(path: &Path) -> Result<FileConfig, Error> {
		let text = fs::read_to_string(path)
			.wrap_err_with(|| format!("failed to read {}", path.display()))?;
		toml::from_str(&text).wrap_err_with(|| format!("invalid configuration in {}", path.display()))
	}
}

/// Fully resolved settings for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
	/// NTP server, or `None` to trust the system clock.
	pub ntp: Option<String>,
	pub sntp: SntpClient,
	pub utc_offset_seconds: i64,
	pub start_time: Option<CalendarTime>,
	pub tone_hz: f32,
	pub idle_level: f32,
	pub scheduler: SchedulerConfig,
	/// Mode of the first activation. Later activations are always scheduled.
	pub mode: Mode,
	pub once: bool,
	pub dry_run: bool
}

impl Settings {
	/// Read the configuration file named in `args`, if any, and merge it with `args`.
	pub fn load(args: Arguments) -> Result<Settings, Error> {
		let file = match &args.config {
			Some(path) => FileConfig::load(path)?,
			None => FileConfig::default()
		};
		Settings::resolve(args, file)
	}

	/// Merge command line arguments over file settings over defaults, and validate the result.
	pub fn resolve(args: Arguments, file: FileConfig) -> Result<Settings, Error> {
		let ntp = if args.no_ntp {
			None
		} else {
			match args.ntp.or(file.ntp) {
				Some(s) if s.is_empty() => None,
				Some(s) => Some(s),
				None => Some(String::from(DEFAULT_NTP_SERVER))
			}
		};

		let defaults = SntpClient::default();
		let sntp = SntpClient {
			timeout: file.ntp_timeout_ms.map(Duration::from_millis).unwrap_or(defaults.timeout),
			samples: file.ntp_samples.unwrap_or(defaults.samples)
		};
		if sntp.samples == 0 {
			bail!("ntp_samples must be at least 1");
		}

		let utc_offset = args.utc_offset.or(file.utc_offset_hours).unwrap_or(DEFAULT_UTC_OFFSET_HOURS);
		if !(-12..=14).contains(&utc_offset) {
			bail!("UTC offset must be between -12 and 14 hours, got {}", utc_offset);
		}

		let tone_hz = args.tone.or(file.tone_hz).unwrap_or(DEFAULT_TONE_HZ);
		if !(tone_hz > 0. && tone_hz < SAMPLE_RATE as f32 / 2.) {
			bail!("tone must be between 0 and {} Hz, got {}", SAMPLE_RATE / 2, tone_hz);
		}
		let idle_level = args.idle_level.or(file.idle_level).unwrap_or(0.);
		if !(0. ..=1.).contains(&idle_level) {
			bail!("idle level must be between 0 and 1, got {}", idle_level);
		}

		let defaults = SchedulerConfig::default();
		let scheduler = SchedulerConfig {
			max_sleep_seconds: args.max_sleep.or(file.max_sleep_seconds).unwrap_or(defaults.max_sleep_seconds),
			retry_sleep_seconds: args.retry_sleep.or(file.retry_sleep_seconds).unwrap_or(defaults.retry_sleep_seconds),
			alignment_second: file.alignment_second.unwrap_or(defaults.alignment_second),
			calibration_ticks: file.calibration_ticks.unwrap_or(defaults.calibration_ticks),
			poll_interval_ms: defaults.poll_interval_ms
		};
		if scheduler.max_sleep_seconds == 0 {
			bail!("maximum sleep must be at least 1 second");
		}
		if scheduler.retry_sleep_seconds == 0 {
			bail!("retry sleep must be at least 1 second");
		}
		// The calibration ticks must all fall before the minute boundary
		if scheduler.alignment_second as u32 + scheduler.calibration_ticks >= 60 {
			bail!(
				"alignment second {} leaves no room for {} calibration ticks",
				scheduler.alignment_second, scheduler.calibration_ticks
			);
		}

		Ok(Settings {
			ntp,
			sntp,
			utc_offset_seconds: utc_offset as i64 * 3600,
			start_time: args.time,
			tone_hz,
			idle_level,
			scheduler,
			mode: args.now.map_or(Mode::Scheduled, |frames| Mode::Immediate { frames }),
			once: args.once,
			dry_run: args.dry_run
		})
	}
}
