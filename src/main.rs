//! Emulate a JJY longwave time signal station using simple audio output.
//!
//! Radio-controlled clocks sold in Japan set themselves from [JJY], broadcast at 40 kHz and
//! 60 kHz. This program keys a 20 kHz tone on the default audio output in the JJY time code,
//! taking advantage of stray RF created by audio hardware: the tone's harmonics land on both
//! carrier frequencies, which is enough for a clock placed right next to the device.
//!
//! Like a battery-powered beacon, it does not transmit all the time. A broadcast window opens at
//! 58 minutes 10 seconds past the hour before each of 02, 05, 08, 11, 14, 17, 20 and 23 o'clock
//! and closes at 8 minutes past the hour, which is when most clocks try to receive. In between,
//! the program sleeps. Before each activation it corrects its idea of the time using [NTP].
//!
//! [JJY]: https://en.wikipedia.org/wiki/JJY
//! [NTP]: sntp
//!
//! # Command Line Arguments
//!
//! General form: `jjybeacon [options...]`
//!
//! | Short form | Long form      | Argument           | Default        | Description                          |
//! | ---------- | -------------- | ------------------ | -------------- | ------------------------------------ |
//! | `-c`       | `--config`     | File name          | None           | TOML file with any of the settings   |
//! |            | `--ntp`        | Hostname or IP     | `pool.ntp.org` | [NTP] server used to correct time    |
//! |            | `--no-ntp`     |                    |                | Trust the system clock               |
//! | `-t`       | `--time`       | Date time string   | Current time   | Local time to start from             |
//! |            | `--utc-offset` | Hours              | 9              | Offset of transmitted time from UTC  |
//! | `-n`       | `--now`        | Integer > 0        | None           | Transmit this many minutes right now |
//! |            | `--once`       |                    |                | One activation, then exit            |
//! |            | `--dry-run`    |                    |                | Log instead of playing audio         |
//! |            | `--tone`       | Hz                 | 20000          | Audio tone frequency                 |
//! |            | `--idle-level` | 0 to 1             | 0              | Output level with carrier reduced    |
//! |            | `--max-sleep`  | Seconds            | 3600           | Longest single sleep                 |
//! |            | `--retry-sleep`| Seconds            | 60             | Sleep after a failed activation      |
//!
//! Logging is controlled with `RUST_LOG` (default `info`). `RUST_LOG=jjy=trace` shows every frame.
//!
//! # Examples
//!
//! Run as a beacon, synchronizing with NICT's NTP server
//! ```sh
//! jjybeacon --ntp ntp.nict.jp
//! ```
//!
//! Set a clock right now, transmitting for 5 minutes
//! ```sh
//! jjybeacon --now 5
//! ```
//!
//! See what the next activation would do, without sound
//! ```sh
//! jjybeacon --once --dry-run -t "2024-05-27 13:58:00"
//! ```

use std::process::ExitCode;
use clap::Parser;
use color_eyre::eyre::Error;
use jjy::{Beacon, CarrierSink, ClockSource, Mode, PowerController, StdWait};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use args::{Arguments, Settings};
use carrier::{AudioCarrier, LogCarrier};
use clock::LocalClock;
use power::{Report, ThreadSleep};

mod args;
mod carrier;
mod clock;
mod power;

/// One wake cycle: correct the clock, then run an activation in `mode`.
///
/// Without trustworthy time nothing is transmitted and `power` sleeps for the longest period.
/// Returns whether an activation ran.
fn wake(
	settings: &Settings,
	clock: &mut LocalClock,
	carrier: &mut dyn CarrierSink,
	wait: &mut StdWait,
	power: &mut dyn PowerController,
	mode: Mode
) -> bool {
	if let Some(server) = settings.ntp.as_deref().filter(|_| !clock.is_simulated()) {
		info!(server, "synchronizing clock");
		if let Err(e) = clock.sync(&settings.sntp, server) {
			warn!(error = %e, "clock synchronization failed");
			if mode != Mode::Scheduled {
				warn!("immediate transmission postponed until the clock is synchronized");
			}
			power.sleep_for(settings.scheduler.max_sleep_seconds);
			return false;
		}
	}

	let mut beacon = Beacon::new(&mut *clock, carrier, wait, settings.scheduler);
	beacon.set_mode(mode);
	beacon.run_one_activation(power);
	true
}

/// Run the beacon until interrupted, or for one activation with `--once`.
fn run(settings: Settings) -> Result<ExitCode, Error> {
	let mut clock = match settings.start_time {
		Some(start) => LocalClock::simulated(start),
		None => LocalClock::system(settings.utc_offset_seconds)
	};
	let mut carrier: Box<dyn CarrierSink> = if settings.dry_run {
		Box::new(LogCarrier::default())
	} else {
		Box::new(AudioCarrier::open(settings.tone_hz, settings.idle_level)?)
	};
	let mut wait = StdWait::new();
	let mut mode = settings.mode;

	loop {
		let mut report = Report::default();
		let mut sleeper = ThreadSleep;
		let power: &mut dyn PowerController = if settings.once { &mut report } else { &mut sleeper };

		// Immediate mode applies to the first activation that actually runs
		if wake(&settings, &mut clock, carrier.as_mut(), &mut wait, power, mode) {
			mode = Mode::Scheduled;
		}

		if settings.once {
			let now = clock.now()?;
			match report.wake_time(&now) {
				Some(at) => println!("{}: next activation at {} (in {} s)", now, at, report.seconds.unwrap_or(0)),
				None => println!("{}: no activation scheduled", now)
			}
			return Ok(ExitCode::SUCCESS);
		}
	}
}

fn main() -> Result<ExitCode, Error> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let args = Arguments::parse();
	tracing::debug!(?args);
	if args.time.is_some() && args.ntp.is_some() {
		warn!("--ntp does nothing when the time is set with --time");
	}

	run(Settings::load(args)?)
}
