//! Measure the offset of the system clock against an NTP server.
//!
//! [`SntpClient::query_offset`] makes several SNTPv4 requests and keeps the one with the smallest
//! error bound, which gives a correction accurate to a few tens of milliseconds on a typical
//! network. If the address resolves to multiple IPs, requests cycle through them.
//!
//! The system clock itself is never changed. Callers add the returned [`Offset`] to readings of
//! [`time::now`] instead.
//!
//! # Examples
//!
//! ```no_run
//! # use sntp::SntpClient;
//! let client = SntpClient::default();
//! match client.query_offset("pool.ntp.org") {
//! 	Ok(offset) => println!("system clock is off by {} ns (+/- {})", offset.nanos, offset.error_nanos),
//! 	Err(e) => eprintln!("Error querying pool.ntp.org: {e}")
//! }
//! ```

use std::{
	io,
	net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket},
	time::Duration
};
use time::{NANOS_PER_SECOND, TimeSpec, now};
use tracing::{debug, info, warn};

/// Seconds from the NTP epoch (Jan 1, 1900) to the Unix epoch (Jan 1, 1970).
const UNIX_TO_NTP_EPOCH_ADJUST: i64 = (70 * 365 + 17) * 86400; // 17 leap years between 1900-1970

/// Size of an NTP packet without extensions.
const PACKET_LEN: usize = 48;

/// Version 4, client mode.
const CLIENT_VERSION_MODE: u8 = 4 << 3 | 3;

const MODE_SERVER: u8 = 4;

/// Error type for SNTP queries.
#[derive(Debug, thiserror::Error)]
pub enum SntpError {
	#[error("empty SNTP server address")]
	EmptyAddress,
	#[error("{0} did not resolve to any address")]
	NoAddresses(String),
	#[error("failed to read the system clock")]
	Clock,
	#[error("network error: {0}")]
	Io(#[from] io::Error),
	#[error("short reply from server ({0} bytes)")]
	ShortPacket(usize),
	#[error("reply is not from a server (mode {0})")]
	BadMode(u8),
	/// Stratum 0: the server is unsynchronized or sent a kiss-o'-death.
	#[error("server is not synchronized")]
	Unsynchronized,
	#[error("reply does not answer our request")]
	OriginMismatch
}

/// An NTP timestamp: seconds since Jan 1, 1900, as 32.32 fixed point.
///
/// The timestamp rolls over every 136 years, with the first rollover on February 7, 2036.
/// Differences are taken with wrapping arithmetic, so they stay correct across a rollover as long
/// as the two times are within 68 years of each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct NtpTimestamp(u64);

impl NtpTimestamp {
	/// Build a timestamp from the seconds and the binary fraction of a second.
	///
	/// ```ignore
	/// assert_eq!(NtpTimestamp::new(0x12345678, 0x98765432).0, 0x1234567898765432);
	/// ```
	fn new(sec: u32, frac: u32) -> Self {
		Self((sec as u64) << 32 | frac as u64)
	}

	/// Signed difference `self - rhs`, in nanoseconds.
	fn nanos_since(self, rhs: NtpTimestamp) -> i64 {
		fixed_to_nanos(self.0.wrapping_sub(rhs.0) as i64)
	}
}

impl From<TimeSpec> for NtpTimestamp {
	fn from(time: TimeSpec) -> Self {
		let sec = time.sec + UNIX_TO_NTP_EPOCH_ADJUST;
		let frac = (time.nsec << 32) / NANOS_PER_SECOND;
		NtpTimestamp::new(sec as u32, frac as u32)
	}
}

/// Convert a signed 32.32 fixed point number of seconds to nanoseconds.
fn fixed_to_nanos(v: i64) -> i64 {
	((v as i128 * NANOS_PER_SECOND as i128) >> 32) as i64
}

/// Convert an unsigned 16.16 fixed point number of seconds ("NTP short format") to nanoseconds.
fn short_to_nanos(v: u32) -> i64 {
	((v as i64) * NANOS_PER_SECOND) >> 16
}

/// The fields of an NTP packet this client reads or writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Packet {
	/// Leap indicator (2 bits), version (3 bits) and mode (3 bits).
	version_mode: u8,
	/// 0 for unsynchronized or kiss-o'-death, 1 for primary references, 2-15 for secondary.
	stratum: u8,
	/// Round-trip delay to the reference clock, 16.16 fixed point.
	root_delay: u32,
	/// Maximum error relative to the reference clock, 16.16 fixed point.
	root_dispersion: u32,
	/// Client transmit time, echoed by the server.
	origin_time: NtpTimestamp,
	/// Time the request arrived at the server.
	rx_time: NtpTimestamp,
	/// Time the reply left the server (or, in a request, the client).
	tx_time: NtpTimestamp
}

impl Packet {
	fn request(tx_time: NtpTimestamp) -> Packet {
		Packet { version_mode: CLIENT_VERSION_MODE, tx_time, ..Packet::default() }
	}

	fn mode(&self) -> u8 {
		self.version_mode & 0x7
	}

	/// Serialize to wire format (big endian).
	fn encode(&self) -> [u8; PACKET_LEN] {
		let mut buf = [0; PACKET_LEN];
		buf[0] = self.version_mode;
		buf[1] = self.stratum;
		buf[4..8].copy_from_slice(&self.root_delay.to_be_bytes());
		buf[8..12].copy_from_slice(&self.root_dispersion.to_be_bytes());
		buf[24..32].copy_from_slice(&self.origin_time.0.to_be_bytes());
		buf[32..40].copy_from_slice(&self.rx_time.0.to_be_bytes());
		buf[40..48].copy_from_slice(&self.tx_time.0.to_be_bytes());
		buf
	}

	fn decode(buf: &[u8]) -> Result<Packet, SntpError> {
		let buf: &[u8; PACKET_LEN] = buf.get(..PACKET_LEN)
			.and_then(|b| b.try_into().ok())
			.ok_or(SntpError::ShortPacket(buf.len()))?;
		let u32_at = |i: usize| u32::from_be_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);
		let ts_at = |i: usize| NtpTimestamp((u32_at(i) as u64) << 32 | u32_at(i + 4) as u64);
		Ok(Packet {
			version_mode: buf[0],
			stratum: buf[1],
			root_delay: u32_at(4),
			root_dispersion: u32_at(8),
			origin_time: ts_at(24),
			rx_time: ts_at(32),
			tx_time: ts_at(40)
		})
	}
}

/// A measured clock offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Offset {
	/// Nanoseconds to add to the system clock to get the server's time.
	pub nanos: i64,
	/// Estimated error of `nanos`, +/- nanoseconds.
	pub error_nanos: i64
}

impl Offset {
	/// Apply this offset to a reading of the system clock.
	pub fn apply(&self, time: TimeSpec) -> TimeSpec {
		time.shifted(self.nanos)
	}
}

/// Compute offset and error from the four timestamps of an exchange.
///
/// `t1` is the client's transmit time, `t2` the server's receive time, `t3` the server's
/// transmit time and `t4` the client's receive time.
fn measure(reply: &Packet, t4: NtpTimestamp) -> Offset {
	let (t1, t2, t3) = (reply.origin_time, reply.rx_time, reply.tx_time);
	let delay = t4.nanos_since(t1) - t3.nanos_since(t2);
	let nanos = (t2.nanos_since(t1) - t4.nanos_since(t3)) / 2;
	let error = delay + short_to_nanos(reply.root_delay) / 2 + short_to_nanos(reply.root_dispersion);
	Offset { nanos, error_nanos: error.abs() }
}

/// Normalize an address for use by [`ToSocketAddrs::to_socket_addrs`].
///
/// This function adds a default port (123 for NTP) if none is given, and supports domain names and
/// IP addresses (IPv4 and IPv6).
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_address("time.google.com").unwrap(), "time.google.com:123");
/// assert_eq!(normalize_address("::1").unwrap(), "[::1]:123");
/// assert_eq!(normalize_address("[::1]:321").unwrap(), "[::1]:321");
/// ```
fn normalize_address(addr: &str) -> Result<String, SntpError> {
	if addr.is_empty() {
		return Err(SntpError::EmptyAddress);
	}

	let Some(i) = addr.find(':') else {
		// Host name or IPv4, no port
		return Ok(format!("{}:123", addr));
	};
	if addr[i + 1..].find(':').is_none() {
		// Host name or IPv4 with port
		return Ok(String::from(addr));
	}
	// IPv6: a port can only follow a closing bracket
	match addr.rfind(']') {
		Some(k) if addr[k..].contains(':') => Ok(String::from(addr)),
		Some(_) => Ok(format!("{}:123", addr)),
		None => Ok(format!("[{}]:123", addr))
	}
}

/// A simple SNTP client.
///
/// Sockets are opened per query and closed afterwards, as queries happen rarely (once per wake
/// cycle).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SntpClient {
	/// Read and write timeout of each request.
	pub timeout: Duration,
	/// Number of requests per query.
	pub samples: u32
}

impl Default for SntpClient {
	fn default() -> Self {
		SntpClient { timeout: Duration::from_secs(1), samples: 5 }
	}
}

impl SntpClient {
	/// Measure the offset of the system clock against `server`.
	///
	/// Of all successful samples, the one with the smallest error bound wins. Fails only if every
	/// sample failed, returning the last error.
	pub fn query_offset(&self, server: &str) -> Result<Offset, SntpError> {
		let addrs: Vec<SocketAddr> = normalize_address(server)?.to_socket_addrs()?.collect();
		if addrs.is_empty() {
			return Err(SntpError::NoAddresses(String::from(server)));
		}

		let mut sockv4 = None;
		let mut sockv6 = None;
		let mut best: Option<Offset> = None;
		let mut last_error = None;
		for addr in addrs.iter().cycle().take(self.samples.max(1) as usize) {
			let socket = if addr.is_ipv4() {
				self.socket(&mut sockv4, Ipv4Addr::UNSPECIFIED.into())
			} else {
				self.socket(&mut sockv6, Ipv6Addr::UNSPECIFIED.into())
			};
			match socket.and_then(|s| Self::sample(s, addr)) {
				Ok(offset) => {
					debug!(%addr, offset = offset.nanos, error = offset.error_nanos, "sntp sample");
					if best.is_none_or(|b| offset.error_nanos < b.error_nanos) {
						best = Some(offset);
					}
				},
				Err(e) => {
					warn!(%addr, error = %e, "sntp sample failed");
					last_error = Some(e);
				}
			}
		}

		match (best, last_error) {
			(Some(offset), _) => {
				info!(server, offset = offset.nanos, error = offset.error_nanos, "clock offset measured");
				Ok(offset)
			},
			(None, Some(e)) => Err(e),
			(None, None) => Err(SntpError::NoAddresses(String::from(server)))
		}
	}

	/// Get or open the socket for an address family.
	fn socket<'a>(&self, slot: &'a mut Option<UdpSocket>, bind: IpAddr) -> Result<&'a UdpSocket, SntpError> {
		let socket = match slot.take() {
			Some(s) => s,
			None => {
				let s = UdpSocket::bind((bind, 0))?;
				s.set_read_timeout(Some(self.timeout))?;
				s.set_write_timeout(Some(self.timeout))?;
				s
			}
		};
		Ok(slot.insert(socket))
	}

	fn sample(socket: &UdpSocket, addr: &SocketAddr) -> Result<Offset, SntpError> {
		socket.connect(addr)?;
		let t1 = NtpTimestamp::from(now().ok_or(SntpError::Clock)?);
		socket.send(&Packet::request(t1).encode())?;

		let mut buf = [0; 512];
		let len = socket.recv(&mut buf)?;
		let t4 = NtpTimestamp::from(now().ok_or(SntpError::Clock)?);

		let reply = Packet::decode(&buf[..len])?;
		if reply.mode() != MODE_SERVER {
			return Err(SntpError::BadMode(reply.mode()));
		}
		if reply.stratum == 0 {
			return Err(SntpError::Unsynchronized);
		}
		if reply.origin_time != t1 {
			return Err(SntpError::OriginMismatch);
		}
		Ok(measure(&reply, t4))
	}
}
