use zerocopy_derive::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Width of the kernel's task short name (`TASK_COMM_LEN`).
pub const TASK_COMM_LEN: usize = 16;

pub const DIRECTION_TRANSMIT: u8 = 0;
pub const DIRECTION_RECEIVE: u8 = 1;

/// Canonical per-packet record produced by the kprobe handlers.
///
/// Both sides of the perf channel compile against this exact layout, so the
/// field order and the explicit padding are load-bearing: 32 bytes, align 8,
/// no implicit padding anywhere.
#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct TrafficEvent {
	pub pid: u32,
	pub direction: u8, // DIRECTION_TRANSMIT | DIRECTION_RECEIVE
	pub _pad: [u8; 3],
	pub comm: [u8; TASK_COMM_LEN],
	pub len: u64,
}

/// Legacy transmit-only record produced by the `net:net_dev_xmit` tracepoint
/// handler. Carries no direction (transmit by construction) and no task name.
#[repr(C)]
#[derive(Clone, Copy, Debug, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct XmitEvent {
	pub pid: u32,
	pub _pad: [u8; 4],
	pub len: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	Transmit,
	Receive,
}

impl TryFrom<u8> for Direction {
	type Error = u8;

	fn try_from(raw: u8) -> core::result::Result<Self, u8> {
		match raw {
			DIRECTION_TRANSMIT => Ok(Self::Transmit),
			DIRECTION_RECEIVE => Ok(Self::Receive),
			other => Err(other),
		}
	}
}

impl core::fmt::Display for Direction {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			Self::Transmit => f.write_str("tx"),
			Self::Receive => f.write_str("rx"),
		}
	}
}

impl TrafficEvent {
	/// Bytes of the task name up to the first NUL. A name of exactly
	/// `TASK_COMM_LEN` bytes has no terminator and comes back whole.
	pub fn comm_prefix(&self) -> &[u8] {
		let end = self.comm.iter().position(|&b| b == 0).unwrap_or(TASK_COMM_LEN);
		&self.comm[..end]
	}

	pub fn direction(&self) -> core::result::Result<Direction, u8> {
		Direction::try_from(self.direction)
	}
}

#[cfg(feature = "user")]
mod user {
	use super::*;

	unsafe impl aya::Pod for TrafficEvent {}
	unsafe impl aya::Pod for XmitEvent {}

	impl TrafficEvent {
		/// Lossy UTF-8 view of the task name prefix.
		pub fn process_name(&self) -> String {
			String::from_utf8_lossy(self.comm_prefix()).into_owned()
		}
	}
}
