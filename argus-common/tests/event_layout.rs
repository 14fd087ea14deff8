//! Wire-layout tests for the records shared between the probes and the
//! userspace readers. The layouts here are a bit-exact contract: both sides
//! compile against them with no version negotiation, so any drift is a bug.

use core::mem::{align_of, offset_of, size_of};

use argus_common::*;
use zerocopy::{FromBytes, IntoBytes};

type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>;

#[test]
fn traffic_event_layout_is_fixed() {
	assert_eq!(size_of::<TrafficEvent>(), 32);
	assert_eq!(align_of::<TrafficEvent>(), 8);
	assert_eq!(offset_of!(TrafficEvent, pid), 0);
	assert_eq!(offset_of!(TrafficEvent, direction), 4);
	assert_eq!(offset_of!(TrafficEvent, comm), 8);
	assert_eq!(offset_of!(TrafficEvent, len), 24);
}

#[test]
fn xmit_event_layout_is_fixed() {
	assert_eq!(size_of::<XmitEvent>(), 16);
	assert_eq!(align_of::<XmitEvent>(), 8);
	assert_eq!(offset_of!(XmitEvent, pid), 0);
	assert_eq!(offset_of!(XmitEvent, len), 8);
}

#[test]
fn traffic_event_roundtrips_through_raw_bytes() -> Result<()> {
	// -- Setup & Fixtures
	let mut fx_comm = [0u8; TASK_COMM_LEN];
	fx_comm[..4].copy_from_slice(b"curl");
	let fx_event = TrafficEvent {
		pid: 4321,
		direction: DIRECTION_TRANSMIT,
		_pad: [0u8; 3],
		comm: fx_comm,
		len: 512,
	};

	// -- Exec
	let (event, rest) = TrafficEvent::read_from_prefix(fx_event.as_bytes()).map_err(|_| "event too short")?;

	// -- Check
	assert!(rest.is_empty());
	assert_eq!(event.pid, 4321);
	assert_eq!(event.direction(), Ok(Direction::Transmit));
	assert_eq!(event.comm_prefix(), b"curl");
	assert_eq!(event.len, 512);

	Ok(())
}

#[test]
fn traffic_event_decode_rejects_short_buffer() {
	let fx_bytes = [0u8; 31];

	let res = TrafficEvent::read_from_prefix(&fx_bytes[..]);

	assert!(res.is_err());
}

#[test]
fn xmit_event_roundtrips_through_raw_bytes() -> Result<()> {
	// -- Setup & Fixtures
	let fx_event = XmitEvent {
		pid: 77,
		_pad: [0u8; 4],
		len: 1500,
	};

	// -- Exec
	let (event, _) = XmitEvent::read_from_prefix(fx_event.as_bytes()).map_err(|_| "event too short")?;

	// -- Check
	assert_eq!(event.pid, 77);
	assert_eq!(event.len, 1500);

	Ok(())
}

#[test]
fn comm_prefix_keeps_unterminated_full_width_name() {
	let fx_event = TrafficEvent {
		pid: 1,
		direction: DIRECTION_RECEIVE,
		_pad: [0u8; 3],
		comm: *b"0123456789abcdef",
		len: 0,
	};

	assert_eq!(fx_event.comm_prefix(), b"0123456789abcdef");
}

#[test]
fn direction_rejects_unknown_discriminant() {
	assert_eq!(Direction::try_from(DIRECTION_TRANSMIT), Ok(Direction::Transmit));
	assert_eq!(Direction::try_from(DIRECTION_RECEIVE), Ok(Direction::Receive));
	assert_eq!(Direction::try_from(7), Err(7));
}

#[cfg(feature = "user")]
#[test]
fn process_name_is_prefix_of_task_name() {
	let mut fx_comm = [0u8; TASK_COMM_LEN];
	fx_comm[..4].copy_from_slice(b"curl");
	let fx_event = TrafficEvent {
		pid: 4321,
		direction: DIRECTION_TRANSMIT,
		_pad: [0u8; 3],
		comm: fx_comm,
		len: 64,
	};

	assert_eq!(fx_event.process_name(), "curl");
}
