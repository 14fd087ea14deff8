use std::sync::{
	atomic::{AtomicU64, Ordering},
	Arc,
};

use aya::{
	maps::{
		perf::{AsyncPerfEventArray, AsyncPerfEventArrayBuffer},
		MapData,
	},
	util::online_cpus,
};
use bytes::BytesMut;
use tracing::{debug, warn};
use zerocopy::FromBytes;

use argus_common::{Direction, TrafficEvent, XmitEvent};

use crate::{
	event::{TrafficRecord, Tx},
	probe::Capability,
	Error, Result,
};

const READ_BATCH: usize = 10;
const READ_BUF_CAPACITY: usize = 1024;

/// Spawn one reader task per online CPU over `events`. Each task drains its
/// CPU's ring in FIFO order and forwards decoded records to `tx`; no ordering
/// exists across tasks. Returns the shared counter of records the kernel
/// dropped on full rings — the only signal overload produces.
pub fn spawn_readers(
	mut events: AsyncPerfEventArray<MapData>,
	capability: Capability,
	tx: Tx<TrafficRecord>,
) -> Result<Arc<AtomicU64>> {
	let lost = Arc::new(AtomicU64::new(0));
	let cpus = online_cpus().map_err(|(_, err)| Error::Io(err))?;
	debug!("spawning perf readers for {} cpus", cpus.len());

	for cpu in cpus {
		let buf = events.open(cpu, None)?;
		let reader = CpuReader {
			capability,
			cpu,
			buf,
			tx: tx.clone(),
			lost: Arc::clone(&lost),
		};
		tokio::spawn(async move {
			if let Err(err) = reader.run().await {
				warn!("cpu reader stopped: {err}");
			}
		});
	}

	Ok(lost)
}

struct CpuReader {
	capability: Capability,
	cpu: u32,
	buf: AsyncPerfEventArrayBuffer<MapData>,
	tx: Tx<TrafficRecord>,
	lost: Arc<AtomicU64>,
}

impl CpuReader {
	async fn run(mut self) -> Result<()> {
		let mut buffers = (0..READ_BATCH)
			.map(|_| BytesMut::with_capacity(READ_BUF_CAPACITY))
			.collect::<Vec<_>>();

		loop {
			let events = self.buf.read_events(&mut buffers).await?;

			if events.lost > 0 {
				let total = self.lost.fetch_add(events.lost as u64, Ordering::Relaxed) + events.lost as u64;
				warn!("cpu {}: ring full, {} records dropped ({total} total)", self.cpu, events.lost);
			}

			for buf in buffers.iter().take(events.read) {
				match decode_record(self.capability, self.cpu, buf) {
					Ok(record) => self.tx.send(record).await?,
					Err(err) => debug!("cpu {}: discarding undecodable record: {err}", self.cpu),
				}
			}
		}
	}
}

/// View one raw ring sample as the capability's record shape. The two shapes
/// come from different maps, so a reader only ever decodes the shape its
/// capability selected.
pub(crate) fn decode_record(capability: Capability, cpu: u32, data: &[u8]) -> Result<TrafficRecord> {
	match capability {
		Capability::TxRx => {
			let (event, _) = TrafficEvent::read_from_prefix(data).map_err(|_| Error::InvalidEventSize)?;
			let direction = Direction::try_from(event.direction).map_err(Error::UnknownDirection)?;
			let comm = Arc::from(String::from_utf8_lossy(event.comm_prefix()).as_ref());

			Ok(TrafficRecord {
				pid: event.pid,
				comm: Some(comm),
				len: event.len,
				direction,
				cpu,
			})
		}
		Capability::TxOnly => {
			let (event, _) = XmitEvent::read_from_prefix(data).map_err(|_| Error::InvalidEventSize)?;

			Ok(TrafficRecord {
				pid: event.pid,
				comm: None,
				len: event.len,
				direction: Direction::Transmit,
				cpu,
			})
		}
	}
}

#[cfg(test)]
mod tests {
	type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

	use argus_common::{DIRECTION_RECEIVE, TASK_COMM_LEN};
	use zerocopy::IntoBytes;

	use super::*;

	fn fx_traffic_event(pid: u32, direction: u8, name: &[u8], len: u64) -> TrafficEvent {
		let mut comm = [0u8; TASK_COMM_LEN];
		comm[..name.len()].copy_from_slice(name);
		TrafficEvent {
			pid,
			direction,
			_pad: [0u8; 3],
			comm,
			len,
		}
	}

	#[test]
	fn decode_canonical_record_ok() -> Result<()> {
		// -- Setup & Fixtures
		let fx_event = fx_traffic_event(4321, DIRECTION_RECEIVE, b"curl", 1448);

		// -- Exec
		let record = decode_record(Capability::TxRx, 2, fx_event.as_bytes())?;

		// -- Check
		assert_eq!(record.pid, 4321);
		assert_eq!(record.comm.as_deref(), Some("curl"));
		assert_eq!(record.len, 1448);
		assert_eq!(record.direction, Direction::Receive);
		assert_eq!(record.cpu, 2);

		Ok(())
	}

	#[test]
	fn decode_legacy_record_is_always_transmit() -> Result<()> {
		// -- Setup & Fixtures
		let fx_event = XmitEvent {
			pid: 77,
			_pad: [0u8; 4],
			len: 60,
		};

		// -- Exec
		let record = decode_record(Capability::TxOnly, 0, fx_event.as_bytes())?;

		// -- Check
		assert_eq!(record.pid, 77);
		assert_eq!(record.comm, None);
		assert_eq!(record.len, 60);
		assert_eq!(record.direction, Direction::Transmit);

		Ok(())
	}

	#[test]
	fn decode_rejects_truncated_sample() {
		let fx_bytes = [0u8; 8];

		let res = decode_record(Capability::TxRx, 0, &fx_bytes);

		assert!(matches!(res, Err(Error::InvalidEventSize)));
	}

	#[test]
	fn decode_rejects_unknown_direction() {
		let fx_event = fx_traffic_event(1, 9, b"sshd", 100);

		let res = decode_record(Capability::TxRx, 1, fx_event.as_bytes());

		assert!(matches!(res, Err(Error::UnknownDirection(9))));
	}

	#[test]
	fn decode_keeps_full_width_comm() -> Result<()> {
		// A task name of exactly sixteen bytes arrives with no NUL terminator.
		let fx_event = fx_traffic_event(9, DIRECTION_RECEIVE, b"0123456789abcdef", 1);

		let record = decode_record(Capability::TxRx, 0, fx_event.as_bytes())?;

		assert_eq!(record.comm.as_deref(), Some("0123456789abcdef"));
		Ok(())
	}
}
