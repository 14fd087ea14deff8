use std::sync::Arc;

use argus_common::Direction;

/// Decoded record handed to the consumer, one per accepted transport event.
///
/// Carries no timestamp and no sequence number; ordering holds only within a
/// single `cpu` stream and deduplication is the consumer's business.
#[derive(Debug, Clone)]
pub struct TrafficRecord {
	pub pid: u32,
	/// Task short name. `None` for legacy transmit records, which carry no comm.
	pub comm: Option<Arc<str>>,
	pub len: u64,
	pub direction: Direction,
	/// CPU whose ring delivered the record.
	pub cpu: u32,
}
