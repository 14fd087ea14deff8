use aya::{
	maps::{perf::AsyncPerfEventArray, MapData},
	programs::{kprobe::KProbeLinkId, trace_point::TracePointLinkId, KProbe, ProgramError, TracePoint},
	Ebpf,
};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Which record shape and attachment set a deployment runs with. Selected
/// once at attach time; the two shapes never share a map and are never mixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
	/// Kprobes on the transmit and receive entry functions. Full coverage,
	/// but tied to internal kernel symbols that are not a stable contract.
	TxRx,
	/// The `net:net_dev_xmit` tracepoint. Stable ABI, transmit only, and the
	/// records carry no task name.
	TxOnly,
}

/// A single kernel attachment site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbePoint {
	TransmitEntry,
	ReceiveEntry,
	TransmitTracepoint,
}

impl ProbePoint {
	/// Name of the eBPF program implementing this point; for the kprobe
	/// points it doubles as the target kernel symbol.
	pub fn program(&self) -> &'static str {
		match self {
			Self::TransmitEntry => "dev_queue_xmit",
			Self::ReceiveEntry => "netif_receive_skb",
			Self::TransmitTracepoint => "net_dev_xmit",
		}
	}
}

impl Capability {
	pub fn points(&self) -> &'static [ProbePoint] {
		match self {
			Self::TxRx => &[ProbePoint::TransmitEntry, ProbePoint::ReceiveEntry],
			Self::TxOnly => &[ProbePoint::TransmitTracepoint],
		}
	}

	/// Perf map carrying this capability's records.
	pub fn map_name(&self) -> &'static str {
		match self {
			Self::TxRx => "TRAFFIC_EVENTS",
			Self::TxOnly => "XMIT_EVENTS",
		}
	}
}

enum PointLink {
	KProbe(KProbeLinkId),
	TracePoint(TracePointLinkId),
}

/// Live attachment of one capability. Detaching consumes the links; a
/// detached handle can be dropped and the capability re-attached later
/// without reloading the collector or its maps.
pub struct AttachHandle {
	capability: Capability,
	links: Vec<(ProbePoint, PointLink)>,
	missing: Vec<ProbePoint>,
}

impl AttachHandle {
	pub fn capability(&self) -> Capability {
		self.capability
	}

	pub fn active(&self) -> Vec<ProbePoint> {
		self.links.iter().map(|(point, _)| *point).collect()
	}

	/// Points whose kernel target was absent at attach time. Partial
	/// coverage is reported, not escalated; the caller decides.
	pub fn missing(&self) -> &[ProbePoint] {
		&self.missing
	}
}

pub struct Collector {
	ebpf: Ebpf,
}

impl Collector {
	/// Load the embedded eBPF object and prepare it for attachment. A
	/// verifier rejection surfaces here and is fatal; the fix is new probe
	/// code, not a retry.
	pub fn load() -> Result<Self> {
		// Bump the memlock rlimit. This is needed for older kernels that don't use the
		// new memcg based accounting, see https://lwn.net/Articles/837122/
		let rlim = libc::rlimit {
			rlim_cur: libc::RLIM_INFINITY,
			rlim_max: libc::RLIM_INFINITY,
		};
		let ret = unsafe { libc::setrlimit(libc::RLIMIT_MEMLOCK, &rlim) };
		if ret != 0 {
			debug!("remove limit on locked memory failed, ret is: {ret}");
		}

		let mut ebpf = Ebpf::load(aya::include_bytes_aligned!(concat!(env!("OUT_DIR"), "/argus")))?;
		if let Err(e) = aya_log::EbpfLogger::init(&mut ebpf) {
			// This can happen if you remove all log statements from your eBPF program.
			warn!("failed to initialize eBPF logger: {e}");
		}

		Ok(Self { ebpf })
	}

	/// Attach every point of `capability`. A point whose kernel target is
	/// absent (version skew) is skipped and reported via the handle; the
	/// other points are unaffected. All points absent is an error.
	pub fn attach(&mut self, capability: Capability) -> Result<AttachHandle> {
		let mut links = Vec::new();
		let mut missing = Vec::new();

		for &point in capability.points() {
			match self.attach_point(point)? {
				Some(link) => links.push((point, link)),
				None => missing.push(point),
			}
		}

		if links.is_empty() {
			return Err(Error::NoActivePoints);
		}

		Ok(AttachHandle {
			capability,
			links,
			missing,
		})
	}

	fn attach_point(&mut self, point: ProbePoint) -> Result<Option<PointLink>> {
		match point {
			ProbePoint::TransmitEntry | ProbePoint::ReceiveEntry => {
				let program: &mut KProbe = self
					.ebpf
					.program_mut(point.program())
					.ok_or(Error::EbpfProgNotFound(point.program()))?
					.try_into()?;
				load_once(program.load())?;
				match program.attach(point.program(), 0) {
					Ok(link) => Ok(Some(PointLink::KProbe(link))),
					Err(err) => {
						warn!("kprobe target {} unavailable on this kernel: {err}", point.program());
						Ok(None)
					}
				}
			}
			ProbePoint::TransmitTracepoint => {
				let program: &mut TracePoint = self
					.ebpf
					.program_mut(point.program())
					.ok_or(Error::EbpfProgNotFound(point.program()))?
					.try_into()?;
				load_once(program.load())?;
				match program.attach("net", "net_dev_xmit") {
					Ok(link) => Ok(Some(PointLink::TracePoint(link))),
					Err(err) => {
						warn!("tracepoint net:net_dev_xmit unavailable on this kernel: {err}");
						Ok(None)
					}
				}
			}
		}
	}

	/// Detach every point still held by `handle`. Idempotent; safe while
	/// readers keep polling the maps, and attachment-order independent.
	pub fn detach(&mut self, handle: &mut AttachHandle) -> Result<()> {
		for (point, link) in handle.links.drain(..) {
			match link {
				PointLink::KProbe(id) => {
					let program: &mut KProbe = self
						.ebpf
						.program_mut(point.program())
						.ok_or(Error::EbpfProgNotFound(point.program()))?
						.try_into()?;
					program.detach(id)?;
				}
				PointLink::TracePoint(id) => {
					let program: &mut TracePoint = self
						.ebpf
						.program_mut(point.program())
						.ok_or(Error::EbpfProgNotFound(point.program()))?
						.try_into()?;
					program.detach(id)?;
				}
			}
			debug!("detached {}", point.program());
		}
		Ok(())
	}

	/// Take ownership of the perf map feeding `capability`. The map outlives
	/// attach/detach cycles, so readers keep their rings across them.
	pub fn take_events_map(&mut self, capability: Capability) -> Result<AsyncPerfEventArray<MapData>> {
		let map = self
			.ebpf
			.take_map(capability.map_name())
			.ok_or(Error::EbpfMapNotFound(capability.map_name()))?;
		Ok(AsyncPerfEventArray::try_from(map)?)
	}
}

/// Re-attaching after a detach hits the already-loaded program again;
/// that is the expected path, not a failure.
fn load_once(res: core::result::Result<(), ProgramError>) -> Result<()> {
	match res {
		Ok(()) | Err(ProgramError::AlreadyLoaded) => Ok(()),
		Err(err) => Err(err.into()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn capability_points_never_mix_shapes() {
		// -- Exec
		let canonical = Capability::TxRx.points();
		let legacy = Capability::TxOnly.points();

		// -- Check
		assert_eq!(canonical, &[ProbePoint::TransmitEntry, ProbePoint::ReceiveEntry]);
		assert_eq!(legacy, &[ProbePoint::TransmitTracepoint]);
		for point in canonical {
			assert!(!legacy.contains(point));
		}
	}

	#[test]
	fn capability_maps_are_distinct() {
		assert_eq!(Capability::TxRx.map_name(), "TRAFFIC_EVENTS");
		assert_eq!(Capability::TxOnly.map_name(), "XMIT_EVENTS");
		assert_ne!(Capability::TxRx.map_name(), Capability::TxOnly.map_name());
	}

	#[test]
	fn probe_points_name_their_programs() {
		assert_eq!(ProbePoint::TransmitEntry.program(), "dev_queue_xmit");
		assert_eq!(ProbePoint::ReceiveEntry.program(), "netif_receive_skb");
		assert_eq!(ProbePoint::TransmitTracepoint.program(), "net_dev_xmit");
	}
}
