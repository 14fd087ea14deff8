//! Userspace side of the traffic attribution pipeline: loads the eBPF
//! object, attaches the selected capability's hooks, and drains the per-CPU
//! perf channels into decoded [`TrafficRecord`]s.
//!
//! The library guarantees per-CPU FIFO ordering of the records it delivers
//! and nothing about cross-CPU interleaving. Records lost to a full ring are
//! counted in aggregate, never surfaced per-event.

mod error;
mod event;
mod probe;
mod worker;

pub use self::error::{Error, Result};
pub use self::event::{new_channel, Rx, TrafficRecord, Tx};
pub use self::probe::{AttachHandle, Capability, Collector, ProbePoint};
pub use self::worker::spawn_readers;
