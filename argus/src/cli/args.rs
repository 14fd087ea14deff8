use argus::Capability;
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "argus")]
pub struct Cli {
	/// Attachment set to run with. `tx-rx` uses the kprobe pair for full
	/// coverage; `tx-only` falls back to the net_dev_xmit tracepoint.
	#[arg(long, value_enum, default_value = "tx-rx")]
	pub capability: CapabilityArg,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum CapabilityArg {
	TxRx,
	TxOnly,
}

impl From<CapabilityArg> for Capability {
	fn from(value: CapabilityArg) -> Self {
		match value {
			CapabilityArg::TxRx => Capability::TxRx,
			CapabilityArg::TxOnly => Capability::TxOnly,
		}
	}
}
