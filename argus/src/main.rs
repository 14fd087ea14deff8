mod cli;

use std::sync::atomic::Ordering;

use argus::{new_channel, Capability, Collector, Result, TrafficRecord};
use clap::Parser;
use cli::args::Cli;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_target(false)
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let cli = Cli::parse();
	let capability = Capability::from(cli.capability);

	let mut collector = Collector::load()?;
	let events = collector.take_events_map(capability)?;
	let mut handle = collector.attach(capability)?;
	for point in handle.missing() {
		warn!("partial coverage: {} is unavailable on this kernel", point.program());
	}
	info!("attached {:?} ({} points active)", capability, handle.active().len());

	let (record_tx, record_rx) = new_channel::<TrafficRecord>("traffic_record");
	let lost = argus::spawn_readers(events, capability, record_tx)?;

	let printer = tokio::spawn(async move {
		while let Ok(record) = record_rx.recv().await {
			match &record.comm {
				Some(comm) => info!(
					"{} pid={} comm={} len={} cpu={}",
					record.direction, record.pid, comm, record.len, record.cpu
				),
				None => info!("{} pid={} len={} cpu={}", record.direction, record.pid, record.len, record.cpu),
			}
		}
	});

	info!("argus running, ctrl-c to exit");
	tokio::signal::ctrl_c().await?;

	collector.detach(&mut handle)?;
	let dropped = lost.load(Ordering::Relaxed);
	if dropped > 0 {
		warn!("transport dropped {dropped} records during this run");
	}
	printer.abort();
	info!("detached, exiting");

	Ok(())
}
