#![no_std]
#![no_main]

use argus_common::{TrafficEvent, XmitEvent, DIRECTION_RECEIVE, DIRECTION_TRANSMIT, TASK_COMM_LEN};
use aya_ebpf::{
	helpers::{bpf_get_current_comm, bpf_get_current_pid_tgid, bpf_probe_read_kernel},
	macros::{kprobe, map, tracepoint},
	maps::PerfEventArray,
	programs::{ProbeContext, TracePointContext},
};
use aya_log_ebpf::error;
mod vmlinux;
use vmlinux::sk_buff;

#[map]
static TRAFFIC_EVENTS: PerfEventArray<TrafficEvent> = PerfEventArray::new(0);

#[map]
static XMIT_EVENTS: PerfEventArray<XmitEvent> = PerfEventArray::new(0);

// net:net_dev_xmit context after the 8-byte common header:
//   8: skbaddr (void *)
//  16: len (unsigned int)
//  20: rc (int)
const NET_DEV_XMIT_LEN_OFFSET: usize = 16;

macro_rules! try_read {
	($ctx:expr, $offset:expr) => {
		match $ctx.read_at($offset) {
			Ok(val) => val,
			Err(_) => return Err(1),
		}
	};
}

#[kprobe]
pub fn dev_queue_xmit(ctx: ProbeContext) -> u32 {
	match try_skb_event(ctx, DIRECTION_TRANSMIT) {
		Ok(ret) => ret,
		Err(ret) => ret,
	}
}

#[kprobe]
pub fn netif_receive_skb(ctx: ProbeContext) -> u32 {
	match try_skb_event(ctx, DIRECTION_RECEIVE) {
		Ok(ret) => ret,
		Err(ret) => ret,
	}
}

#[tracepoint]
pub fn net_dev_xmit(ctx: TracePointContext) -> u32 {
	match try_net_dev_xmit(ctx) {
		Ok(ret) => ret,
		Err(ret) => ret,
	}
}

fn try_skb_event(ctx: ProbeContext, direction: u8) -> Result<u32, u32> {
	let skb: *const sk_buff = ctx.arg(0).ok_or(1u32)?;

	// Length of the in-flight buffer at this hook site, not any other.
	let len: u32 = match unsafe { bpf_probe_read_kernel(&(*skb).len) } {
		Ok(len) => len,
		Err(_) => {
			error!(&ctx, "couldn't read skb length");
			return Err(2);
		}
	};

	let tgid = (bpf_get_current_pid_tgid() >> 32) as u32;
	let comm = bpf_get_current_comm().unwrap_or([0u8; TASK_COMM_LEN]);

	let event = TrafficEvent {
		pid: tgid,
		direction,
		_pad: [0u8; 3],
		comm,
		len: len as u64,
	};

	TRAFFIC_EVENTS.output(&ctx, &event, 0);

	Ok(0)
}

fn try_net_dev_xmit(ctx: TracePointContext) -> Result<u32, u32> {
	let len: u32 = unsafe { try_read!(ctx, NET_DEV_XMIT_LEN_OFFSET) };
	let tgid = (bpf_get_current_pid_tgid() >> 32) as u32;

	let event = XmitEvent {
		pid: tgid,
		_pad: [0u8; 4],
		len: len as u64,
	};

	XMIT_EVENTS.output(&ctx, &event, 0);

	Ok(0)
}

#[cfg(not(test))]
#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
	loop {}
}

#[link_section = "license"]
#[no_mangle]
static LICENSE: [u8; 13] = *b"Dual MIT/GPL\0";
