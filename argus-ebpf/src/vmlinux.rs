//! Kernel types generated from the target kernel's BTF with
//! `aya-tool generate sk_buff`, then trimmed to the types the probes actually
//! dereference (pointer targets the probes never follow are left opaque).
//!
//! This file is a versioned build input, not portable source: regenerate it
//! against the running kernel whenever struct layouts move:
//!
//! ```sh
//! aya-tool generate sk_buff > argus-ebpf/src/vmlinux.rs
//! ```

#![allow(non_camel_case_types, non_snake_case, dead_code)]

pub type __u16 = ::core::ffi::c_ushort;
pub type __u32 = ::core::ffi::c_uint;
pub type __u64 = ::core::ffi::c_ulonglong;
pub type ktime_t = ::core::ffi::c_longlong;

#[repr(C)]
#[derive(Copy, Clone)]
pub struct net_device {
	_unused: [u8; 0],
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct sock {
	_unused: [u8; 0],
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct rb_node {
	pub __rb_parent_color: ::core::ffi::c_ulong,
	pub rb_right: *mut rb_node,
	pub rb_left: *mut rb_node,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct list_head {
	pub next: *mut list_head,
	pub prev: *mut list_head,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct sk_buff {
	pub __bindgen_anon_1: sk_buff__bindgen_ty_1,
	pub __bindgen_anon_2: sk_buff__bindgen_ty_2,
	pub __bindgen_anon_3: sk_buff__bindgen_ty_3,
	pub cb: [::core::ffi::c_char; 48usize],
	pub __bindgen_anon_4: sk_buff__bindgen_ty_4,
	pub _nfct: ::core::ffi::c_ulong,
	pub len: ::core::ffi::c_uint,
	pub data_len: ::core::ffi::c_uint,
	pub mac_len: __u16,
	pub hdr_len: __u16,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub union sk_buff__bindgen_ty_1 {
	pub __bindgen_anon_1: sk_buff__bindgen_ty_1__bindgen_ty_1,
	pub rbnode: rb_node,
	pub list: list_head,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct sk_buff__bindgen_ty_1__bindgen_ty_1 {
	pub next: *mut sk_buff,
	pub prev: *mut sk_buff,
	pub __bindgen_anon_1: sk_buff__bindgen_ty_1__bindgen_ty_1__bindgen_ty_1,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub union sk_buff__bindgen_ty_1__bindgen_ty_1__bindgen_ty_1 {
	pub dev: *mut net_device,
	pub dev_scratch: ::core::ffi::c_ulong,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub union sk_buff__bindgen_ty_2 {
	pub sk: *mut sock,
	pub ip_defrag_offset: ::core::ffi::c_int,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub union sk_buff__bindgen_ty_3 {
	pub tstamp: ktime_t,
	pub skb_mstamp_ns: __u64,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub union sk_buff__bindgen_ty_4 {
	pub __bindgen_anon_1: sk_buff__bindgen_ty_4__bindgen_ty_1,
	pub tcp_tsorted_anchor: list_head,
	pub _sk_redir: ::core::ffi::c_ulong,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct sk_buff__bindgen_ty_4__bindgen_ty_1 {
	pub _skb_refdst: ::core::ffi::c_ulong,
	pub destructor: ::core::option::Option<unsafe extern "C" fn(skb: *mut sk_buff)>,
}
