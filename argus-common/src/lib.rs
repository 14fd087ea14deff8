#![cfg_attr(not(feature = "user"), no_std)]

mod event;

pub use event::*;
