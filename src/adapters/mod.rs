//! Driven adapters — implementations of the port traits over real
//! peripherals and host facilities.

pub mod hardware;
#[cfg(feature = "serial")]
pub mod serial;
pub mod ui_log;
