//! Device-facing building blocks: gesture classification and the LED
//! serial protocol.  Pure logic — the actual GPIO/serial capabilities are
//! injected through the port traits in [`crate::app::ports`].

pub mod gesture;
pub mod led_link;
