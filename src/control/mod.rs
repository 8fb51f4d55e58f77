//! Closed-loop environmental control.

pub mod dryer;
