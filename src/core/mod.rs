//! Throttle, clock and error types shared by every surface.

pub mod error;
pub mod throttle;
pub mod time;
