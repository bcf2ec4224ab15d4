//! Window + event pump.
//!
//! Owns the `winit` EventLoop and drives it in pump mode so the application
//! can keep a poll-style tick loop instead of surrendering control to a
//! callback-driven run loop.

mod pump;

pub use pump::{EventPump, WindowConfig};
