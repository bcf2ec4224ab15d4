//! Time subsystem.
//!
//! Provides stable, testable frame timing without coupling to the runtime.
//! One `FrameClock` per run loop; call `tick()` once per frame.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
