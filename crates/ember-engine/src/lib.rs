//! Ember engine crate.
//!
//! Owns the full lifecycle of a GPU rendering context bound to an OS window:
//! adapter/device negotiation, resource + pipeline construction, the per-frame
//! driver with resize recovery, and strictly ordered teardown.

pub mod app;
pub mod device;
pub mod render;
pub mod time;
pub mod window;

pub mod logging;
