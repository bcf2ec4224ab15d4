//! GPU device + surface management.
//!
//! This module is responsible for:
//! - negotiating the wgpu Instance/Adapter/Device/Queue against a window surface
//! - configuring the surface (swapchain) and recovering from resize
//! - acquiring per-frame textures and encoders
//! - queuing asynchronously reported device errors for the main thread

mod errors;
mod frame;
mod gpu;
mod init;
mod surface;

pub use errors::{DeviceError, DeviceErrorKind, ErrorSink};
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::{required_limits, GpuInit};
pub use surface::SurfaceErrorAction;
