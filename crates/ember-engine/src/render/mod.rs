//! GPU resource factories + the demo pipeline.
//!
//! Convention:
//! - host geometry is interleaved `f32` data; its attribute layout is
//!   validated before any GPU buffer is created
//! - resources are created once at startup and mutated only through queued
//!   writes (`Queue::write_buffer` / `Queue::write_texture`)

mod mesh;
mod pipeline;
mod texture;
mod uniforms;

pub use mesh::{Mesh, VertexLayout};
pub use pipeline::QuadPipeline;
pub use texture::{checkerboard_pixels, DemoTexture};
pub use uniforms::Uniforms;
