//! Application lifecycle owner + frame driver.
//!
//! `App` owns the window, the GPU context and every GPU resource, enforces
//! the creation order (window → context → buffers/textures → pipeline →
//! bindings) and the strict reverse teardown order, and exposes a simple
//! run/terminate contract to `main`.

mod anim;
mod lifecycle;
mod scene;

pub use anim::ClearAnimation;
pub use lifecycle::{App, AppConfig};
pub use scene::Scene;
