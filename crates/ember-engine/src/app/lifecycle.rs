use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::device::{ErrorSink, GpuInit, SurfaceErrorAction};
use crate::render::Uniforms;
use crate::time::FrameClock;
use crate::window::{EventPump, WindowConfig};

use super::anim::ClearAnimation;
use super::scene::Scene;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub gpu: GpuInit,
    /// Gamma correction exponent applied in the fragment shader.
    pub gamma: f32,
    /// Constant color multiplier uploaded with the per-frame uniforms.
    pub tint: [f32; 4],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            gpu: GpuInit::default(),
            gamma: 2.2,
            tint: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// The scene borrows the window for its presentation surface; tying both into
/// one cell gives the pair a single owner and a single teardown point.
#[self_referencing]
struct GfxEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    scene: Scene<'this>,
}

/// Lifecycle owner.
///
/// Owns the event pump, the window and the whole GPU aggregate. Construction
/// order is fixed (window → context → buffers/texture → pipeline → bindings);
/// teardown runs in exact reverse, and `terminate` is idempotent.
pub struct App {
    pump: EventPump,
    gfx: Option<GfxEntry>,
    errors: ErrorSink,
    animation: ClearAnimation,
    clock: FrameClock,
    gamma: f32,
    tint: [f32; 4],
    initialized: bool,
    terminated: bool,
}

impl App {
    /// Initializes the window and the complete GPU aggregate.
    ///
    /// Any failure short-circuits the remaining steps; the caller must not
    /// enter the run loop on `Err`. Device errors queued by asynchronous
    /// callbacks during initialization also count as failure.
    pub fn new(config: AppConfig) -> Result<Self> {
        let mut pump = EventPump::new(config.window)?;
        let window = pump.wait_for_window()?;

        let errors = ErrorSink::new();
        let sink = errors.clone();
        let gpu_init = config.gpu;

        let gfx = GfxEntryTryBuilder {
            window,
            scene_builder: |window| pollster::block_on(Scene::new(window, gpu_init, sink)),
        }
        .try_build()
        .context("failed to initialize the GPU scene")?;

        // Callbacks may resolve before the main loop starts; anything queued
        // by now is an initialization failure, not a runtime hiccup.
        if errors.drain_with(|e| log::error!("{e}")) {
            anyhow::bail!("device errors reported during initialization");
        }

        let size = gfx.borrow_window().inner_size();
        log::info!("initialized ({}x{})", size.width, size.height);

        Ok(Self {
            pump,
            gfx: Some(gfx),
            errors,
            animation: ClearAnimation::default(),
            clock: FrameClock::new(),
            gamma: config.gamma,
            tint: config.tint,
            initialized: true,
            terminated: false,
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_running(&self) -> bool {
        self.initialized && !self.terminated && !self.pump.close_requested()
    }

    /// Drives one frame: poll events, recover or render, submit, present,
    /// then drain queued device errors.
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }

        self.pump.poll();
        if self.pump.close_requested() {
            return;
        }

        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };

        if let Some(new_size) = self.pump.take_resize() {
            gfx.with_scene_mut(|scene| scene.gpu_mut().resize(new_size));
        }

        let ft = self.clock.tick();
        if ft.dt > 0.1 {
            log::debug!("slow frame {}: {:.1} ms", ft.frame_index, ft.dt * 1000.0);
        }

        self.animation.advance();
        let clear = self.animation.clear_color();
        let (gamma, tint) = (self.gamma, self.tint);

        let mut reconfigured = false;

        gfx.with_mut(|fields| {
            let scene = fields.scene;

            let mut frame = match scene.gpu().begin_frame() {
                Ok(frame) => frame,
                Err(err) => {
                    // Re-query the size: the stale surface usually means the
                    // window changed under us.
                    let detail = err.to_string();
                    let severe = matches!(err, wgpu::SurfaceError::OutOfMemory);
                    let current = fields.window.inner_size();
                    match scene.gpu_mut().handle_surface_error(err, current) {
                        SurfaceErrorAction::Reconfigured => {
                            log::info!("surface reconfigured; skipping frame");
                            reconfigured = true;
                        }
                        SurfaceErrorAction::SkipFrame if severe => {
                            log::error!("surface error; skipping frame: {detail}");
                        }
                        SurfaceErrorAction::SkipFrame => {
                            log::warn!("transient surface error; skipping frame: {detail}");
                        }
                    }
                    return;
                }
            };

            let uniforms = Uniforms::new(aspect(fields.window.inner_size()), gamma, tint);
            scene.render(&mut frame, clear, &uniforms);
            scene.gpu().submit(frame);
        });

        if reconfigured {
            self.clock.reset();
        }

        self.errors.drain_with(|e| log::error!("{e}"));
    }

    /// Tears everything down in reverse creation order. Idempotent: repeated
    /// calls are no-ops and nothing is released twice.
    pub fn terminate(&mut self) {
        if self.terminated {
            return;
        }

        // Dropping the entry releases the scene before the window it borrows;
        // within the scene, resources drop in reverse creation order and the
        // surface goes before the device.
        self.gfx = None;

        self.initialized = false;
        self.terminated = true;
        log::debug!("terminated");
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.terminate();
    }
}

fn aspect(size: PhysicalSize<u32>) -> f32 {
    size.width.max(1) as f32 / size.height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_guards_zero_dimensions() {
        assert_eq!(aspect(PhysicalSize::new(0, 0)), 1.0);
        assert_eq!(aspect(PhysicalSize::new(1280, 720)), 1280.0 / 720.0);
    }
}
