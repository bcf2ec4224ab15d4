use anyhow::{Context, Result};
use raw_window_handle::{HasWindowHandle, RawWindowHandle};
use wgpu::SurfaceError;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::errors::ErrorSink;
use super::frame::GpuFrame;
use super::init::{required_limits, GpuInit};
use super::surface::{
    choose_alpha_mode, choose_surface_format, classify_surface_error, SurfaceErrorAction,
};

/// Owns the wgpu core objects and the surface configuration.
///
/// This type is the low-level rendering context:
/// - negotiates Instance/Adapter/Device/Queue against the window's surface
/// - creates and configures the Surface (swapchain)
/// - acquires frames and submits/presents them
///
/// Teardown is ordering-sensitive: the surface must be released strictly
/// before the device. Some backends abort the process when a configured
/// surface outlives its device, so the release is programmed explicitly in
/// [`Gpu::release`] instead of being left to field drop order.
pub struct Gpu<'w> {
    // Declaration order is drop order; keep it the reverse of creation.
    // `surface` and `device` are taken by hand first, see `release`.
    queue: wgpu::Queue,
    device: Option<wgpu::Device>,
    surface: Option<wgpu::Surface<'w>>,
    adapter: wgpu::Adapter,
    instance: wgpu::Instance,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,
}

impl<'w> Gpu<'w> {
    /// Creates a GPU context bound to a window.
    ///
    /// Each step is a hard failure that aborts the remaining ones; there is no
    /// partial-success mode. Adapter/device acquisition is asynchronous under
    /// wgpu and the caller is expected to block on this future
    /// (`pollster::block_on`).
    ///
    /// `errors` receives uncaptured device errors from the asynchronous
    /// callback; the caller owns draining it.
    pub async fn new(window: &'w Window, init: GpuInit, errors: ErrorSink) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(size.width > 0 && size.height > 0, "window has zero size");

        // Use all backends to allow wgpu to select the optimal platform backend.
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        log::info!("presentation target: {}", surface_target_name(window));

        // Surface lifetime is tied to `window` via `'w`.
        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        // Blocks until the async adapter request resolves. "No adapter" is the
        // normal failure path on headless machines.
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter for this surface")?;

        let info = adapter.get_info();
        log::info!(
            "adapter: {} ({:?} / {:?})",
            info.name,
            info.device_type,
            info.backend
        );
        log::debug!("adapter features: {:?}", adapter.features());

        let supported = adapter.limits();
        log::debug!(
            "adapter limits: max_buffer_size={} max_vertex_attributes={} max_bind_groups={}",
            supported.max_buffer_size,
            supported.max_vertex_attributes,
            supported.max_bind_groups
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("ember device"),
                required_features: wgpu::Features::empty(),
                required_limits: required_limits(supported),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        // Uncaptured errors arrive asynchronously, possibly on a driver
        // thread; queue them for the per-tick drain on the main thread.
        let sink = errors.clone();
        device.on_uncaptured_error(std::sync::Arc::new(move |error: wgpu::Error| sink.push(error.into())));

        // Device loss is fatal to the session; there is no re-creation path.
        device.set_device_lost_callback(|reason, message| {
            log::error!("wgpu device lost: {reason:?} ({message})");
        });

        // Fires once all currently queued work completes; nothing has been
        // submitted yet, so this confirms the queue is alive.
        queue.on_submitted_work_done(|| log::debug!("initial queued work completed"));

        let caps = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&caps.formats, init.prefer_srgb)
            .context("surface reports no supported formats")?;
        let alpha_mode = choose_alpha_mode(&caps.alpha_modes, init.alpha_mode);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: init.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
        };
        surface.configure(&device, &config);

        Ok(Gpu {
            queue,
            device: Some(device),
            surface: Some(surface),
            adapter,
            instance,
            config,
            size,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns the current drawable size (physical pixels).
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn device(&self) -> &wgpu::Device {
        // Present for the whole public lifetime of `Gpu`; only `release` takes it.
        self.device.as_ref().expect("device already released")
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    fn surface(&self) -> &wgpu::Surface<'w> {
        self.surface.as_ref().expect("surface already released")
    }

    /// Reconfigures the surface after a resize.
    ///
    /// wgpu cannot configure a 0x0 surface; in that case only internal state
    /// is updated and configuration is deferred to the next non-zero resize.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            self.size = new_size;
            return;
        }

        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface().configure(self.device(), &self.config);
    }

    /// Acquires the next surface texture and creates an encoder for the tick.
    pub fn begin_frame(&self) -> std::result::Result<GpuFrame, SurfaceError> {
        let surface_texture = self.surface().get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let encoder = self
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("ember frame encoder"),
            });

        Ok(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }

    /// Submits the recorded commands for the given frame and presents it.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;

        self.queue.submit(std::iter::once(encoder.finish()));

        // The view must be released before the texture it was created from.
        drop(view);
        surface_texture.present();
    }

    /// Converts a `SurfaceError` into a higher-level action.
    ///
    /// Stale surfaces (resize in flight) are reconfigured for the window's
    /// *current* size and the frame is skipped; this is expected during
    /// interactive resize and is not an error. Every other acquisition error,
    /// out-of-memory included, costs at most the current frame; the run loop
    /// keeps ticking.
    pub fn handle_surface_error(
        &mut self,
        err: SurfaceError,
        current_size: PhysicalSize<u32>,
    ) -> SurfaceErrorAction {
        let action = classify_surface_error(&err);
        if action == SurfaceErrorAction::Reconfigured {
            self.resize(current_size);
        }
        action
    }

    /// Releases the surface and device, in that order. Idempotent.
    fn release(&mut self) {
        if let Some(surface) = self.surface.take() {
            drop(surface);
        }
        if let Some(device) = self.device.take() {
            drop(device);
        }
    }
}

impl Drop for Gpu<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Names the platform surface target the window exposes.
///
/// The graphics backend picks this up from the window's raw handle; the switch
/// here is diagnostic only.
fn surface_target_name(window: &Window) -> &'static str {
    match window.window_handle().map(|h| h.as_raw()) {
        Ok(RawWindowHandle::Xlib(_)) => "x11 (xlib)",
        Ok(RawWindowHandle::Xcb(_)) => "x11 (xcb)",
        Ok(RawWindowHandle::Wayland(_)) => "wayland",
        Ok(RawWindowHandle::AppKit(_)) => "appkit",
        Ok(RawWindowHandle::Win32(_)) => "win32",
        Ok(RawWindowHandle::Web(_)) => "browser canvas",
        _ => "unknown",
    }
}
