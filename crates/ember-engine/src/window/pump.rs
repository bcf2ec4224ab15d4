use std::time::Duration;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

/// Window configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "ember".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Non-blocking window-system event pump.
///
/// The window itself is handed to the caller once created (it ends up owned
/// by the GPU aggregate, which borrows it for the surface); the pump keeps
/// recording events for it and exposes them as poll-style queries.
pub struct EventPump {
    event_loop: EventLoop<()>,
    handler: WindowHandler,
}

impl EventPump {
    pub fn new(config: WindowConfig) -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        Ok(Self {
            event_loop,
            handler: WindowHandler::new(config),
        })
    }

    /// Pumps the loop until the window exists, then hands it over.
    pub fn wait_for_window(&mut self) -> Result<Window> {
        loop {
            let status = self
                .event_loop
                .pump_app_events(Some(Duration::from_millis(10)), &mut self.handler);

            if let Some(err) = self.handler.create_error.take() {
                return Err(err);
            }
            if let Some(window) = self.handler.window.take() {
                return Ok(window);
            }
            if self.handler.close_requested || matches!(status, PumpStatus::Exit(_)) {
                anyhow::bail!("event loop exited before a window was created");
            }
        }
    }

    /// Processes pending window-system events without blocking.
    pub fn poll(&mut self) {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.handler);

        if matches!(status, PumpStatus::Exit(_)) {
            self.handler.close_requested = true;
        }
    }

    pub fn close_requested(&self) -> bool {
        self.handler.close_requested
    }

    /// Takes the most recent resize, if any arrived since the last call.
    pub fn take_resize(&mut self) -> Option<PhysicalSize<u32>> {
        self.handler.pending_resize.take()
    }
}

struct WindowHandler {
    config: WindowConfig,
    window: Option<Window>,
    window_id: Option<WindowId>,
    created: bool,
    create_error: Option<anyhow::Error>,
    close_requested: bool,
    pending_resize: Option<PhysicalSize<u32>>,
}

impl WindowHandler {
    fn new(config: WindowConfig) -> Self {
        Self {
            config,
            window: None,
            window_id: None,
            created: false,
            create_error: None,
            close_requested: false,
            pending_resize: None,
        }
    }
}

impl ApplicationHandler for WindowHandler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Suspend/resume cycles must not spawn a second window.
        if self.created {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        match event_loop.create_window(attrs) {
            Ok(window) => {
                self.window_id = Some(window.id());
                self.window = Some(window);
                self.created = true;
            }
            Err(err) => {
                self.create_error =
                    Some(anyhow::Error::new(err).context("failed to create window"));
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if Some(window_id) != self.window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.close_requested = true,
            // Coalesce: only the latest size matters for reconfiguration.
            WindowEvent::Resized(new_size) => self.pending_resize = Some(new_size),
            _ => {}
        }
    }
}
