use std::sync::Arc;

use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use crate::config::AppConfig;

/// The sample's window: creation, close flag, aspect ratio, and presentation.
pub struct AppWindow {
    window: Arc<Window>,
    close_requested: bool,
}

impl AppWindow {
    /// Opens a window with the configured title and logical size.
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &AppConfig,
    ) -> Result<Self, winit::error::OsError> {
        let attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width, config.height));

        let window = Arc::new(event_loop.create_window(attrs)?);

        Ok(Self {
            window,
            close_requested: false,
        })
    }

    /// Shared handle for surface creation.
    pub fn handle(&self) -> Arc<Window> {
        Arc::clone(&self.window)
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn should_close(&self) -> bool {
        self.close_requested
    }

    /// Width over height of the drawable area, or `None` while it has no area.
    pub fn aspect_ratio(&self) -> Option<f32> {
        let size = self.window.inner_size();
        (size.width > 0 && size.height > 0).then(|| size.width as f32 / size.height as f32)
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// Presents a finished frame and asks for the next one.
    pub fn present(&self, frame: wgpu::SurfaceTexture) {
        self.window.pre_present_notify();
        frame.present();
        self.window.request_redraw();
    }
}
