use glam::Mat4;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::animation::AnimationClock;
use crate::camera::Camera;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::gpu::GpuContext;
use crate::mesh::SphereMesh;
use crate::renderer::SpherePass;
use crate::shader::ShaderProgram;
use crate::sphere::SphereGeometry;
use crate::transform::FrameTransforms;
use crate::window::AppWindow;

/// Run the sample until its window is closed.
///
/// The sphere is generated before the event loop starts, uploaded once the window
/// exists, and then drawn every frame with freshly computed matrices.
///
/// # Example
/// ```no_run
/// use shaded_sphere::{AppConfig, run};
///
/// fn main() -> Result<(), shaded_sphere::AppError> {
///     run(AppConfig::new().subdivisions(32, 16).cycle(3.0))
/// }
/// ```
pub fn run(config: AppConfig) -> Result<(), AppError> {
    config.validate()?;

    let geometry = SphereGeometry::generate(config.radius, config.slices, config.stacks);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = SphereApp {
        state: AppState::Pending { config, geometry },
        error: None,
    };
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct SphereApp {
    state: AppState,
    /// Startup or fatal surface failure raised inside the event loop, returned from `run`.
    error: Option<AppError>,
}

enum AppState {
    Pending {
        config: AppConfig,
        geometry: SphereGeometry,
    },
    Running(Box<Running>),
    Terminated,
}

/// Everything the frame loop touches.
struct Running {
    pass: SpherePass,
    mesh: SphereMesh,
    gpu: GpuContext,
    window: AppWindow,
    clock: AnimationClock,
    camera: Camera,
    /// Constant for the whole run.
    view: Mat4,
    clear_color: wgpu::Color,
}

impl Running {
    fn start(
        event_loop: &ActiveEventLoop,
        config: AppConfig,
        geometry: SphereGeometry,
    ) -> Result<Self, AppError> {
        let window = AppWindow::create(event_loop, &config)?;
        let gpu = GpuContext::new(window.handle())?;

        let shaders = &config.shaders;
        let program = ShaderProgram::load(
            &gpu.device,
            &shaders.vertex_path,
            &shaders.position_attribute,
            &shaders.fragment_path,
            &shaders.fragment_output,
        )?;
        let pass = SpherePass::new(&gpu, &program, shaders)?;
        log::debug!("Uploading matrices: {:?}", pass.uploaded_roles());

        let mesh = SphereMesh::new(&gpu, &geometry)?;
        let [r, g, b, a] = config.clear_color;

        window.request_redraw();

        Ok(Self {
            pass,
            mesh,
            gpu,
            window,
            clock: AnimationClock::new(config.cycle),
            camera: config.camera,
            view: config.camera.view_matrix(),
            clear_color: wgpu::Color { r, g, b, a },
        })
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // nothing to draw into while minimised
        let Some(aspect) = self.window.aspect_ratio() else {
            return Ok(());
        };

        self.pass.ensure_depth_size(&self.gpu);

        let output = self.gpu.surface.get_current_texture()?;
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let transforms = FrameTransforms::compute(self.view, &self.camera, self.clock.phase(), aspect);

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Sphere Encoder"),
            });

        self.pass.render(
            &self.gpu,
            &mut encoder,
            &target,
            self.clear_color,
            &self.mesh,
            &transforms,
        );

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        self.window.present(output);
        Ok(())
    }
}

/// What the frame loop does after `get_current_texture` fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SurfaceRecovery {
    /// Reapply the surface configuration and draw again.
    Reconfigure,
    /// Skip this frame and draw again.
    Retry,
    /// Close the window and return the error from `run`.
    Fatal,
}

impl SurfaceRecovery {
    fn for_error(error: &wgpu::SurfaceError) -> Self {
        match error {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceRecovery::Reconfigure,
            wgpu::SurfaceError::OutOfMemory => SurfaceRecovery::Fatal,
            _ => SurfaceRecovery::Retry,
        }
    }
}

impl ApplicationHandler for SphereApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.state, AppState::Pending { .. }) {
            return;
        }
        let AppState::Pending { config, geometry } =
            std::mem::replace(&mut self.state, AppState::Terminated)
        else {
            return;
        };

        match Running::start(event_loop, config, geometry) {
            Ok(running) => {
                log::info!("Sphere running");
                self.state = AppState::Running(Box::new(running));
            }
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let AppState::Running(running) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                running.window.request_close();
            }
            WindowEvent::Resized(size) => {
                running.gpu.resize(size.width, size.height);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = running.render() {
                    match SurfaceRecovery::for_error(&e) {
                        SurfaceRecovery::Reconfigure => {
                            running.gpu.reconfigure();
                            running.window.request_redraw();
                        }
                        SurfaceRecovery::Retry => {
                            log::warn!("Surface error: {:?}", e);
                            running.window.request_redraw();
                        }
                        SurfaceRecovery::Fatal => {
                            log::error!("Fatal surface error: {}", e);
                            running.window.request_close();
                            self.error = Some(AppError::Surface(e));
                        }
                    }
                }
            }
            _ => {}
        }

        if running.window.should_close() {
            log::info!("Window closed");
            self.state = AppState::Terminated;
            event_loop.exit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_memory_ends_the_run() {
        assert_eq!(
            SurfaceRecovery::for_error(&wgpu::SurfaceError::OutOfMemory),
            SurfaceRecovery::Fatal
        );
    }

    #[test]
    fn lost_and_outdated_surfaces_are_reconfigured() {
        assert_eq!(
            SurfaceRecovery::for_error(&wgpu::SurfaceError::Lost),
            SurfaceRecovery::Reconfigure
        );
        assert_eq!(
            SurfaceRecovery::for_error(&wgpu::SurfaceError::Outdated),
            SurfaceRecovery::Reconfigure
        );
        assert_eq!(
            SurfaceRecovery::for_error(&wgpu::SurfaceError::Timeout),
            SurfaceRecovery::Retry
        );
    }
}
