//! Live window host.
//!
//! Runs a [`Driver`] inside a winit window. The simulation draws into a
//! window-sized [`Canvas`], which the [`Presenter`] shows each frame.
//!
//! Window events map onto driver signals; in addition `Space` toggles
//! pause and `Escape` or closing the window destroys the driver and exits.

use std::sync::Arc;

use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::driver::{Driver, Environment, FrameRequest, FrameScheduler, Host, ListenerId, Simulation};
use crate::error::RunError;
use crate::gpu::Presenter;
use crate::host::{ListenerRegistry, ManualScheduler};
use crate::input::{Signal, SignalKind, Viewport};
use crate::surface::{Canvas, Surface, SurfaceId};

const WINDOW_SURFACE: &str = "window";

#[derive(Debug, Clone)]
pub struct WindowOptions {
    pub title: String,
    /// Initial logical size.
    pub width: u32,
    pub height: u32,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "particle-field".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Host side of a window: the canvas plus frame and listener bookkeeping.
struct WindowHost {
    id: SurfaceId,
    canvas: Canvas,
    scheduler: ManualScheduler,
    listeners: ListenerRegistry,
}

impl FrameScheduler for WindowHost {
    fn request_frame(&mut self) -> FrameRequest {
        self.scheduler.request_frame()
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.scheduler.cancel_frame(request);
    }
}

impl Environment for WindowHost {
    fn add_listener(&mut self, kind: SignalKind) -> ListenerId {
        self.listeners.add(kind)
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

impl Host for WindowHost {
    fn surface(&mut self, id: &SurfaceId) -> Option<&mut dyn Surface> {
        (*id == self.id).then_some(&mut self.canvas as &mut dyn Surface)
    }
}

struct App<S: Simulation> {
    options: WindowOptions,
    simulation: Option<S>,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    host: WindowHost,
    driver: Option<Driver<S>>,
    error: Option<RunError>,
}

impl<S: Simulation> App<S> {
    fn new(simulation: S, options: WindowOptions) -> Self {
        Self {
            options,
            simulation: Some(simulation),
            window: None,
            presenter: None,
            host: WindowHost {
                id: SurfaceId::from(WINDOW_SURFACE),
                canvas: Canvas::new(1, 1),
                scheduler: ManualScheduler::new(),
                listeners: ListenerRegistry::new(),
            },
            driver: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RunError> {
        let attributes = Window::default_attributes()
            .with_title(self.options.title.clone())
            .with_inner_size(LogicalSize::new(self.options.width, self.options.height));
        let window = Arc::new(event_loop.create_window(attributes)?);
        let presenter = Presenter::new(window.clone())?;

        if let Some(simulation) = self.simulation.take() {
            let viewport = Viewport::from(window.inner_size());
            let driver = Driver::new(&mut self.host, WINDOW_SURFACE, viewport, simulation);
            self.driver = Some(driver);
        }
        window.request_redraw();
        self.presenter = Some(presenter);
        self.window = Some(window);
        Ok(())
    }

    fn shut_down(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(driver) = self.driver.as_mut() {
            driver.destroy(&mut self.host);
        }
        event_loop.exit();
    }
}

impl<S: Simulation> ApplicationHandler for App<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            error!("failed to open window: {e}");
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let Some(signal) = Signal::from_window_event(&event) {
            if let (Signal::Resized(viewport), Some(presenter)) = (signal, self.presenter.as_mut()) {
                let (width, height) = viewport.pixel_size();
                presenter.resize(width, height);
            }
            if let Some(driver) = self.driver.as_mut() {
                driver.handle_signal(&mut self.host, signal);
            }
        }

        match event {
            WindowEvent::CloseRequested => self.shut_down(event_loop),
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed && !event.repeat => {
                match event.logical_key {
                    Key::Named(NamedKey::Escape) => self.shut_down(event_loop),
                    Key::Named(NamedKey::Space) => {
                        if let Some(driver) = self.driver.as_mut() {
                            if driver.is_running() {
                                driver.pause(&mut self.host);
                            } else {
                                driver.resume(&mut self.host);
                            }
                        }
                    }
                    _ => {}
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(driver) = self.driver.as_mut() else {
                    return;
                };
                let Some(request) = driver.pending_request() else {
                    return;
                };
                if !self.host.scheduler.take(request) || !driver.run_frame(&mut self.host, request) {
                    return;
                }
                let Some(presenter) = self.presenter.as_mut() else {
                    return;
                };
                match presenter.present(&self.host.canvas) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => presenter.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("out of GPU memory, exiting");
                        self.shut_down(event_loop);
                    }
                    Err(e) => warn!("frame skipped: {e}"),
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let running = self.driver.as_ref().is_some_and(|d| d.is_running());
        if let (true, Some(window)) = (running, &self.window) {
            window.request_redraw();
        }
    }
}

/// Open a window and run `simulation` in it until closed.
pub fn run<S: Simulation>(simulation: S, options: WindowOptions) -> Result<(), RunError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    info!("opening {}x{} window", options.width, options.height);
    let mut app = App::new(simulation, options);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
