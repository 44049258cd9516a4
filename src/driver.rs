//! Render/update loop driver.
//!
//! A [`Driver`] ties a [`Simulation`] to a host. The host supplies three
//! things: a frame scheduler with a request/cancel pair, an environment
//! that tracks signal listeners, and surfaces resolved by name. The driver
//! owns the pointer and viewport state and updates them only from the
//! signals it is handed.
//!
//! The loop has two states. [`LoopState::Running`] holds the frame request
//! that is currently pending; [`LoopState::Paused`] holds none. A frame
//! callback whose request does not match the pending one is ignored, so a
//! callback that was already queued when the driver paused does nothing.
//!
//! ```ignore
//! let mut host = OffscreenHost::with_canvas("backdrop", 800, 600);
//! let mut driver = Driver::new(&mut host, "backdrop", Viewport::new(800.0, 600.0), field);
//! host.run_pending_frame(&mut driver);
//! driver.pause(&mut host);
//! driver.destroy(&mut host);
//! ```

use log::{debug, info, warn};

use crate::input::{PointerState, Signal, SignalKind, Viewport};
use crate::quality::FrameRateMonitor;
use crate::surface::{Surface, SurfaceId};
use crate::time::FrameClock;

/// An entity simulation the driver can run.
pub trait Simulation {
    /// Human-readable name for log lines.
    fn name(&self) -> &'static str;

    /// Signals this simulation consumes. The driver registers one listener
    /// per kind.
    fn signals(&self) -> &'static [SignalKind];

    /// Radius within which the pointer is drawn connected to entities.
    fn pointer_radius(&self) -> f32 {
        0.0
    }

    /// Discard every entity and create a fresh set sized to `viewport`.
    fn rebuild(&mut self, viewport: Viewport);

    /// Advance one frame.
    fn step(&mut self, pointer: &PointerState);

    /// Draw the current frame.
    fn render(&self, surface: &mut dyn Surface, pointer: &PointerState);

    /// Number of live entities.
    fn entity_count(&self) -> usize;
}

/// Handle to one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(u64);

impl FrameRequest {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Next-frame request/cancel pair.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequest;

    /// Cancel a pending request. Cancelling one that already ran is a no-op.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Handle to one registered environment listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Source of pointer, viewport and visibility signals.
pub trait Environment {
    fn add_listener(&mut self, kind: SignalKind) -> ListenerId;
    fn remove_listener(&mut self, id: ListenerId);
}

/// Everything a driver needs from its surroundings.
pub trait Host: FrameScheduler + Environment {
    /// Resolve a surface by name.
    fn surface(&mut self, id: &SurfaceId) -> Option<&mut dyn Surface>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// A frame callback is scheduled.
    Running(FrameRequest),
    /// No frame callback is scheduled.
    Paused,
}

impl LoopState {
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, LoopState::Running(_))
    }
}

/// Drives a simulation frame by frame against a [`Host`].
pub struct Driver<S: Simulation> {
    surface: SurfaceId,
    simulation: S,
    state: LoopState,
    available: bool,
    destroyed: bool,
    listeners: Vec<(SignalKind, ListenerId)>,
    pointer: PointerState,
    viewport: Viewport,
    clock: FrameClock,
    monitor: FrameRateMonitor,
}

impl<S: Simulation> Driver<S> {
    /// Attach `simulation` to the surface named `surface` and start the loop.
    ///
    /// If the host cannot resolve the surface the driver is inert: nothing is
    /// created, no listeners are registered and no frame is scheduled. Check
    /// with [`is_available`](Self::is_available).
    pub fn new<H: Host + ?Sized>(
        host: &mut H,
        surface: impl Into<SurfaceId>,
        viewport: Viewport,
        mut simulation: S,
    ) -> Self {
        let surface = surface.into();
        let pointer = PointerState::new(simulation.pointer_radius());

        let Some(target) = host.surface(&surface) else {
            warn!("{}: surface '{}' not found, staying inert", simulation.name(), surface);
            return Self::assemble(surface, simulation, viewport, pointer, false);
        };
        let (width, height) = viewport.pixel_size();
        target.resize(width, height);
        simulation.rebuild(viewport);

        let mut driver = Self::assemble(surface, simulation, viewport, pointer, true);
        for &kind in driver.simulation.signals() {
            let id = host.add_listener(kind);
            driver.listeners.push((kind, id));
        }
        driver.state = LoopState::Running(host.request_frame());
        info!(
            "{}: started on '{}' at {}x{} with {} entities",
            driver.simulation.name(),
            driver.surface,
            width,
            height,
            driver.simulation.entity_count()
        );
        driver
    }

    fn assemble(surface: SurfaceId, simulation: S, viewport: Viewport, pointer: PointerState, available: bool) -> Self {
        Self {
            surface,
            simulation,
            state: LoopState::Paused,
            available,
            destroyed: false,
            listeners: Vec::new(),
            pointer,
            viewport,
            clock: FrameClock::new(),
            monitor: FrameRateMonitor::default(),
        }
    }

    /// Cancel the pending frame. Entities and listeners are kept.
    pub fn pause<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let LoopState::Running(request) = self.state {
            host.cancel_frame(request);
            self.state = LoopState::Paused;
            info!("{}: paused", self.simulation.name());
        }
    }

    /// Schedule the next frame if paused. No-op on inert or destroyed drivers.
    pub fn resume<H: Host + ?Sized>(&mut self, host: &mut H) {
        if !self.available || self.destroyed || self.state.is_running() {
            return;
        }
        self.clock.resume();
        self.state = LoopState::Running(host.request_frame());
        info!("{}: resumed", self.simulation.name());
    }

    /// Pause and detach every listener. Terminal.
    pub fn destroy<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.destroyed {
            return;
        }
        self.pause(host);
        for (_, id) in self.listeners.drain(..) {
            host.remove_listener(id);
        }
        self.destroyed = true;
        if self.available {
            info!("{}: destroyed", self.simulation.name());
        }
    }

    /// Apply an environment signal. Signals the simulation did not register
    /// for, and all signals after destroy, are ignored.
    pub fn handle_signal<H: Host + ?Sized>(&mut self, host: &mut H, signal: Signal) {
        let kind = signal.kind();
        if !self.listeners.iter().any(|&(k, _)| k == kind) {
            return;
        }
        match signal {
            Signal::PointerMoved(position) => self.pointer.position = Some(position),
            Signal::PointerLeft => self.pointer.position = None,
            Signal::Resized(viewport) => self.resize(host, viewport),
            Signal::VisibilityChanged(true) => self.resume(host),
            Signal::VisibilityChanged(false) => self.pause(host),
        }
    }

    fn resize<H: Host + ?Sized>(&mut self, host: &mut H, viewport: Viewport) {
        self.viewport = viewport;
        let (width, height) = viewport.pixel_size();
        match host.surface(&self.surface) {
            Some(surface) => surface.resize(width, height),
            None => warn!("{}: surface '{}' vanished during resize", self.simulation.name(), self.surface),
        }
        self.simulation.rebuild(viewport);
        info!(
            "{}: rebuilt {} entities for {}x{}",
            self.simulation.name(),
            self.simulation.entity_count(),
            width,
            height
        );
    }

    /// Run the frame callback for `request`: step, render, schedule the next.
    ///
    /// Returns `false` without doing anything if `request` is not the
    /// pending one.
    pub fn run_frame<H: Host + ?Sized>(&mut self, host: &mut H, request: FrameRequest) -> bool {
        if self.state != LoopState::Running(request) {
            return false;
        }

        self.clock.tick();
        self.simulation.step(&self.pointer);
        match host.surface(&self.surface) {
            Some(surface) => self.simulation.render(surface, &self.pointer),
            None => warn!("{}: surface '{}' vanished, frame not drawn", self.simulation.name(), self.surface),
        }
        self.state = LoopState::Running(host.request_frame());

        if self.clock.fps_sampled() {
            debug!(
                "{}: frame {} at {:.1} fps, {} entities",
                self.simulation.name(),
                self.clock.frame(),
                self.clock.fps(),
                self.simulation.entity_count()
            );
        }
        if self.monitor.observe(&self.clock) {
            warn!(
                "{}: frame rate {:.1} fps below {:.0}, consider a reduced quality tier",
                self.simulation.name(),
                self.clock.fps(),
                self.monitor.threshold()
            );
        }
        true
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// The pending frame request, if running.
    pub fn pending_request(&self) -> Option<FrameRequest> {
        match self.state {
            LoopState::Running(request) => Some(request),
            LoopState::Paused => None,
        }
    }

    /// `false` if the surface could not be resolved at construction.
    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn surface_id(&self) -> &SurfaceId {
        &self.surface
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut S {
        &mut self.simulation
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Whether the latest FPS sample was below the low frame rate threshold.
    pub fn low_frame_rate(&self) -> bool {
        self.monitor.is_low()
    }

    /// Listener handles currently registered with the environment.
    pub fn listeners(&self) -> impl Iterator<Item = ListenerId> + '_ {
        self.listeners.iter().map(|&(_, id)| id)
    }
}
