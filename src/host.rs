//! Deterministic hosts.
//!
//! [`OffscreenHost`] drives simulations without a window or display clock:
//! frames run only when asked with [`OffscreenHost::run_pending_frame`],
//! and signals are delivered synchronously. The window host builds on the
//! same [`ManualScheduler`] and [`ListenerRegistry`].

use std::collections::{HashMap, HashSet};

use crate::driver::{Driver, Environment, FrameRequest, FrameScheduler, Host, ListenerId, Simulation};
use crate::input::{Signal, SignalKind};
use crate::surface::{Canvas, DrawList, Surface, SurfaceId};

/// Bookkeeping for registered listeners.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    live: HashMap<ListenerId, SignalKind>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: SignalKind) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId::new(self.next_id);
        self.live.insert(id, kind);
        id
    }

    /// Returns whether `id` was registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.live.remove(&id).is_some()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Live listeners for one signal kind.
    pub fn count(&self, kind: SignalKind) -> usize {
        self.live.values().filter(|&&k| k == kind).count()
    }
}

/// Frame scheduler whose callbacks run only when the host says so.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: HashSet<FrameRequest>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `request` for execution. Returns `false` if it is not pending.
    pub fn take(&mut self, request: FrameRequest) -> bool {
        self.pending.remove(&request)
    }

    pub fn is_pending(&self, request: FrameRequest) -> bool {
        self.pending.contains(&request)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Total requests issued so far.
    pub fn issued(&self) -> u64 {
        self.next_id
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        let request = FrameRequest::new(self.next_id);
        self.pending.insert(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.pending.remove(&request);
    }
}

/// Headless host owning its surfaces by name.
pub struct OffscreenHost<T: Surface = Canvas> {
    surfaces: HashMap<SurfaceId, T>,
    scheduler: ManualScheduler,
    listeners: ListenerRegistry,
}

impl<T: Surface> Default for OffscreenHost<T> {
    fn default() -> Self {
        Self {
            surfaces: HashMap::new(),
            scheduler: ManualScheduler::new(),
            listeners: ListenerRegistry::new(),
        }
    }
}

impl OffscreenHost<Canvas> {
    /// Host with one raster canvas.
    pub fn with_canvas(id: impl Into<SurfaceId>, width: u32, height: u32) -> Self {
        Self::default().with_surface(id, Canvas::new(width, height))
    }
}

impl OffscreenHost<DrawList> {
    /// Host with one recording surface.
    pub fn with_draw_list(id: impl Into<SurfaceId>, width: u32, height: u32) -> Self {
        Self::default().with_surface(id, DrawList::new(width, height))
    }
}

impl<T: Surface> OffscreenHost<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_surface(mut self, id: impl Into<SurfaceId>, surface: T) -> Self {
        self.insert_surface(id, surface);
        self
    }

    pub fn insert_surface(&mut self, id: impl Into<SurfaceId>, surface: T) {
        self.surfaces.insert(id.into(), surface);
    }

    pub fn remove_surface(&mut self, id: &SurfaceId) -> Option<T> {
        self.surfaces.remove(id)
    }

    pub fn get(&self, id: &SurfaceId) -> Option<&T> {
        self.surfaces.get(id)
    }

    pub fn get_mut(&mut self, id: &SurfaceId) -> Option<&mut T> {
        self.surfaces.get_mut(id)
    }

    /// Run the driver's pending frame, if any. Returns whether a frame ran.
    pub fn run_pending_frame<S: Simulation>(&mut self, driver: &mut Driver<S>) -> bool {
        let Some(request) = driver.pending_request() else {
            return false;
        };
        if !self.scheduler.take(request) {
            return false;
        }
        driver.run_frame(self, request)
    }

    /// Run up to `frames` frames, stopping early if the driver pauses.
    pub fn run_frames<S: Simulation>(&mut self, driver: &mut Driver<S>, frames: usize) -> usize {
        (0..frames).take_while(|_| self.run_pending_frame(driver)).count()
    }

    /// Deliver a signal to `driver` synchronously.
    pub fn deliver<S: Simulation>(&mut self, driver: &mut Driver<S>, signal: Signal) {
        driver.handle_signal(self, signal);
    }

    pub fn has_pending_frame(&self) -> bool {
        self.scheduler.has_pending()
    }

    pub fn live_listeners(&self) -> usize {
        self.listeners.len()
    }

    pub fn scheduler(&self) -> &ManualScheduler {
        &self.scheduler
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }
}

impl<T: Surface> FrameScheduler for OffscreenHost<T> {
    fn request_frame(&mut self) -> FrameRequest {
        self.scheduler.request_frame()
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.scheduler.cancel_frame(request);
    }
}

impl<T: Surface> Environment for OffscreenHost<T> {
    fn add_listener(&mut self, kind: SignalKind) -> ListenerId {
        self.listeners.add(kind)
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

impl<T: Surface> Host for OffscreenHost<T> {
    fn surface(&mut self, id: &SurfaceId) -> Option<&mut dyn Surface> {
        self.surfaces.get_mut(id).map(|s| s as &mut dyn Surface)
    }
}
