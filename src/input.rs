//! Environment input: pointer, viewport and the signals that update them.
//!
//! Drivers own their [`PointerState`] and [`Viewport`] and only change them
//! when a [`Signal`] is delivered, so several drivers can share one host
//! without cross-talk and tests can feed synthetic sequences.
//!
//! Window hosts translate raw events with [`Signal::from_window_event`]:
//!
//! ```ignore
//! if let Some(signal) = Signal::from_window_event(&event) {
//!     driver.handle_signal(&mut host, signal);
//! }
//! ```

use glam::Vec2;
use winit::event::WindowEvent;

/// Surface-space dimensions, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Dimensions with negative values treated as zero.
    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.max(0.0),
            height: self.height.max(0.0),
        }
    }

    #[inline]
    pub fn is_degenerate(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Whole-pixel dimensions for sizing surfaces.
    #[inline]
    pub fn pixel_size(self) -> (u32, u32) {
        let c = self.clamped();
        (c.width.round() as u32, c.height.round() as u32)
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Viewport {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }
}

/// Latest known pointer position plus the radius it reaches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// `None` when the pointer left the surface or has not moved yet.
    pub position: Option<Vec2>,
    /// Distance within which particles get a line to the pointer.
    pub radius: f32,
}

impl PointerState {
    pub fn new(radius: f32) -> Self {
        Self { position: None, radius }
    }

    /// Pointer state at a fixed position.
    pub fn at(position: Vec2, radius: f32) -> Self {
        Self {
            position: Some(position),
            radius,
        }
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        self.position.is_some()
    }
}

/// The kinds of environment notification a driver can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    PointerMove,
    PointerLeave,
    Resize,
    Visibility,
}

impl SignalKind {
    pub const ALL: [SignalKind; 4] = [
        SignalKind::PointerMove,
        SignalKind::PointerLeave,
        SignalKind::Resize,
        SignalKind::Visibility,
    ];
}

/// A single environment notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// Pointer moved to a point in surface coordinates.
    PointerMoved(Vec2),
    /// Pointer left the surface.
    PointerLeft,
    /// Viewport changed size.
    Resized(Viewport),
    /// Surface became hidden (`false`) or visible again (`true`).
    VisibilityChanged(bool),
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::PointerMoved(_) => SignalKind::PointerMove,
            Signal::PointerLeft => SignalKind::PointerLeave,
            Signal::Resized(_) => SignalKind::Resize,
            Signal::VisibilityChanged(_) => SignalKind::Visibility,
        }
    }

    /// Translate a winit window event, if it maps onto a signal.
    pub fn from_window_event(event: &WindowEvent) -> Option<Signal> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                Some(Signal::PointerMoved(Vec2::new(position.x as f32, position.y as f32)))
            }
            WindowEvent::CursorLeft { .. } => Some(Signal::PointerLeft),
            WindowEvent::Resized(size) => Some(Signal::Resized(Viewport::from(*size))),
            WindowEvent::Occluded(occluded) => Some(Signal::VisibilityChanged(!occluded)),
            _ => None,
        }
    }
}
