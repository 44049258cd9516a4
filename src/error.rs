//! Error types for particle-field.
//!
//! The simulation core never fails; these cover the outer surfaces:
//! GPU presentation, the window event loop, and configuration files.

use std::fmt;

/// Errors that can occur while setting up GPU presentation.
#[derive(Debug)]
pub enum PresentError {
    /// Failed to create a surface for the window.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            PresentError::NoAdapter => write!(f, "No compatible GPU adapter found. Use --snapshot to render without a GPU."),
            PresentError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for PresentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PresentError::SurfaceCreation(e) => Some(e),
            PresentError::DeviceCreation(e) => Some(e),
            PresentError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for PresentError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        PresentError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for PresentError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        PresentError::DeviceCreation(e)
    }
}

/// Errors that can occur while loading or saving configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the file.
    Io(std::io::Error),
    /// The file is not valid configuration JSON.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Errors that can occur when running a windowed simulation.
#[derive(Debug)]
pub enum RunError {
    /// Failed to create or run the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU presentation could not be initialized.
    Present(PresentError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::EventLoop(e) => write!(f, "Event loop failed: {}", e),
            RunError::Window(e) => write!(f, "Failed to create window: {}", e),
            RunError::Present(e) => write!(f, "Presentation error: {}", e),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::EventLoop(e) => Some(e),
            RunError::Window(e) => Some(e),
            RunError::Present(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for RunError {
    fn from(e: winit::error::EventLoopError) -> Self {
        RunError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for RunError {
    fn from(e: winit::error::OsError) -> Self {
        RunError::Window(e)
    }
}

impl From<PresentError> for RunError {
    fn from(e: PresentError) -> Self {
        RunError::Present(e)
    }
}
