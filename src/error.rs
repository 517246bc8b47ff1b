//! Error types for ringfield.
//!
//! This module provides error types for field configuration, GPU
//! initialization, and texture loading. Pointer-ray misses are not errors
//! and never surface here.

use std::fmt;

/// Errors produced by malformed field configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `min_radius` must be strictly less than `max_radius`.
    InvalidRadii { min: f32, max: f32 },
    /// A parameter that must be positive was zero or negative.
    NonPositive(&'static str),
    /// A field must have at least one instance.
    NoInstances,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRadii { min, max } => write!(
                f,
                "min_radius ({}) must be less than max_radius ({})",
                min, max
            ),
            ConfigError::NonPositive(name) => write!(f, "{} must be positive", name),
            ConfigError::NoInstances => write!(f, "instance count must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors that can occur during GPU initialization.
///
/// Any of these is fatal at startup: there is no graphics context to fall
/// back to and nothing is retried.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur during sprite texture loading.
#[derive(Debug)]
pub enum TextureError {
    /// Failed to decode image data.
    ImageLoad(image::ImageError),
    /// Failed to read file from disk.
    Io(std::io::Error),
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::ImageLoad(e) => write!(f, "Failed to load sprite image: {}", e),
            TextureError::Io(e) => write!(f, "Failed to read sprite file: {}", e),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::ImageLoad(e) => Some(e),
            TextureError::Io(e) => Some(e),
        }
    }
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        TextureError::ImageLoad(e)
    }
}

impl From<std::io::Error> for TextureError {
    fn from(e: std::io::Error) -> Self {
        TextureError::Io(e)
    }
}

/// Errors that can occur when running a sketch.
#[derive(Debug)]
pub enum SketchError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create the window.
    Window(winit::error::OsError),
    /// A field configuration was rejected.
    Config(ConfigError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// Sprite texture loading failed.
    Texture(TextureError),
    /// The sketch has no fields to draw.
    NoFields,
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            SketchError::Window(e) => write!(f, "Failed to create window: {}", e),
            SketchError::Config(e) => write!(f, "Invalid field configuration: {}", e),
            SketchError::Gpu(e) => write!(f, "GPU error: {}", e),
            SketchError::Texture(e) => write!(f, "Texture error: {}", e),
            SketchError::NoFields => {
                write!(f, "No fields configured. Use .with_field() to add one.")
            }
        }
    }
}

impl std::error::Error for SketchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SketchError::EventLoop(e) => Some(e),
            SketchError::Window(e) => Some(e),
            SketchError::Config(e) => Some(e),
            SketchError::Gpu(e) => Some(e),
            SketchError::Texture(e) => Some(e),
            SketchError::NoFields => None,
        }
    }
}

impl From<winit::error::EventLoopError> for SketchError {
    fn from(e: winit::error::EventLoopError) -> Self {
        SketchError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for SketchError {
    fn from(e: winit::error::OsError) -> Self {
        SketchError::Window(e)
    }
}

impl From<ConfigError> for SketchError {
    fn from(e: ConfigError) -> Self {
        SketchError::Config(e)
    }
}

impl From<GpuError> for SketchError {
    fn from(e: GpuError) -> Self {
        SketchError::Gpu(e)
    }
}

impl From<TextureError> for SketchError {
    fn from(e: TextureError) -> Self {
        SketchError::Texture(e)
    }
}
