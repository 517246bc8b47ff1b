//! # ringfield
//!
//! Interactive particle-field visualizer: two concentric rings of
//! GPU-instanced, camera-facing sprites whose vertical displacement and
//! color respond to a shared time uniform and to the 3D point under the
//! pointer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ringfield::prelude::*;
//!
//! fn main() -> Result<(), SketchError> {
//!     Sketch::new()
//!         .with_field(
//!             FieldConfig::new(1.0, 2.0)
//!                 .with_color(color_from_hex("#f7b373").unwrap()),
//!         )
//!         .run()
//! }
//! ```
//!
//! ## How it works
//!
//! - [`ParticleField`] samples ring positions once at startup into an
//!   instance buffer; the buffer is never rewritten.
//! - [`PointerProjector`] converts the cursor's NDC position into a world
//!   point by raycasting against an invisible ground plane, keeping the
//!   last good hit across misses.
//! - [`FrameClock`] advances a fixed step per frame; each field scales the
//!   shared time by its own `time_scale` before it reaches the shader.
//! - [`Sketch`] owns the window, camera, and render loop, and pushes every
//!   field's uniforms to the GPU before each draw.
//!
//! All movement happens in the vertex shader; the CPU only writes a small
//! uniform block per field per frame.

pub mod clock;
pub mod error;
pub mod field;
pub mod gpu;
pub mod input;
pub mod projector;
pub mod shader;
pub mod sketch;
pub mod texture;

pub use clock::FrameClock;
pub use error::{ConfigError, GpuError, SketchError, TextureError};
pub use field::{color_from_hex, FieldConfig, ParticleField, UniformState};
pub use glam::{Vec2, Vec3};
pub use gpu::camera::OrbitCamera;
pub use projector::{GroundPlane, PointerProjector};
pub use sketch::{CancelHandle, Sketch, SketchState};
pub use texture::{FilterMode, SpriteTexture};

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::clock::FrameClock;
    pub use crate::error::{ConfigError, SketchError};
    pub use crate::field::{color_from_hex, FieldConfig, ParticleField};
    pub use crate::gpu::camera::OrbitCamera;
    pub use crate::projector::{GroundPlane, PointerProjector};
    pub use crate::sketch::{CancelHandle, Sketch};
    pub use crate::texture::SpriteTexture;
    pub use crate::{Vec2, Vec3};
}
