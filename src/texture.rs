//! Sprite texture loading and generation.
//!
//! Each field samples the same sprite texture, tinted by its own color
//! uniform. A texture can be loaded from a PNG/JPEG file or generated
//! procedurally; [`SpriteTexture::soft_disc`] is the default sprite, a
//! radial alpha falloff that reads as a glowing round particle.

use std::path::Path;

use crate::error::TextureError;

/// Filter mode for texture sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Smooth linear filtering (default).
    #[default]
    Linear,
    /// Sharp nearest-neighbor filtering.
    Nearest,
}

/// CPU-side sprite texture: raw RGBA pixels plus sampling configuration.
#[derive(Debug, Clone)]
pub struct SpriteTexture {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// Filter mode for magnification/minification.
    pub filter: FilterMode,
}

impl SpriteTexture {
    /// Create a sprite from raw RGBA data (4 bytes per pixel).
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "RGBA data size mismatch"
        );
        Self {
            data,
            width,
            height,
            filter: FilterMode::Linear,
        }
    }

    /// Load a sprite from an image file (PNG or JPEG).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path.as_ref())?;
        let img = image::load_from_memory(&bytes)?.into_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            data: img.into_raw(),
            width,
            height,
            filter: FilterMode::Linear,
        })
    }

    /// Generate a soft round sprite: white, with alpha falling off smoothly
    /// from the center to a fully transparent rim.
    pub fn soft_disc(size: u32) -> Self {
        let size = size.max(2);
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        let center = (size as f32 - 1.0) / 2.0;
        let radius = size as f32 / 2.0;

        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 - center;
                let dy = y as f32 - center;
                let dist = (dx * dx + dy * dy).sqrt() / radius;
                // Quadratic falloff keeps a bright core with a feathered edge.
                let alpha = (1.0 - dist.min(1.0)).powi(2);
                let a = (alpha * 255.0).round() as u8;
                data.extend_from_slice(&[255, 255, 255, a]);
            }
        }

        Self {
            data,
            width: size,
            height: size,
            filter: FilterMode::Linear,
        }
    }

    /// Set the filter mode.
    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }
}

impl Default for SpriteTexture {
    fn default() -> Self {
        Self::soft_disc(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_disc_dimensions() {
        let tex = SpriteTexture::soft_disc(64);
        assert_eq!(tex.width, 64);
        assert_eq!(tex.height, 64);
        assert_eq!(tex.data.len(), 64 * 64 * 4);
    }

    #[test]
    fn test_soft_disc_alpha_profile() {
        let tex = SpriteTexture::soft_disc(32);
        let alpha_at = |x: u32, y: u32| tex.data[((y * 32 + x) * 4 + 3) as usize];

        // Opaque-ish center, transparent corners.
        assert!(alpha_at(15, 15) > 200);
        assert_eq!(alpha_at(0, 0), 0);
        assert_eq!(alpha_at(31, 31), 0);
        // Monotone falloff along a row.
        assert!(alpha_at(15, 15) > alpha_at(22, 15));
        assert!(alpha_at(22, 15) > alpha_at(29, 15));
    }

    #[test]
    fn test_from_rgba() {
        let tex = SpriteTexture::from_rgba(vec![0u8; 2 * 2 * 4], 2, 2);
        assert_eq!(tex.width, 2);
        assert_eq!(tex.filter, FilterMode::Linear);
    }

    #[test]
    #[should_panic(expected = "RGBA data size mismatch")]
    fn test_from_rgba_size_mismatch() {
        SpriteTexture::from_rgba(vec![0u8; 3], 2, 2);
    }

    #[test]
    fn test_from_file_missing_path() {
        let err = SpriteTexture::from_file("no/such/sprite.png").unwrap_err();
        assert!(matches!(err, TextureError::Io(_)));
    }
}
