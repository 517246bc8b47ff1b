//! Particle fields: ring-shaped instance buffers plus per-field shader state.
//!
//! A [`ParticleField`] is one ring of camera-facing sprites. Its instance
//! positions are generated once at creation time and never rewritten; all
//! animation happens in the vertex shader, driven by the per-field
//! [`UniformState`] that the frame loop overwrites each frame.

use glam::Vec3;
use rand::Rng;

use crate::error::ConfigError;

/// Default number of sprite instances per field.
pub const DEFAULT_INSTANCE_COUNT: u32 = 10_000;

/// Half-height of the vertical jitter band applied to instance positions.
pub const VERTICAL_JITTER: f32 = 0.05;

/// Configuration for a single particle field. Immutable once the field
/// is created.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Inner radius of the ring.
    pub min_radius: f32,
    /// Outer radius of the ring.
    pub max_radius: f32,
    /// Sprite size multiplier.
    pub sprite_size: f32,
    /// Vertical displacement amplitude.
    pub amplitude: f32,
    /// Base sprite tint (RGB, 0.0-1.0).
    pub color: Vec3,
    /// Multiplier applied to the shared clock before it reaches the shader.
    pub time_scale: f32,
}

impl FieldConfig {
    /// Create a configuration for a ring between the two radii.
    pub fn new(min_radius: f32, max_radius: f32) -> Self {
        Self {
            min_radius,
            max_radius,
            sprite_size: 1.0,
            amplitude: 1.0,
            color: Vec3::ONE,
            time_scale: 0.5,
        }
    }

    /// Set the sprite size multiplier.
    pub fn with_sprite_size(mut self, size: f32) -> Self {
        self.sprite_size = size;
        self
    }

    /// Set the vertical displacement amplitude.
    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// Set the base sprite tint.
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Set the per-field time scale.
    pub fn with_time_scale(mut self, scale: f32) -> Self {
        self.time_scale = scale;
        self
    }

    /// Check the configuration for degenerate geometry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_radius <= 0.0 {
            return Err(ConfigError::NonPositive("min_radius"));
        }
        if self.min_radius >= self.max_radius {
            return Err(ConfigError::InvalidRadii {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        if self.sprite_size <= 0.0 {
            return Err(ConfigError::NonPositive("sprite_size"));
        }
        Ok(())
    }
}

/// Parse a `#rrggbb` hex color into an RGB vector.
///
/// Returns `None` for anything that is not exactly seven characters of
/// `#` plus six hex digits.
pub fn color_from_hex(hex: &str) -> Option<Vec3> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Vec3::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
    ))
}

/// Per-field shader state, overwritten every frame by the frame loop.
///
/// `time` and `pointer` change each frame; the remaining values are copied
/// from the config once and never touched again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformState {
    /// Scaled elapsed time fed to the vertex shader.
    pub time: f32,
    /// World-space pointer intersection point.
    pub pointer: Vec3,
    /// Vertical displacement amplitude.
    pub amplitude: f32,
    /// Sprite size multiplier.
    pub sprite_size: f32,
    /// Base sprite tint.
    pub color: Vec3,
}

/// One ring of GPU-instanced sprites.
#[derive(Debug)]
pub struct ParticleField {
    config: FieldConfig,
    positions: Vec<Vec3>,
    uniforms: UniformState,
}

impl ParticleField {
    /// Create a field, generating `instance_count` ring positions.
    ///
    /// Positions are sampled with an unseeded RNG: angle uniform in
    /// [0, 2pi), radius uniform between the two configured radii, and a
    /// vertical jitter within [-VERTICAL_JITTER, VERTICAL_JITTER].
    pub fn new(config: FieldConfig, instance_count: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        if instance_count == 0 {
            return Err(ConfigError::NoInstances);
        }

        let mut rng = rand::thread_rng();
        let positions = (0..instance_count)
            .map(|_| {
                let theta: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
                let radius = config.min_radius
                    + (config.max_radius - config.min_radius) * rng.gen::<f32>();
                let y = rng.gen_range(-VERTICAL_JITTER..=VERTICAL_JITTER);
                Vec3::new(radius * theta.sin(), y, radius * theta.cos())
            })
            .collect();

        let uniforms = UniformState {
            time: 0.0,
            pointer: Vec3::ZERO,
            amplitude: config.amplitude,
            sprite_size: config.sprite_size,
            color: config.color,
        };

        Ok(Self {
            config,
            positions,
            uniforms,
        })
    }

    /// The configuration this field was created with.
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Number of sprite instances.
    pub fn instance_count(&self) -> u32 {
        self.positions.len() as u32
    }

    /// Generated instance positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Positions flattened to x,y,z interleaved floats (length 3 x N),
    /// the layout of the per-instance vertex buffer.
    pub fn positions_flat(&self) -> Vec<f32> {
        self.positions
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }

    /// Current shader state.
    pub fn uniforms(&self) -> &UniformState {
        &self.uniforms
    }

    /// Overwrite the per-frame shader inputs. Called once per field per
    /// frame; never allocates.
    pub fn update_uniforms(&mut self, time: f32, pointer: Vec3) {
        self.uniforms.time = time;
        self.uniforms.pointer = pointer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> FieldConfig {
        FieldConfig::new(1.0, 2.0)
    }

    #[test]
    fn test_config_builder() {
        let config = FieldConfig::new(1.0, 2.0)
            .with_sprite_size(0.5)
            .with_amplitude(3.0)
            .with_color(Vec3::new(0.1, 0.2, 0.3))
            .with_time_scale(0.25);

        assert!((config.sprite_size - 0.5).abs() < 1e-6);
        assert!((config.amplitude - 3.0).abs() < 1e-6);
        assert!((config.time_scale - 0.25).abs() < 1e-6);
        assert_eq!(config.color, Vec3::new(0.1, 0.2, 0.3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_inverted_radii() {
        let config = FieldConfig::new(2.0, 1.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidRadii { min: 2.0, max: 1.0 })
        );

        // Equal radii are just as degenerate.
        let config = FieldConfig::new(1.5, 1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRadii { .. })
        ));
    }

    #[test]
    fn test_config_rejects_non_positive_values() {
        assert_eq!(
            FieldConfig::new(0.0, 1.0).validate(),
            Err(ConfigError::NonPositive("min_radius"))
        );
        assert_eq!(
            test_config().with_sprite_size(0.0).validate(),
            Err(ConfigError::NonPositive("sprite_size"))
        );
    }

    #[test]
    fn test_field_rejects_zero_instances() {
        assert!(matches!(
            ParticleField::new(test_config(), 0),
            Err(ConfigError::NoInstances)
        ));
    }

    #[test]
    fn test_instance_radii_within_bounds() {
        let field = ParticleField::new(test_config(), 2000).unwrap();
        for p in field.positions() {
            let radius = (p.x * p.x + p.z * p.z).sqrt();
            assert!(
                radius >= 1.0 - 1e-4 && radius <= 2.0 + 1e-4,
                "radius {} outside [1, 2]",
                radius
            );
            assert!(p.y.abs() <= VERTICAL_JITTER + 1e-6);
        }
    }

    #[test]
    fn test_flat_buffer_length() {
        for count in [1u32, 7, 512] {
            let field = ParticleField::new(test_config(), count).unwrap();
            assert_eq!(field.positions_flat().len(), 3 * count as usize);
            assert_eq!(field.instance_count(), count);
        }
    }

    #[test]
    fn test_flat_buffer_interleaving() {
        let field = ParticleField::new(test_config(), 4).unwrap();
        let flat = field.positions_flat();
        for (i, p) in field.positions().iter().enumerate() {
            assert_eq!(flat[i * 3], p.x);
            assert_eq!(flat[i * 3 + 1], p.y);
            assert_eq!(flat[i * 3 + 2], p.z);
        }
    }

    #[test]
    fn test_update_uniforms_touches_only_frame_state() {
        let config = test_config()
            .with_amplitude(3.0)
            .with_color(Vec3::new(1.0, 0.5, 0.25));
        let mut field = ParticleField::new(config, 16).unwrap();

        field.update_uniforms(1.5, Vec3::new(0.2, 0.0, -0.4));

        let u = field.uniforms();
        assert!((u.time - 1.5).abs() < 1e-6);
        assert_eq!(u.pointer, Vec3::new(0.2, 0.0, -0.4));
        // Write-once values survive.
        assert!((u.amplitude - 3.0).abs() < 1e-6);
        assert_eq!(u.color, Vec3::new(1.0, 0.5, 0.25));
    }

    #[test]
    fn test_positions_survive_uniform_updates() {
        let mut field = ParticleField::new(test_config(), 64).unwrap();
        let before = field.positions().to_vec();
        for i in 0..100 {
            field.update_uniforms(i as f32 * 0.05, Vec3::splat(i as f32));
        }
        assert_eq!(field.positions(), &before[..]);
    }

    #[test]
    fn test_color_from_hex() {
        let c = color_from_hex("#ffffff").unwrap();
        assert_eq!(c, Vec3::ONE);

        let c = color_from_hex("#f7b373").unwrap();
        assert!((c.x - 247.0 / 255.0).abs() < 1e-6);
        assert!((c.y - 179.0 / 255.0).abs() < 1e-6);
        assert!((c.z - 115.0 / 255.0).abs() < 1e-6);

        assert!(color_from_hex("f7b373").is_none());
        assert!(color_from_hex("#f7b37").is_none());
        assert!(color_from_hex("#zzzzzz").is_none());
    }
}
