//! Orbit camera for the 3D view.

use glam::{Mat4, Vec3};

/// Orbit camera with a perspective projection.
///
/// Yaw/pitch/distance describe the orbit around `target`; the projection
/// parameters live here too so that resize handling and pointer
/// unprojection both read from one place.
#[derive(Debug)]
pub struct OrbitCamera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
}

impl OrbitCamera {
    /// Create a camera matching the sketch's framing: fov 70 degrees,
    /// positioned at (0, 2, 2) looking at the origin.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: std::f32::consts::FRAC_PI_4,
            distance: 2.0 * std::f32::consts::SQRT_2,
            target: Vec3::ZERO,
            fov_y: 70.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.001,
            far: 1000.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    /// Calculate the perspective projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Combined view-projection matrix.
    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update the aspect ratio from a viewport size in pixels.
    /// Zero-sized viewports are ignored.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_position() {
        let camera = OrbitCamera::new();
        let pos = camera.position();
        assert!(pos.x.abs() < 1e-5);
        assert!((pos.y - 2.0).abs() < 1e-5);
        assert!((pos.z - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_set_aspect_is_exact() {
        let mut camera = OrbitCamera::new();
        camera.set_aspect(1280, 720);
        assert_eq!(camera.aspect, 1280.0 / 720.0);

        camera.set_aspect(1920, 1080);
        assert_eq!(camera.aspect, 1920.0 / 1080.0);
    }

    #[test]
    fn test_zero_viewport_ignored() {
        let mut camera = OrbitCamera::new();
        camera.set_aspect(800, 600);
        let before = camera.aspect;
        camera.set_aspect(0, 600);
        camera.set_aspect(800, 0);
        assert_eq!(camera.aspect, before);
    }

    #[test]
    fn test_view_proj_invertible() {
        let camera = OrbitCamera::new();
        let vp = camera.view_proj();
        let inv = vp.inverse();
        let id = vp * inv;
        // Diagonal close to identity.
        for i in 0..4 {
            assert!((id.col(i)[i] - 1.0).abs() < 1e-3);
        }
    }
}
