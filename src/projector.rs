//! Pointer-to-world projection.
//!
//! Converts the cursor's normalized device coordinates into a world-space
//! point by casting a ray from the camera and intersecting it with an
//! invisible horizontal ground plane. The last successful intersection is
//! retained across misses, so the shaders always see a valid point.

use glam::{Vec2, Vec3, Vec4, Vec4Swizzles};

use crate::gpu::camera::OrbitCamera;

/// The invisible horizontal plane the pointer ray is tested against.
///
/// Bounded: hits outside `half_extent` on either horizontal axis are
/// treated as misses. Sized generously beyond the particle rings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    /// World-space height (y) of the plane.
    pub height: f32,
    /// Half the side length of the bounded plane.
    pub half_extent: f32,
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self {
            height: 0.0,
            half_extent: 5.0,
        }
    }
}

/// Projects pointer positions onto the ground plane and remembers the
/// last successful hit.
#[derive(Debug)]
pub struct PointerProjector {
    plane: GroundPlane,
    point: Vec3,
}

impl PointerProjector {
    /// Create a projector over the given reference plane. The stored point
    /// starts at the origin.
    pub fn new(plane: GroundPlane) -> Self {
        Self {
            plane,
            point: Vec3::ZERO,
        }
    }

    /// The reference plane.
    pub fn plane(&self) -> GroundPlane {
        self.plane
    }

    /// Last successful intersection point. Retains its previous value
    /// when a ray misses; never zeroed after the first hit.
    pub fn point(&self) -> Vec3 {
        self.point
    }

    /// Cast a ray from the camera through `ndc` and intersect it with the
    /// plane. On a hit the stored point is updated and returned; on a miss
    /// the stored point is left untouched and `None` is returned.
    pub fn project(&mut self, ndc: Vec2, camera: &OrbitCamera) -> Option<Vec3> {
        let origin = camera.position();
        let direction = ray_direction(ndc, camera)?;

        // Parallel rays never cross the plane.
        if direction.y.abs() < f32::EPSILON {
            return None;
        }

        let t = (self.plane.height - origin.y) / direction.y;
        if t <= 0.0 {
            return None;
        }

        let hit = origin + direction * t;
        if hit.x.abs() > self.plane.half_extent || hit.z.abs() > self.plane.half_extent {
            return None;
        }

        self.point = hit;
        Some(hit)
    }
}

/// Unproject an NDC point through the camera to get a normalized world-space
/// ray direction from the camera position.
fn ray_direction(ndc: Vec2, camera: &OrbitCamera) -> Option<Vec3> {
    let inv_view_proj = camera.view_proj().inverse();
    // wgpu clip space: z in [0, 1]; unproject at the far plane.
    let far = inv_view_proj * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
    if far.w.abs() < f32::EPSILON {
        return None;
    }
    let far_point = far.xyz() / far.w;
    Some((far_point - camera.position()).normalize())
}
