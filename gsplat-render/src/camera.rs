//! Camera description passed in by the host for culling and sorting.

use glam::{Mat4, Vec3};

/// Minimal camera state the sort registry needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World-space eye position.
    pub position: Vec3,
    /// World-to-view matrix.
    pub view: Mat4,
    /// Bit `n` set means layer `n` is visible to this camera.
    pub culling_mask: u32,
}

impl Camera {
    /// Create a camera that sees every layer.
    pub fn new(position: Vec3, view: Mat4) -> Self {
        Self {
            position,
            view,
            culling_mask: u32::MAX,
        }
    }

    /// Camera at `position` looking at `target` with +Y up.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self::new(position, Mat4::look_at_rh(position, target, Vec3::Y))
    }

    pub fn with_culling_mask(mut self, culling_mask: u32) -> Self {
        self.culling_mask = culling_mask;
        self
    }

    /// Whether objects on `layer` are rendered by this camera.
    pub fn sees_layer(&self, layer: u8) -> bool {
        layer < 32 && self.culling_mask & (1 << layer) != 0
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Mat4::IDENTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_culling_mask() {
        let camera = Camera::default().with_culling_mask(0b101);
        assert!(camera.sees_layer(0));
        assert!(!camera.sees_layer(1));
        assert!(camera.sees_layer(2));
        assert!(!camera.sees_layer(40));
        assert!(Camera::default().sees_layer(31));
    }
}
