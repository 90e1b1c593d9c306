use glam::{Mat4, Quat, Vec3};
use skiff_common::WORLD_UP;

/// Chase camera that rides a fixed offset in the followed node's local frame
/// and always looks back at it. Turning the node swings the camera with it.
pub struct FollowCamera {
    /// Offset from the followed node, expressed in its local frame.
    pub offset: Vec3,
    pub eye: Vec3,
    pub target: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 30.0, -5.0),
            eye: Vec3::new(0.0, 30.0, -5.0),
            target: Vec3::ZERO,
            fov: 50.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl FollowCamera {
    /// Re-aim at the followed pose: eye rides the rotated offset, target is
    /// the pose itself.
    pub fn follow(&mut self, position: Vec3, rotation: Quat) {
        self.eye = position + rotation * self.offset;
        self.target = position;
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, WORLD_UP)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
