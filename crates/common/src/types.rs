use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Model-space forward direction. The player mesh is authored nose toward +Z,
/// so steering math rotates this vector by the mesh orientation.
pub const WORLD_FORWARD: Vec3 = Vec3::Z;

/// World up. Yaw happens about this axis.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Per-axis rotation enable flags for a physics body.
///
/// An enabled axis may accumulate angular velocity; a disabled axis is locked.
/// The demo only ever uses two shapes of this: everything locked while driving
/// straight, and yaw-only while turning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisMask {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisMask {
    /// Every rotation axis locked.
    pub const LOCKED: Self = Self {
        x: false,
        y: false,
        z: false,
    };

    /// Rotation about world Y only.
    pub const YAW_ONLY: Self = Self {
        x: false,
        y: true,
        z: false,
    };

    /// No axis locked.
    pub const FREE: Self = Self {
        x: true,
        y: true,
        z: true,
    };
}

impl Default for AxisMask {
    fn default() -> Self {
        Self::FREE
    }
}
