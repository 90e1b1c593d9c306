//! Visual scene state for the skiff demo: flat node list, a chase camera,
//! and the two-term lighting rig.
//!
//! # Invariants
//! - Nodes never drive physics; they are written from body poses, not read back.
//! - The camera is re-aimed from the followed node's pose every frame.

mod camera;
mod light;
mod node;

pub use camera::FollowCamera;
pub use light::Lighting;
pub use node::{NodeId, Scene, SceneNode};

pub fn crate_info() -> &'static str {
    "skiff-scene v0.1.0"
}
