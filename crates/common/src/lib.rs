//! Shared types for the skiff demo: spatial transforms, rotation-axis masks,
//! and the handful of world constants every other crate agrees on.
//!
//! # Invariants
//! - `WORLD_FORWARD` is the single source of truth for "which way is ahead".
//! - `Transform` carries no physics meaning on its own; bodies own the truth.

pub mod types;

pub use types::{AxisMask, Transform, WORLD_FORWARD, WORLD_UP};

pub fn crate_info() -> &'static str {
    "skiff-common v0.1.0"
}
