//! Rigid-body physics for the skiff demo, wrapped behind a small facade.
//!
//! The rest of the workspace talks to [`PhysicsWorld`] in glam types and
//! opaque [`BodyHandle`]s; the engine's own math and pipeline plumbing stay
//! inside this crate.
//!
//! # Invariants
//! - Body poses are authoritative; visual nodes copy from them, never back.
//! - Stepping with a non-positive dt is a no-op.
//! - Debug lines are a snapshot: refilled on request, stale otherwise.

mod debug;
mod world;

pub use debug::{hsla_to_rgba, DebugLine};
pub use world::{BodyHandle, PhysicsWorld};

pub fn crate_info() -> &'static str {
    "skiff-physics v0.1.0"
}
