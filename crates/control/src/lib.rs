//! The third-person control core: turns queued direction tokens into body
//! velocities, copies body poses back onto scene nodes, and drives the whole
//! frame in a fixed order.
//!
//! # Invariants
//! - Bodies are authoritative. Nodes and camera are written from them, never
//!   the reverse.
//! - The token queue is resolved and emptied every frame; nothing carries over.
//! - The steering direction comes from the visual node's orientation as of the
//!   previous sync, so a turn steers the next frame, not the current one.

mod demo;
mod driver;
mod motion;

pub use demo::DemoScene;
pub use driver::{FrameDriver, FrameError, Phase, MAX_STEP_SECONDS};
pub use motion::{resolve_motion, sync_transforms, MotionConfig};

pub fn crate_info() -> &'static str {
    "skiff-control v0.1.0"
}
