//! Keyboard input for the skiff demo: which bound keys are held right now,
//! and the per-frame queue of direction tokens sampled from them.
//!
//! # Invariants
//! - Sampling never consumes key state; a held key produces a token every frame.
//! - One token per direction per sample, even when both of its bindings are held.
//! - The queue is drained by whoever resolves it, never by the sampler.

mod keys;
mod queue;

pub use keys::{HeldKeys, Key};
pub use queue::{sample_into, DirectionToken, InputQueue};

pub fn crate_info() -> &'static str {
    "skiff-input v0.1.0"
}
