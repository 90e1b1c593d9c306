//! wgpu render backend for the skiff demo.
//!
//! Draws every scene node that names an uploaded mesh, textured and lit by a
//! single directional sun, plus an optional collider wireframe layer.
//!
//! # Invariants
//! - The renderer never mutates simulation state.
//! - Mesh and texture uploads happen once, at startup, from the asset store.
//! - A node whose mesh or texture name is not in the store is skipped, not an
//!   error; apps validate the manifest before entering the frame loop.

mod gpu;
mod shaders;

pub use gpu::SceneRenderer;

pub fn crate_info() -> &'static str {
    "skiff-render-wgpu v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("skiff-render-wgpu"));
    }
}
