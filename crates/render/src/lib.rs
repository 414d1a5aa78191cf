//! Renderer-agnostic interface for the shadowbox scene.
//!
//! # Invariants
//! - Renderers never mutate the scene; they read it and produce output.
//! - Output derives from scene state and a view configuration only.
//!
//! The debug text renderer here serves CLI output, logging, and tests; the
//! wgpu backend lives in its own crate behind the same trait.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "shadowbox-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
