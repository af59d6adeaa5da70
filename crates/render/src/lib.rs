//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the scene and never mutate it.
//!
//! The GPU backend lives in `crossfield-render-wgpu`; the text renderer here
//! backs the CLI and tests.

mod renderer;

pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "crossfield-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
