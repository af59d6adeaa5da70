//! wgpu render backend for the crossfield scene.
//!
//! Draws every generated box as one instanced batch sharing the scene
//! material, lit by the ambient light, the optional rect light and the HDRI
//! environment once it has loaded. Camera motion comes from
//! [`OrbitControls`].
//!
//! # Invariants
//! - Renderer never mutates the scene.
//! - Without an environment map the boxes still render, only unreflected.

mod camera;
mod environment;
mod gpu;
mod shaders;

pub use camera::OrbitControls;
pub use gpu::SceneRenderer;
