//! Scene graph: the camera, lights, shared box material and generated boxes.
//!
//! # Invariants
//! - The camera, ambient light and rect light are created once and never
//!   removed; box regeneration only touches tracked box handles.
//! - Every box renders with the single scene-owned material.
//! - All mutations are recorded in the scene event log.

mod camera;
mod graph;
mod light;
mod material;

pub use camera::Camera;
pub use graph::{
    BoxNode, EnvironmentInfo, Node, NodeKind, RegenerateReport, Scene, SceneError, SceneEvent,
};
pub use light::{AmbientLight, RectLight};
pub use material::{Material, MaterialParam};
