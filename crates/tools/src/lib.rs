//! Developer tooling: the parameter control panel and a read-only scene
//! inspector.
//!
//! # Invariants
//! - The panel never touches the scene directly; it emits [`ParamChange`]s
//!   and [`apply_change`] is the single place they mutate the scene.

mod inspector;
mod panel;

pub use inspector::{SceneInspector, SceneSummary};
pub use panel::{ControlPanel, ParamChange, apply_change};

pub fn crate_info() -> &'static str {
    "crossfield-tools v0.1.0"
}
