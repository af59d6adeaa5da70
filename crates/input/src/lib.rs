//! Pointer input mapped to camera-control actions.
//!
//! # Invariants
//! - The windowing layer feeds raw pointer state in; camera controls consume
//!   [`Action`]s and never see platform events.

pub mod action;
pub mod pointer;

pub use action::Action;
pub use pointer::{PointerButton, PointerTracker};
