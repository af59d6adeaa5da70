//! Shared types used across the crossfield crates.

mod types;

pub use types::{NodeId, Transform, rgb_from_hex};
