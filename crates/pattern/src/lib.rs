//! Pattern generation: places boxes in a symmetric cross across the xy, xz
//! and yz planes.
//!
//! # Invariants
//! - Generation is pure: the same pattern and spacing always produce the
//!   same placements in the same order.
//! - Each plane is centered on the origin independently; boxes where the
//!   planes intersect are kept, not deduplicated.

mod layout;
mod spacing;

pub use layout::{BOX_SIZE, DEFAULT_ROWS, Pattern, PatternError, Placement, Plane};
pub use spacing::{Spacing, step};

pub fn crate_info() -> &'static str {
    "crossfield-pattern v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("pattern"));
    }
}
