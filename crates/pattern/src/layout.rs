use crate::spacing::Spacing;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Boxes per row of the cross, top row first.
pub const DEFAULT_ROWS: [u32; 7] = [1, 3, 5, 7, 5, 3, 1];

/// Edge length of every generated box.
pub const BOX_SIZE: f32 = 0.8;

/// Errors from pattern construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern has no rows")]
    Empty,
    #[error("row {0} has zero boxes")]
    EmptyRow(usize),
    #[error("unknown plane: {0} (expected xy, xz or yz)")]
    UnknownPlane(String),
}

/// One of the three axis-aligned planes the cross is laid out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    Xy,
    Xz,
    Yz,
}

impl Plane {
    /// Generation order.
    pub const ALL: [Plane; 3] = [Plane::Xy, Plane::Xz, Plane::Yz];

    /// Build a point from the row-axis and column-axis coordinates.
    ///
    /// xy rows run along y, columns along x. xz rows run along z, columns
    /// along x. yz rows run along y, columns along z.
    pub fn compose(self, row_coord: f32, column_coord: f32) -> Vec3 {
        match self {
            Plane::Xy => Vec3::new(column_coord, row_coord, 0.0),
            Plane::Xz => Vec3::new(column_coord, 0.0, row_coord),
            Plane::Yz => Vec3::new(0.0, row_coord, column_coord),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Plane::Xy => "xy",
            Plane::Xz => "xz",
            Plane::Yz => "yz",
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plane {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xy" => Ok(Plane::Xy),
            "xz" => Ok(Plane::Xz),
            "yz" => Ok(Plane::Yz),
            other => Err(PatternError::UnknownPlane(other.to_string())),
        }
    }
}

/// A single generated box position with its location in the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub plane: Plane,
    pub row: usize,
    pub column: usize,
    pub position: Vec3,
}

/// Row counts describing the cross shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    rows: Vec<u32>,
}

impl Default for Pattern {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS.to_vec(),
        }
    }
}

impl Pattern {
    pub fn new(rows: Vec<u32>) -> Result<Self, PatternError> {
        if rows.is_empty() {
            return Err(PatternError::Empty);
        }
        if let Some(idx) = rows.iter().position(|&c| c == 0) {
            return Err(PatternError::EmptyRow(idx));
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[u32] {
        &self.rows
    }

    /// Boxes on a single plane.
    pub fn box_count(&self) -> usize {
        self.rows.iter().map(|&c| c as usize).sum()
    }

    /// Boxes across all three planes, origin overlaps included.
    pub fn total_box_count(&self) -> usize {
        self.box_count() * Plane::ALL.len()
    }

    /// Row-axis coordinate of the first row.
    pub fn start_offset(&self, step: f32) -> f32 {
        (self.rows.len() - 1) as f32 / 2.0 * step
    }

    /// Positions for one plane, rows from most positive to most negative.
    pub fn plane_positions(&self, plane: Plane, step: f32) -> Vec<Vec3> {
        self.plane_placements(plane, step)
            .map(|p| p.position)
            .collect()
    }

    /// All placements for the xy, xz and yz planes, in that order.
    pub fn generate(&self, spacing: Spacing) -> Vec<Placement> {
        let step = spacing.step();
        let placements: Vec<Placement> = Plane::ALL
            .iter()
            .flat_map(|&plane| self.plane_placements(plane, step))
            .collect();
        tracing::debug!(
            spacing = spacing.value(),
            step,
            count = placements.len(),
            "generated cross pattern"
        );
        placements
    }

    fn plane_placements(&self, plane: Plane, step: f32) -> impl Iterator<Item = Placement> + '_ {
        let start_offset = self.start_offset(step);
        self.rows.iter().enumerate().flat_map(move |(row, &count)| {
            let row_coord = start_offset - row as f32 * step;
            let start = (1.0 - count as f32) / 2.0 * step;
            (0..count as usize).map(move |column| Placement {
                plane,
                row,
                column,
                position: plane.compose(row_coord, start + column as f32 * step),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn default_counts() {
        let pattern = Pattern::default();
        assert_eq!(pattern.box_count(), 25);
        assert_eq!(pattern.total_box_count(), 75);
        assert_eq!(pattern.generate(Spacing::new(0.0)).len(), 75);
        assert_eq!(pattern.plane_positions(Plane::Xy, 1.0).len(), 25);
    }

    #[test]
    fn middle_row_of_xy_plane() {
        let pattern = Pattern::default();
        let row: Vec<Vec3> = pattern
            .generate(Spacing::new(0.0))
            .into_iter()
            .filter(|p| p.plane == Plane::Xy && p.row == 3)
            .map(|p| p.position)
            .collect();
        let expected: Vec<Vec3> = (-3..=3).map(|x| Vec3::new(x as f32, 0.0, 0.0)).collect();
        assert_eq!(row, expected);
    }

    #[test]
    fn rows_run_from_positive_to_negative() {
        let pattern = Pattern::default();
        let xy = pattern.plane_positions(Plane::Xy, 1.0);
        assert_eq!(xy.first().map(|p| p.y), Some(3.0));
        assert_eq!(xy.last().map(|p| p.y), Some(-3.0));
    }

    #[test]
    fn single_box_rows_sit_on_axis() {
        let pattern = Pattern::default();
        for plane in Plane::ALL {
            let placements: Vec<Placement> = pattern
                .generate(Spacing::new(0.4))
                .into_iter()
                .filter(|p| p.plane == plane && (p.row == 0 || p.row == 6))
                .collect();
            assert_eq!(placements.len(), 2);
            for p in placements {
                let off_axis = match plane {
                    Plane::Xy => p.position.x,
                    Plane::Xz => p.position.x,
                    Plane::Yz => p.position.z,
                };
                assert_eq!(off_axis, 0.0);
            }
        }
    }

    #[test]
    fn rows_are_symmetric() {
        let pattern = Pattern::default();
        for spacing in [-0.5, 0.0, 0.3, 1.0] {
            let placements = pattern.generate(Spacing::new(spacing));
            for plane in Plane::ALL {
                for row in 0..pattern.rows().len() {
                    let coords: Vec<f32> = placements
                        .iter()
                        .filter(|p| p.plane == plane && p.row == row)
                        .map(|p| match plane {
                            Plane::Xy | Plane::Xz => p.position.x,
                            Plane::Yz => p.position.z,
                        })
                        .collect();
                    let n = coords.len();
                    for i in 0..n {
                        assert!(approx(coords[i], -coords[n - 1 - i]));
                    }
                }
            }
        }
    }

    #[test]
    fn third_axis_is_zero() {
        let pattern = Pattern::default();
        for p in pattern.generate(Spacing::new(0.7)) {
            let third = match p.plane {
                Plane::Xy => p.position.z,
                Plane::Xz => p.position.y,
                Plane::Yz => p.position.x,
            };
            assert_eq!(third, 0.0);
        }
    }

    #[test]
    fn generation_is_idempotent() {
        let pattern = Pattern::default();
        let a = pattern.generate(Spacing::new(0.35));
        let b = pattern.generate(Spacing::new(0.35));
        assert_eq!(a, b);
    }

    #[test]
    fn collapsed_spacing_puts_everything_at_origin() {
        let pattern = Pattern::default();
        let placements = pattern.generate(Spacing::new(-1.0));
        assert_eq!(placements.len(), 75);
        assert!(placements.iter().all(|p| p.position == Vec3::ZERO));
    }

    #[test]
    fn max_spacing_doubles_distance() {
        let pattern = Pattern::default();
        let xy = pattern.plane_positions(Plane::Xy, Spacing::new(1.0).step());
        assert_eq!(xy[0], Vec3::new(0.0, 6.0, 0.0));
        assert_eq!(xy.last().copied(), Some(Vec3::new(0.0, -6.0, 0.0)));
        let widest: Vec<f32> = xy.iter().filter(|p| p.y == 0.0).map(|p| p.x).collect();
        assert_eq!(widest, vec![-6.0, -4.0, -2.0, 0.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn planes_share_the_origin_box() {
        let pattern = Pattern::default();
        let at_origin = pattern
            .generate(Spacing::new(0.0))
            .into_iter()
            .filter(|p| p.position == Vec3::ZERO)
            .count();
        assert_eq!(at_origin, 3);
    }

    #[test]
    fn rejects_bad_patterns() {
        assert_eq!(Pattern::new(vec![]), Err(PatternError::Empty));
        assert_eq!(Pattern::new(vec![1, 0, 1]), Err(PatternError::EmptyRow(1)));
        assert!(Pattern::new(vec![3, 1]).is_ok());
    }

    #[test]
    fn plane_parsing() {
        assert_eq!("XZ".parse::<Plane>(), Ok(Plane::Xz));
        assert!(matches!(
            "zz".parse::<Plane>(),
            Err(PatternError::UnknownPlane(_))
        ));
        assert_eq!(Plane::Yz.to_string(), "yz");
    }
}
