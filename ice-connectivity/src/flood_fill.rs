//! Removal of ice bodies that are not connected to the main ice sheet.
//!
//! Starting from the centre cell of the grid, a breadth-first flood fill
//! walks 4-connected neighbours with strictly positive thickness. Everything
//! the fill does not reach is zeroed in the thickness field and in both
//! velocity components.

use crate::error::FloodFillError;
use crate::fields::IceFields;
use crate::grid::{Grid, NEIGHBOR_OFFSETS};
use log::{debug, warn};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::mem;

/// What to do when the connected ice body reaches the edge of the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Fail with [`FloodFillError::OutOfBoundsExpansion`]. Callers are
    /// expected to pad the domain with a non-ice border.
    #[default]
    Reject,
    /// Treat cells beyond the edge as ice-free and keep going.
    Clip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub rounds: usize,            // Expansion rounds until the frontier emptied
    pub reachable_cells: usize,   // Includes the seed
    pub removed_ice_cells: usize, // Positive-thickness cells that were zeroed
}

#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub fields: IceFields,
    pub reachable: Array2<bool>,
    pub stats: FilterStats,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectivityFilter {
    boundary: BoundaryPolicy,
}

impl ConnectivityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_boundary_policy(boundary: BoundaryPolicy) -> Self {
        Self { boundary }
    }

    pub fn boundary_policy(&self) -> BoundaryPolicy {
        self.boundary
    }

    /// Cells connected to the seed through positive-thickness neighbours.
    ///
    /// The seed is always reachable. If it holds no ice the fill does not
    /// expand at all.
    pub fn reachable(
        &self,
        thickness: &Array2<f64>,
    ) -> Result<(Array2<bool>, FilterStats), FloodFillError> {
        let grid = Grid::from_shape(thickness.dim());
        grid.ensure_non_empty()?;
        let seed = grid.seed();

        let mut visited = Array2::from_elem(grid.shape(), false);
        let mut reachable = Array2::from_elem(grid.shape(), false);
        visited[seed] = true;
        reachable[seed] = true;

        let mut stats = FilterStats {
            reachable_cells: 1,
            ..FilterStats::default()
        };

        if !(thickness[seed] > 0.0) {
            warn!(
                "Seed cell {:?} has no ice (thickness {}); every cell will be zeroed",
                seed, thickness[seed]
            );
            return Ok((reachable, stats));
        }

        // Double-buffered frontier, swapped after every round.
        let mut frontier = vec![seed];
        let mut next = Vec::new();

        while !frontier.is_empty() {
            stats.rounds += 1;
            for &(row, col) in &frontier {
                for offset in NEIGHBOR_OFFSETS {
                    let Some(cell) = grid.neighbor(row, col, offset) else {
                        match self.boundary {
                            BoundaryPolicy::Reject => {
                                return Err(FloodFillError::OutOfBoundsExpansion {
                                    row,
                                    col,
                                    rows: grid.rows,
                                    cols: grid.cols,
                                })
                            }
                            BoundaryPolicy::Clip => continue,
                        }
                    };
                    if visited[cell] {
                        continue;
                    }
                    visited[cell] = true;
                    if thickness[cell] > 0.0 {
                        reachable[cell] = true;
                        next.push(cell);
                    }
                }
            }
            stats.reachable_cells += next.len();
            debug!(
                "Flood fill round {}: {} new cells, {} reachable",
                stats.rounds,
                next.len(),
                stats.reachable_cells
            );
            frontier.clear();
            mem::swap(&mut frontier, &mut next);
        }

        Ok((reachable, stats))
    }

    /// Zero every cell of `fields` that is not connected to the seed.
    /// The input is left untouched.
    pub fn filter(&self, fields: &IceFields) -> Result<FilterOutcome, FloodFillError> {
        self.filter_owned(fields.clone())
    }

    /// Like [`ConnectivityFilter::filter`] but reuses the given buffers for
    /// the output.
    pub fn filter_owned(&self, mut fields: IceFields) -> Result<FilterOutcome, FloodFillError> {
        let (reachable, mut stats) = self.reachable(&fields.thickness)?;
        let ice_before = fields.ice_cell_count();
        fields.mask_in_place(&reachable);
        stats.removed_ice_cells = ice_before - fields.ice_cell_count();
        Ok(FilterOutcome {
            fields,
            reachable,
            stats,
        })
    }
}

/// Trim `thickness`, `velocity_x` and `velocity_y` to the ice body that
/// contains the centre cell, rejecting bodies that touch the grid edge.
pub fn flood_fill(
    thickness: &Array2<f64>,
    velocity_x: &Array2<f64>,
    velocity_y: &Array2<f64>,
) -> Result<(Array2<f64>, Array2<f64>, Array2<f64>), FloodFillError> {
    let fields = IceFields::new(thickness.clone(), velocity_x.clone(), velocity_y.clone())?;
    let outcome = ConnectivityFilter::new().filter_owned(fields)?;
    let IceFields {
        thickness,
        velocity_x,
        velocity_y,
    } = outcome.fields;
    Ok((thickness, velocity_x, velocity_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn uniform_fields(thickness: Array2<f64>) -> IceFields {
        let dim = thickness.dim();
        IceFields::new(
            thickness,
            Array2::from_elem(dim, 10.0),
            Array2::from_elem(dim, -5.0),
        )
        .unwrap()
    }

    #[test]
    fn diagonal_cells_are_not_connected() {
        let thickness = array![
            [0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 4.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 3.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0],
        ];
        let (reachable, stats) = ConnectivityFilter::new().reachable(&thickness).unwrap();
        assert!(reachable[[2, 2]]);
        assert!(!reachable[[1, 1]]);
        assert_eq!(stats.reachable_cells, 1);
        assert_eq!(stats.rounds, 1);
    }

    #[test]
    fn rounds_follow_path_length() {
        // Seed at (2, 3); a corridor runs left to column 1 then down.
        let thickness = array![
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        ];
        let (reachable, stats) = ConnectivityFilter::new().reachable(&thickness).unwrap();
        assert_eq!(stats.reachable_cells, 4);
        // three rounds discover cells, a fourth finds nothing new
        assert_eq!(stats.rounds, 4);
        assert!(reachable[[3, 1]]);
    }

    #[test]
    fn seed_without_ice_stops_immediately() {
        let mut thickness = Array2::from_elem((5, 5), 2.0);
        thickness[[2, 2]] = 0.0;
        let outcome = ConnectivityFilter::new()
            .filter(&uniform_fields(thickness))
            .unwrap();
        assert_eq!(outcome.stats.rounds, 0);
        assert_eq!(outcome.stats.reachable_cells, 1);
        assert_eq!(outcome.stats.removed_ice_cells, 24);
        assert!(outcome.fields.thickness.iter().all(|&t| t == 0.0));
        // the seed is kept, so its velocities survive
        assert_eq!(outcome.fields.velocity_x[[2, 2]], 10.0);
        assert_eq!(outcome.fields.velocity_x[[2, 1]], 0.0);
    }

    #[test]
    fn reject_reports_the_edge_cell() {
        let mut thickness = Array2::<f64>::zeros((5, 5));
        for row in 0..=2 {
            thickness[[row, 2]] = 1.0;
        }
        let err = ConnectivityFilter::new().reachable(&thickness).unwrap_err();
        assert_eq!(
            err,
            FloodFillError::OutOfBoundsExpansion {
                row: 0,
                col: 2,
                rows: 5,
                cols: 5,
            }
        );
    }

    #[test]
    fn clip_keeps_ice_touching_the_edge() {
        let mut thickness = Array2::<f64>::zeros((5, 5));
        for row in 0..=2 {
            thickness[[row, 2]] = 1.0;
        }
        thickness[[4, 4]] = 7.0;
        let filter = ConnectivityFilter::with_boundary_policy(BoundaryPolicy::Clip);
        let outcome = filter.filter(&uniform_fields(thickness)).unwrap();
        assert_eq!(outcome.stats.reachable_cells, 3);
        assert_eq!(outcome.stats.removed_ice_cells, 1);
        assert_eq!(outcome.fields.thickness[[0, 2]], 1.0);
        assert_eq!(outcome.fields.thickness[[4, 4]], 0.0);
    }

    #[test]
    fn single_cell_grid() {
        let thickness = array![[3.0]];
        assert!(ConnectivityFilter::new().reachable(&thickness).is_err());

        let clip = ConnectivityFilter::with_boundary_policy(BoundaryPolicy::Clip);
        let (reachable, stats) = clip.reachable(&thickness).unwrap();
        assert!(reachable[[0, 0]]);
        assert_eq!(stats.reachable_cells, 1);

        // no ice at the seed means no expansion, hence no boundary hit
        let (reachable, _) = ConnectivityFilter::new().reachable(&array![[0.0]]).unwrap();
        assert!(reachable[[0, 0]]);
    }

    #[test]
    fn negative_and_nan_thickness_do_not_qualify() {
        let thickness = array![
            [0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, -1.0, 0.0, 0.0],
            [0.0, f64::NAN, 2.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0],
        ];
        let (reachable, stats) = ConnectivityFilter::new().reachable(&thickness).unwrap();
        assert_eq!(stats.reachable_cells, 2);
        assert!(!reachable[[1, 2]]);
        assert!(!reachable[[2, 1]]);
        assert!(reachable[[2, 3]]);
    }

    #[test]
    fn flood_fill_rejects_shape_mismatch() {
        let thickness = Array2::zeros((4, 4));
        let err = flood_fill(&thickness, &Array2::zeros((4, 3)), &Array2::zeros((4, 4))).unwrap_err();
        assert!(matches!(
            err,
            FloodFillError::ShapeMismatch {
                field: "velocity_x",
                ..
            }
        ));
    }

    #[test]
    fn boundary_policy_parses_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            boundary: BoundaryPolicy,
        }
        let parsed: Wrapper = toml::from_str("boundary = \"clip\"").unwrap();
        assert_eq!(parsed.boundary, BoundaryPolicy::Clip);
    }
}
