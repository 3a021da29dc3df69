//! A uniform Cartesian box grid.

use seep_core::{Grid, PhaseUsage};

/// `nx * ny * nz` cells of equal thickness, layered from `top` downwards.
///
/// Cells are numbered with `i` fastest and `k` (depth) slowest. Every cell
/// is in equilibration region 0.
#[derive(Clone, Debug, PartialEq)]
pub struct CartesianGrid {
    dims: [usize; 3],
    top: f64,
    thickness: f64,
    phases: PhaseUsage,
}

impl CartesianGrid {
    /// A box with `dims` cells whose top face is at depth `top` and whose
    /// layers are `thickness` metres thick.
    pub fn new(dims: [usize; 3], top: f64, thickness: f64, phases: PhaseUsage) -> Self {
        Self {
            dims,
            top,
            thickness,
            phases,
        }
    }

    /// Cells along x, y, and z.
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// The `(i, j, k)` index of `cell`.
    pub fn ijk(&self, cell: usize) -> [usize; 3] {
        let [nx, ny, _] = self.dims;
        [cell % nx, (cell / nx) % ny, cell / (nx * ny)]
    }
}

impl Grid for CartesianGrid {
    fn num_cells(&self) -> usize {
        self.dims.iter().product()
    }

    /// Interior faces only.
    fn num_faces(&self) -> usize {
        let [nx, ny, nz] = self.dims;
        nx.saturating_sub(1) * ny * nz
            + nx * ny.saturating_sub(1) * nz
            + nx * ny * nz.saturating_sub(1)
    }

    fn cell_depth(&self, cell: usize) -> f64 {
        let [_, _, k] = self.ijk(cell);
        self.top + (k as f64 + 0.5) * self.thickness
    }

    fn phase_usage(&self) -> &PhaseUsage {
        &self.phases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> CartesianGrid {
        CartesianGrid::new([3, 2, 2], 2000.0, 10.0, PhaseUsage::black_oil())
    }

    #[test]
    fn counts() {
        let g = grid();
        assert_eq!(g.num_cells(), 12);
        // x: 2*2*2, y: 3*1*2, z: 3*2*1
        assert_eq!(g.num_faces(), 8 + 6 + 6);
    }

    #[test]
    fn depth_follows_layer() {
        let g = grid();
        assert_eq!(g.ijk(7), [1, 0, 1]);
        assert_eq!(g.cell_depth(0), 2005.0);
        assert_eq!(g.cell_depth(7), 2015.0);
        assert_eq!(g.equilibration_region(7), 0);
    }

    #[test]
    fn single_cell_has_no_faces() {
        let g = CartesianGrid::new([1, 1, 1], 0.0, 1.0, PhaseUsage::black_oil());
        assert_eq!(g.num_faces(), 0);
    }
}
