//! The reservoir state produced by initialization and advanced by the
//! time stepper.

/// Which hydrocarbon phases are present in a cell.
///
/// Meaningful when oil is active; it selects the primary variables the
/// time stepper uses for the cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HydrocarbonState {
    /// Only free gas (oil fully vaporized).
    GasOnly,
    /// Free gas and oil coexist.
    GasAndOil,
    /// Only oil: the cell is undersaturated, all gas is dissolved.
    OilOnly,
}

/// Per-cell physical state of the reservoir.
///
/// Saturations and surface volumes are stored cell-major with one entry
/// per active phase, so the block for cell `c` is
/// `[c * num_phases .. (c + 1) * num_phases]` in canonical phase order.
#[derive(Clone, Debug, PartialEq)]
pub struct ReservoirState {
    num_phases: usize,
    pressure: Vec<f64>,
    saturation: Vec<f64>,
    surface_volume: Vec<f64>,
    gas_oil_ratio: Vec<f64>,
    face_flux: Vec<f64>,
    hydrocarbon_state: Vec<HydrocarbonState>,
}

impl ReservoirState {
    /// Allocate a zeroed state for `num_cells` cells, `num_faces` faces, and
    /// `num_phases` active phases.
    pub fn new(num_cells: usize, num_faces: usize, num_phases: usize) -> Self {
        Self {
            num_phases,
            pressure: vec![0.0; num_cells],
            saturation: vec![0.0; num_cells * num_phases],
            surface_volume: vec![0.0; num_cells * num_phases],
            gas_oil_ratio: vec![0.0; num_cells],
            face_flux: vec![0.0; num_faces],
            hydrocarbon_state: vec![HydrocarbonState::GasAndOil; num_cells],
        }
    }

    /// Number of cells.
    pub fn num_cells(&self) -> usize {
        self.pressure.len()
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.face_flux.len()
    }

    /// Number of active phases.
    pub fn num_phases(&self) -> usize {
        self.num_phases
    }

    /// Cell pressures in Pa.
    pub fn pressure(&self) -> &[f64] {
        &self.pressure
    }

    /// Mutable cell pressures.
    pub fn pressure_mut(&mut self) -> &mut [f64] {
        &mut self.pressure
    }

    /// All saturations, cell-major.
    pub fn saturation(&self) -> &[f64] {
        &self.saturation
    }

    /// Mutable saturations, cell-major.
    pub fn saturation_mut(&mut self) -> &mut [f64] {
        &mut self.saturation
    }

    /// Saturation block of one cell.
    pub fn cell_saturation(&self, cell: usize) -> &[f64] {
        let np = self.num_phases;
        &self.saturation[cell * np..(cell + 1) * np]
    }

    /// Mutable saturation block of one cell.
    pub fn cell_saturation_mut(&mut self, cell: usize) -> &mut [f64] {
        let np = self.num_phases;
        &mut self.saturation[cell * np..(cell + 1) * np]
    }

    /// Surface volumes, cell-major.
    pub fn surface_volume(&self) -> &[f64] {
        &self.surface_volume
    }

    /// Mutable surface volumes, cell-major.
    pub fn surface_volume_mut(&mut self) -> &mut [f64] {
        &mut self.surface_volume
    }

    /// Dissolved gas-oil ratio per cell.
    pub fn gas_oil_ratio(&self) -> &[f64] {
        &self.gas_oil_ratio
    }

    /// Mutable gas-oil ratio.
    pub fn gas_oil_ratio_mut(&mut self) -> &mut [f64] {
        &mut self.gas_oil_ratio
    }

    /// Face fluxes; zero until the stepper writes them.
    pub fn face_flux(&self) -> &[f64] {
        &self.face_flux
    }

    /// Mutable face fluxes.
    pub fn face_flux_mut(&mut self) -> &mut [f64] {
        &mut self.face_flux
    }

    /// Hydrocarbon state per cell.
    pub fn hydrocarbon_state(&self) -> &[HydrocarbonState] {
        &self.hydrocarbon_state
    }

    /// Mutable hydrocarbon state.
    pub fn hydrocarbon_state_mut(&mut self) -> &mut [HydrocarbonState] {
        &mut self.hydrocarbon_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_sizes() {
        let s = ReservoirState::new(10, 27, 3);
        assert_eq!(s.num_cells(), 10);
        assert_eq!(s.num_faces(), 27);
        assert_eq!(s.saturation().len(), 30);
        assert_eq!(s.surface_volume().len(), 30);
        assert_eq!(s.gas_oil_ratio().len(), 10);
        assert_eq!(s.hydrocarbon_state().len(), 10);
    }

    #[test]
    fn cell_blocks_are_contiguous() {
        let mut s = ReservoirState::new(3, 0, 2);
        s.cell_saturation_mut(1).copy_from_slice(&[0.25, 0.75]);
        assert_eq!(s.saturation(), &[0.0, 0.0, 0.25, 0.75, 0.0, 0.0]);
        assert_eq!(s.cell_saturation(1), &[0.25, 0.75]);
    }
}
