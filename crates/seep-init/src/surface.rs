//! Surface volumes and the gas-oil ratio derived from them.

use smallvec::SmallVec;

use seep_core::{Grid, Phase, PhaseUsage, PropertyModel, ReservoirState};

/// Fill the surface volumes from saturation and pressure.
///
/// Each phase contributes `s * 1/B(p)`; gas additionally receives the
/// dissolved gas `rs * sv_oil` when a gas-oil ratio is already set.
pub fn compute_surface_volumes(
    grid: &dyn Grid,
    properties: &dyn PropertyModel,
    state: &mut ReservoirState,
) {
    let pu = grid.phase_usage();
    let np = pu.num_phases();
    let dissolved = pu.position(Phase::Oil).zip(pu.position(Phase::Gas));
    for cell in 0..state.num_cells() {
        let inv_b = properties.inverse_fvf(cell, state.pressure()[cell]);
        let rs = state.gas_oil_ratio()[cell];
        let mut block: SmallVec<[f64; 3]> = state
            .cell_saturation(cell)
            .iter()
            .zip(&inv_b)
            .map(|(s, b)| s * b)
            .collect();
        if let Some((oil, gas)) = dissolved {
            block[gas] += rs * block[oil];
        }
        state.surface_volume_mut()[cell * np..(cell + 1) * np].copy_from_slice(&block);
    }
}

/// Set `gor = sv_gas / sv_oil` per cell when oil and gas are both active.
///
/// Returns `false` and leaves the field untouched otherwise. Cells without
/// oil get a ratio of 0.
pub fn compute_gas_oil_ratio(pu: &PhaseUsage, state: &mut ReservoirState) -> bool {
    let (Some(oil), Some(gas)) = (pu.position(Phase::Oil), pu.position(Phase::Gas)) else {
        return false;
    };
    let np = pu.num_phases();
    for cell in 0..state.num_cells() {
        let sv = &state.surface_volume()[cell * np..(cell + 1) * np];
        let ratio = if sv[oil] > 0.0 { sv[gas] / sv[oil] } else { 0.0 };
        state.gas_oil_ratio_mut()[cell] = ratio;
    }
    true
}
