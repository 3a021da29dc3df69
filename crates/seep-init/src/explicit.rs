//! Uniform saturation with a hydrostatic pressure column.

use smallvec::SmallVec;

use seep_core::{Grid, InitError, PropertyModel, ReservoirState};

use crate::initializer::InitOptions;

/// Saturation block for one cell: the first active phase gets
/// `saturation`, the second `1 - saturation`, any others 0. A single
/// phase always has saturation 1.
pub fn basic_saturation(num_phases: usize, saturation: f64) -> SmallVec<[f64; 3]> {
    let mut block: SmallVec<[f64; 3]> = SmallVec::from_elem(0.0, num_phases);
    match num_phases {
        0 => {}
        1 => block[0] = 1.0,
        _ => {
            block[0] = saturation;
            block[1] = 1.0 - saturation;
        }
    }
    block
}

/// Saturation-weighted density of the fluid mixture in a cell.
pub fn mixture_density(saturation: &[f64], densities: &[f64]) -> f64 {
    saturation
        .iter()
        .zip(densities)
        .map(|(s, rho)| s * rho)
        .sum()
}

/// Depth of the shallowest cell, or `None` for an empty grid.
pub fn shallowest_depth(grid: &dyn Grid) -> Option<f64> {
    (0..grid.num_cells())
        .map(|c| grid.cell_depth(c))
        .min_by(f64::total_cmp)
}

/// Build the state for [`InitStrategy::ExplicitSaturation`](crate::InitStrategy).
///
/// Pressure is `ref_pressure + rho_mix * g * (z - ref_z)` where `ref_z`
/// defaults to the shallowest cell depth.
pub fn initialize(
    grid: &dyn Grid,
    properties: &dyn PropertyModel,
    options: &InitOptions,
    saturation: f64,
) -> Result<ReservoirState, InitError> {
    if !(0.0..=1.0).contains(&saturation) {
        return Err(InitError::InvalidDeckState {
            reason: format!("init_saturation {saturation} is outside [0, 1]"),
        });
    }
    let np = grid.phase_usage().num_phases();
    let mut state = ReservoirState::new(grid.num_cells(), grid.num_faces(), np);
    let block = basic_saturation(np, saturation);
    let ref_z = options
        .ref_depth
        .or_else(|| shallowest_depth(grid))
        .unwrap_or(0.0);

    for cell in 0..grid.num_cells() {
        state.cell_saturation_mut(cell).copy_from_slice(&block);
        let rho = mixture_density(&block, &properties.densities(cell));
        state.pressure_mut()[cell] =
            options.ref_pressure + rho * options.gravity * (grid.cell_depth(cell) - ref_z);
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seep_core::{Phase, PhaseUsage, BARSA};
    use seep_test_utils::{MockGrid, MockProperties};

    fn options() -> InitOptions {
        InitOptions {
            gravity: 10.0,
            ..InitOptions::default()
        }
    }

    #[test]
    fn saturation_blocks() {
        assert_eq!(basic_saturation(1, 0.3).as_slice(), &[1.0]);
        assert_eq!(basic_saturation(2, 0.3).as_slice(), &[0.3, 0.7]);
        assert_eq!(basic_saturation(3, 0.2).as_slice(), &[0.2, 0.8, 0.0]);
    }

    #[test]
    fn pressure_grows_with_depth_from_shallowest_cell() {
        let grid = MockGrid::column(&[1010.0, 1000.0, 1020.0])
            .with_phases(PhaseUsage::new(&[Phase::Water, Phase::Oil]));
        let props = MockProperties::new(&[1000.0, 800.0], &[1.0, 1.0]);
        let state = initialize(&grid, &props, &options(), 0.5).unwrap();
        // rho_mix = 900, g = 10
        let p0 = 100.0 * BARSA;
        assert_eq!(state.pressure()[1], p0);
        assert!((state.pressure()[0] - (p0 + 900.0 * 10.0 * 10.0)).abs() < 1e-6);
        assert!((state.pressure()[2] - (p0 + 900.0 * 10.0 * 20.0)).abs() < 1e-6);
        assert_eq!(state.cell_saturation(2), &[0.5, 0.5]);
    }

    #[test]
    fn explicit_reference_depth_and_pressure() {
        let grid = MockGrid::column(&[50.0]).with_phases(PhaseUsage::new(&[Phase::Water]));
        let props = MockProperties::new(&[1000.0], &[1.0]);
        let opts = InitOptions {
            ref_pressure: 2.0 * BARSA,
            ref_depth: Some(0.0),
            gravity: 10.0,
            ..InitOptions::default()
        };
        let state = initialize(&grid, &props, &opts, 0.1).unwrap();
        assert_eq!(state.cell_saturation(0), &[1.0]);
        assert!((state.pressure()[0] - (2.0 * BARSA + 1000.0 * 10.0 * 50.0)).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_saturation_rejected() {
        let grid = MockGrid::column(&[0.0]);
        let props = MockProperties::black_oil();
        match initialize(&grid, &props, &options(), 1.5) {
            Err(InitError::InvalidDeckState { reason }) => assert!(reason.contains("1.5")),
            other => panic!("expected InvalidDeckState, got {other:?}"),
        }
    }

    proptest::proptest! {
        #[test]
        fn basic_saturation_sums_to_one(np in 1usize..=3, s in 0.0f64..=1.0) {
            let block = basic_saturation(np, s);
            proptest::prop_assert_eq!(block.len(), np);
            proptest::prop_assert!((block.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
    }
}
