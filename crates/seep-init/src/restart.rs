//! State from the deck's per-cell initial-state records.

use seep_core::{
    Deck, Grid, InitError, InitialStateRecords, Phase, PhaseUsage, PropertyModel, ReservoirState,
};

use crate::explicit::mixture_density;

/// Saturations below this are treated as round-off.
const SATURATION_TOLERANCE: f64 = 1e-9;

/// Build the state for [`InitStrategy::DeckRestart`](crate::InitStrategy).
///
/// Saturations of the phases with records (`SWAT`, `SGAS`) are taken as
/// given; the closing phase (oil if active, else gas, else water) gets the
/// rest. Cells without a `PRESSURE` value are completed hydrostatically
/// from the shallowest cell that has one. `RS`, when given, becomes the
/// gas-oil ratio.
pub fn initialize(
    deck: &dyn Deck,
    grid: &dyn Grid,
    properties: &dyn PropertyModel,
    gravity: f64,
) -> Result<ReservoirState, InitError> {
    let records = deck
        .initial_state()
        .ok_or(InitError::MissingRecords { keyword: "PRESSURE" })?;
    let n = grid.num_cells();
    let pu = grid.phase_usage();
    let pressure = records
        .pressure
        .as_deref()
        .ok_or(InitError::MissingRecords { keyword: "PRESSURE" })?;
    check_len("PRESSURE", pressure.len(), n)?;

    let mut state = ReservoirState::new(n, grid.num_faces(), pu.num_phases());
    fill_saturations(records, pu, &mut state)?;

    if let Some(rs) = &records.dissolved_gas_ratio {
        check_len("RS", rs.len(), n)?;
        if pu.is_active(Phase::Oil) && pu.is_active(Phase::Gas) {
            state.gas_oil_ratio_mut().copy_from_slice(rs);
        }
    }

    let reference = (0..n)
        .filter_map(|c| pressure[c].map(|p| (c, p)))
        .min_by(|(a, _), (b, _)| grid.cell_depth(*a).total_cmp(&grid.cell_depth(*b)));
    let Some((ref_cell, ref_pressure)) = reference else {
        if n == 0 {
            return Ok(state);
        }
        return Err(InitError::InvalidDeckState {
            reason: "PRESSURE gives no value for any cell".into(),
        });
    };
    let ref_depth = grid.cell_depth(ref_cell);
    for (cell, given) in pressure.iter().enumerate() {
        let value = match given {
            Some(p) => *p,
            None => {
                let rho = mixture_density(state.cell_saturation(cell), &properties.densities(cell));
                ref_pressure + rho * gravity * (grid.cell_depth(cell) - ref_depth)
            }
        };
        state.pressure_mut()[cell] = value;
    }
    Ok(state)
}

fn check_len(keyword: &'static str, found: usize, expected: usize) -> Result<(), InitError> {
    if found == expected {
        Ok(())
    } else {
        Err(InitError::RecordLength {
            keyword,
            found,
            expected,
        })
    }
}

fn closing_phase(pu: &PhaseUsage) -> Option<Phase> {
    [Phase::Oil, Phase::Gas, Phase::Water]
        .into_iter()
        .find(|&p| pu.is_active(p))
}

fn fill_saturations(
    records: &InitialStateRecords,
    pu: &PhaseUsage,
    state: &mut ReservoirState,
) -> Result<(), InitError> {
    let n = state.num_cells();
    let Some(closing) = closing_phase(pu) else {
        return Ok(());
    };

    let mut given: Vec<(usize, &[f64])> = Vec::new();
    for (phase, keyword, column) in [
        (Phase::Water, "SWAT", records.water_saturation.as_deref()),
        (Phase::Gas, "SGAS", records.gas_saturation.as_deref()),
    ] {
        if phase == closing {
            continue;
        }
        let Some(slot) = pu.position(phase) else {
            continue;
        };
        let column = column.ok_or(InitError::MissingRecords { keyword })?;
        check_len(keyword, column.len(), n)?;
        given.push((slot, column));
    }

    let closing_slot = pu.position(closing).unwrap_or_default();
    for cell in 0..n {
        let block = state.cell_saturation_mut(cell);
        let mut sum = 0.0;
        for &(slot, column) in &given {
            block[slot] = column[cell];
            sum += column[cell];
        }
        let invalid = given.iter().any(|&(_, column)| column[cell] < -SATURATION_TOLERANCE)
            || sum > 1.0 + SATURATION_TOLERANCE;
        if invalid {
            return Err(InitError::InvalidDeckState {
                reason: format!("saturations in cell {cell} sum to {sum}, outside [0, 1]"),
            });
        }
        block[closing_slot] = (1.0 - sum).max(0.0);
    }
    Ok(())
}
