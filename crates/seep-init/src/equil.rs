//! Sharp-contact hydrostatic equilibration.
//!
//! Each equilibration region is split by its contacts into a gas cap
//! (above the gas-oil contact), an oil leg, and an aquifer (below the
//! water-oil contact). Every cell is filled entirely by the phase of its
//! zone, and its pressure is that phase's hydrostatic pressure:
//!
//! - oil: `p_o(z) = p_datum + rho_o * g * (z - z_datum)`
//! - water: `p_w(z) = p_o(woc) - pc_ow(woc) + rho_w * g * (z - woc)`
//! - gas: `p_g(z) = p_o(goc) + pc_go(goc) + rho_g * g * (z - goc)`
//!
//! When a zone's phase is inactive the cell falls back to the nearest
//! active phase.

use seep_core::{
    Deck, EquilRecord, Grid, InitError, Phase, PhaseUsage, PropertyModel, ReservoirState,
};

/// Build the state for [`InitStrategy::Equilibration`](crate::InitStrategy).
pub fn initialize(
    deck: &dyn Deck,
    grid: &dyn Grid,
    properties: &dyn PropertyModel,
    gravity: f64,
) -> Result<ReservoirState, InitError> {
    let records = deck.equilibration_records();
    if records.is_empty() {
        return Err(InitError::MissingRecords { keyword: "EQUIL" });
    }
    for (region, record) in records.iter().enumerate() {
        if record.gas_oil_contact > record.water_oil_contact {
            return Err(InitError::InvalidDeckState {
                reason: format!(
                    "EQUIL region {}: gas-oil contact {} lies below water-oil contact {}",
                    region + 1,
                    record.gas_oil_contact,
                    record.water_oil_contact
                ),
            });
        }
    }

    let pu = grid.phase_usage();
    let mut state = ReservoirState::new(grid.num_cells(), grid.num_faces(), pu.num_phases());
    for cell in 0..grid.num_cells() {
        let region = grid.equilibration_region(cell);
        let record = records.get(region).ok_or(InitError::MissingRegion {
            cell,
            region,
            records: records.len(),
        })?;
        let depth = grid.cell_depth(cell);
        let densities = properties.densities(cell);
        let density = |phase| pu.position(phase).map(|i| densities[i]);

        let Some(phase) = zone_phase(record, depth, pu) else {
            continue;
        };
        let Some(slot) = pu.position(phase) else {
            continue;
        };
        state.cell_saturation_mut(cell)[slot] = 1.0;
        state.pressure_mut()[cell] = phase_pressure(record, phase, depth, gravity, density);
    }
    Ok(state)
}

/// The active phase filling a cell at `depth`.
fn zone_phase(record: &EquilRecord, depth: f64, pu: &PhaseUsage) -> Option<Phase> {
    let preference: [Phase; 3] = if depth > record.water_oil_contact {
        [Phase::Water, Phase::Oil, Phase::Gas]
    } else if depth > record.gas_oil_contact {
        [Phase::Oil, Phase::Water, Phase::Gas]
    } else {
        [Phase::Gas, Phase::Oil, Phase::Water]
    };
    preference.into_iter().find(|&p| pu.is_active(p))
}

fn phase_pressure<F>(
    record: &EquilRecord,
    phase: Phase,
    depth: f64,
    gravity: f64,
    density: F,
) -> f64
where
    F: Fn(Phase) -> Option<f64>,
{
    // The oil gradient anchors the column; without oil, the phase itself does.
    let rho_ref = density(Phase::Oil)
        .or_else(|| density(phase))
        .unwrap_or(0.0);
    let oil_line = |z: f64| record.datum_pressure + rho_ref * gravity * (z - record.datum_depth);
    let rho = density(phase).unwrap_or(rho_ref);
    match phase {
        Phase::Oil => oil_line(depth),
        Phase::Water => {
            let woc = record.water_oil_contact;
            oil_line(woc) - record.water_oil_pc + rho * gravity * (depth - woc)
        }
        Phase::Gas => {
            let goc = record.gas_oil_contact;
            oil_line(goc) + record.gas_oil_pc + rho * gravity * (depth - goc)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seep_test_utils::{MockDeck, MockGrid, MockProperties};

    fn record() -> EquilRecord {
        EquilRecord {
            datum_depth: 1000.0,
            datum_pressure: 2.0e7,
            water_oil_contact: 1050.0,
            water_oil_pc: 0.0,
            gas_oil_contact: 1010.0,
            gas_oil_pc: 0.0,
        }
    }

    #[test]
    fn zones_follow_contacts() {
        let deck = MockDeck::new().with_equil(record());
        let grid = MockGrid::column(&[1000.0, 1030.0, 1060.0]);
        let props = MockProperties::black_oil();
        let s = initialize(&deck, &grid, &props, 10.0).unwrap();
        assert_eq!(s.cell_saturation(0), &[0.0, 0.0, 1.0]);
        assert_eq!(s.cell_saturation(1), &[0.0, 1.0, 0.0]);
        assert_eq!(s.cell_saturation(2), &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn pressures_are_continuous_at_contacts_without_pc() {
        let deck = MockDeck::new().with_equil(record());
        let grid = MockGrid::column(&[1030.0, 1050.0 + 1e-9]);
        let props = MockProperties::black_oil();
        let s = initialize(&deck, &grid, &props, 10.0).unwrap();
        let oil = 2.0e7 + 800.0 * 10.0 * 30.0;
        assert!((s.pressure()[0] - oil).abs() < 1e-6);
        let at_woc = 2.0e7 + 800.0 * 10.0 * 50.0;
        assert!((s.pressure()[1] - at_woc).abs() < 1e-3);
    }

    #[test]
    fn capillary_pressure_offsets_water() {
        let mut rec = record();
        rec.water_oil_pc = 1.0e5;
        let deck = MockDeck::new().with_equil(rec);
        let grid = MockGrid::column(&[1060.0]);
        let props = MockProperties::black_oil();
        let s = initialize(&deck, &grid, &props, 10.0).unwrap();
        let expected = 2.0e7 + 800.0 * 10.0 * 50.0 - 1.0e5 + 1000.0 * 10.0 * 10.0;
        assert!((s.pressure()[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn inactive_gas_falls_back_to_oil() {
        let deck = MockDeck::new().with_equil(record());
        let grid = MockGrid::column(&[1000.0])
            .with_phases(PhaseUsage::new(&[Phase::Water, Phase::Oil]));
        let props = MockProperties::new(&[1000.0, 800.0], &[1.0, 1.0]);
        let s = initialize(&deck, &grid, &props, 10.0).unwrap();
        assert_eq!(s.cell_saturation(0), &[0.0, 1.0]);
        assert_eq!(s.pressure()[0], 2.0e7);
    }

    #[test]
    fn missing_records() {
        let deck = MockDeck::new().with_keyword("EQUIL");
        let grid = MockGrid::column(&[1.0]);
        match initialize(&deck, &grid, &MockProperties::black_oil(), 9.8) {
            Err(InitError::MissingRecords { keyword }) => assert_eq!(keyword, "EQUIL"),
            other => panic!("expected MissingRecords, got {other:?}"),
        }
    }

    #[test]
    fn region_without_record() {
        let deck = MockDeck::new().with_equil(record());
        let grid = MockGrid::column(&[1.0, 2.0]).with_regions(vec![0, 1]);
        match initialize(&deck, &grid, &MockProperties::black_oil(), 9.8) {
            Err(InitError::MissingRegion { cell, region, records }) => {
                assert_eq!((cell, region, records), (1, 1, 1));
            }
            other => panic!("expected MissingRegion, got {other:?}"),
        }
    }

    #[test]
    fn inverted_contacts_rejected() {
        let mut rec = record();
        rec.gas_oil_contact = 1100.0;
        let deck = MockDeck::new().with_equil(rec);
        let grid = MockGrid::column(&[1.0]);
        assert!(matches!(
            initialize(&deck, &grid, &MockProperties::black_oil(), 9.8),
            Err(InitError::InvalidDeckState { .. })
        ));
    }
}
