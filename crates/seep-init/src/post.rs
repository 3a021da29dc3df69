//! Post-processing shared by every strategy.

use seep_core::{Deck, HydrocarbonState, Phase, PhaseUsage, PropertyModel, ReservoirState};

/// Saturations below this count as absent when classifying cells.
pub const PRESENCE_EPSILON: f64 = 1e-6;

/// If the deck has `SWATINIT`, rescale the property model's capillary
/// curves so they reproduce the initial saturation.
///
/// Returns whether rescaling happened.
pub fn apply_swatinit(
    deck: &dyn Deck,
    properties: &mut dyn PropertyModel,
    state: &ReservoirState,
) -> bool {
    if !deck.has_keyword("SWATINIT") {
        return false;
    }
    let pc = properties.capillary_pressure(state.saturation());
    properties.apply_swatinit_scaling(state.saturation(), &pc);
    true
}

/// Which phase-transition switches the deck enables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseSwitches {
    /// `DISGAS`: gas may dissolve in oil.
    pub dissolved_gas: bool,
    /// `VAPOIL`: oil may vaporize into gas.
    pub vaporized_oil: bool,
}

impl PhaseSwitches {
    /// Read the switches from the deck's keywords.
    pub fn from_deck(deck: &dyn Deck) -> Self {
        Self {
            dissolved_gas: deck.has_keyword("DISGAS"),
            vaporized_oil: deck.has_keyword("VAPOIL"),
        }
    }
}

/// Classify each cell's hydrocarbon state.
///
/// With oil active: both hydrocarbons present gives `GasAndOil`; only gas
/// gives `GasOnly` under `VAPOIL`; no free gas gives `OilOnly` under
/// `DISGAS`; anything else stays `GasAndOil`. Without oil, cells are
/// `GasOnly` when gas is active and `OilOnly` otherwise.
pub fn classify_hydrocarbons(pu: &PhaseUsage, switches: PhaseSwitches, state: &mut ReservoirState) {
    let oil = pu.position(Phase::Oil);
    let gas = pu.position(Phase::Gas);
    for cell in 0..state.num_cells() {
        let block = state.cell_saturation(cell);
        let present = |slot: Option<usize>| slot.is_some_and(|i| block[i] >= PRESENCE_EPSILON);
        let has_oil = present(oil);
        let has_gas = present(gas);
        let classified = match oil {
            None if gas.is_some() => HydrocarbonState::GasOnly,
            None => HydrocarbonState::OilOnly,
            Some(_) => match (has_oil, has_gas) {
                (true, true) => HydrocarbonState::GasAndOil,
                (false, true) if switches.vaporized_oil => HydrocarbonState::GasOnly,
                (_, false) if switches.dissolved_gas => HydrocarbonState::OilOnly,
                _ => HydrocarbonState::GasAndOil,
            },
        };
        state.hydrocarbon_state_mut()[cell] = classified;
    }
}
