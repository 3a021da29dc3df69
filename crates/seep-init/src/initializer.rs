//! The initializer state machine.

use seep_core::{
    Deck, Grid, InitError, PropertyModel, ReservoirState, BARSA, STANDARD_GRAVITY,
};

use crate::post::{self, PhaseSwitches};
use crate::strategy::InitStrategy;
use crate::{equil, explicit, restart, surface};

/// Run options that influence initialization.
#[derive(Clone, Debug, PartialEq)]
pub struct InitOptions {
    /// Uniform saturation of the first active phase (`init_saturation`).
    pub init_saturation: Option<f64>,
    /// Reference pressure in Pa for the explicit strategy (`ref_pressure`).
    pub ref_pressure: f64,
    /// Reference depth in metres (`ref_z`); shallowest cell when absent.
    pub ref_depth: Option<f64>,
    /// Gravitational acceleration in m/s², zero under `NOGRAV`.
    pub gravity: f64,
}

impl InitOptions {
    /// Default reference pressure, in bar.
    pub const DEFAULT_REF_PRESSURE_BAR: f64 = 100.0;
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            init_saturation: None,
            ref_pressure: Self::DEFAULT_REF_PRESSURE_BAR * BARSA,
            ref_depth: None,
            gravity: STANDARD_GRAVITY,
        }
    }
}

/// Builds the starting [`ReservoirState`].
///
/// Selection happens once per call to [`initialize`](Self::initialize);
/// the chosen strategy alone produces the state, which is then finished
/// by the shared post-processing steps.
#[derive(Clone, Debug, Default)]
pub struct StateInitializer {
    options: InitOptions,
}

impl StateInitializer {
    /// An initializer with the given options.
    pub fn new(options: InitOptions) -> Self {
        Self { options }
    }

    /// The options in effect.
    pub fn options(&self) -> &InitOptions {
        &self.options
    }

    /// The strategy [`initialize`](Self::initialize) would use for `deck`.
    pub fn strategy(&self, deck: &dyn Deck) -> InitStrategy {
        InitStrategy::select(self.options.init_saturation, deck)
    }

    /// Build, post-process, and return the initial state.
    ///
    /// `properties` is mutable because `SWATINIT` rescales its capillary
    /// curves.
    pub fn initialize(
        &self,
        deck: &dyn Deck,
        grid: &dyn Grid,
        properties: &mut dyn PropertyModel,
    ) -> Result<ReservoirState, InitError> {
        let pu = grid.phase_usage();
        if pu.num_phases() != properties.num_phases() {
            return Err(InitError::PhaseCountMismatch {
                grid: pu.num_phases(),
                properties: properties.num_phases(),
            });
        }

        let strategy = self.strategy(deck);
        let _span =
            tracing::info_span!("initialize", %strategy, cells = grid.num_cells()).entered();
        let gravity = self.options.gravity;
        let mut state = match strategy {
            InitStrategy::ExplicitSaturation { saturation } => {
                explicit::initialize(grid, properties, &self.options, saturation)?
            }
            InitStrategy::Equilibration => equil::initialize(deck, grid, properties, gravity)?,
            InitStrategy::DeckRestart => restart::initialize(deck, grid, properties, gravity)?,
        };

        surface::compute_surface_volumes(grid, properties, &mut state);
        if matches!(strategy, InitStrategy::ExplicitSaturation { .. }) {
            surface::compute_gas_oil_ratio(pu, &mut state);
        }
        if post::apply_swatinit(deck, properties, &state) {
            tracing::debug!("capillary pressure rescaled to initial saturation");
        }
        post::classify_hydrocarbons(pu, PhaseSwitches::from_deck(deck), &mut state);
        tracing::debug!("initial state ready");
        Ok(state)
    }
}
