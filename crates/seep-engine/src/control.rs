//! Run-control settings resolved from the deck and the parameters.

use seep_config::{ConfigError, ResolvedConfig};
use seep_core::{Deck, STANDARD_GRAVITY};

/// Settings fixed once the case is loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct RunControl {
    /// Stop after initialization (deck `NOSIM`, overridden by `nosim`).
    pub init_only: bool,
    /// Restart write cadence override (`output_interval`).
    pub output_interval: Option<usize>,
    /// Gravitational acceleration in m/s². Zero under `NOGRAV`.
    pub gravity: f64,
}

impl RunControl {
    /// Combine the deck's switches with the parameter overrides.
    ///
    /// `gravity` is only consulted when the deck does not disable gravity,
    /// so it is reported as unused under `NOGRAV`.
    pub fn resolve(config: &ResolvedConfig, deck: &dyn Deck) -> Result<Self, ConfigError> {
        let init_only = match config.get::<bool>("nosim")? {
            Some(nosim) => nosim,
            None => deck.init_only(),
        };
        let output_interval = config.get::<usize>("output_interval")?;
        let gravity = if deck.has_keyword("NOGRAV") {
            0.0
        } else {
            config.get_or("gravity", STANDARD_GRAVITY)?
        };
        Ok(Self {
            init_only,
            output_interval,
            gravity,
        })
    }
}
