//! Strategy selection.

use std::fmt;

use seep_core::Deck;

/// How the initial state is produced. Exactly one per run.
///
/// Variants are listed in precedence order: the first one whose trigger is
/// present wins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InitStrategy {
    /// `init_saturation` given: uniform saturations, hydrostatic pressure.
    ExplicitSaturation {
        /// Saturation of the first active phase.
        saturation: f64,
    },
    /// Deck has `EQUIL`: gravity-segregated equilibrium per region.
    Equilibration,
    /// Per-cell `PRESSURE`/`SWAT`/`SGAS` records from the deck.
    DeckRestart,
}

impl InitStrategy {
    /// Pick the strategy for this run.
    ///
    /// A pure function of `init_saturation` and the deck's keywords.
    pub fn select(init_saturation: Option<f64>, deck: &dyn Deck) -> Self {
        if let Some(saturation) = init_saturation {
            Self::ExplicitSaturation { saturation }
        } else if deck.has_keyword("EQUIL") {
            Self::Equilibration
        } else {
            Self::DeckRestart
        }
    }
}

impl fmt::Display for InitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExplicitSaturation { saturation } => {
                write!(f, "explicit saturation ({saturation})")
            }
            Self::Equilibration => f.write_str("equilibration"),
            Self::DeckRestart => f.write_str("deck initial state"),
        }
    }
}
