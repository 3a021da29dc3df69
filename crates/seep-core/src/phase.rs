//! Fluid phases and the per-run [`PhaseUsage`] table.

use smallvec::SmallVec;
use std::fmt;

/// A fluid phase of the black-oil model.
///
/// The declaration order is the canonical storage order: whenever per-cell
/// arrays carry one entry per active phase, water comes first, then oil,
/// then gas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Aqueous phase.
    Water,
    /// Liquid hydrocarbon phase.
    Oil,
    /// Vapour hydrocarbon phase.
    Gas,
}

impl Phase {
    /// All phases in canonical order.
    pub const ALL: [Phase; 3] = [Phase::Water, Phase::Oil, Phase::Gas];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Water => "water",
            Self::Oil => "oil",
            Self::Gas => "gas",
        };
        f.write_str(name)
    }
}

/// The set of active phases and their positions in per-cell arrays.
///
/// Construction deduplicates and sorts into canonical order, so
/// `position()` is stable regardless of how the phases were listed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhaseUsage {
    active: SmallVec<[Phase; 3]>,
}

impl PhaseUsage {
    /// Build a phase usage table from any list of phases.
    pub fn new(phases: &[Phase]) -> Self {
        let mut active: SmallVec<[Phase; 3]> = phases.iter().copied().collect();
        active.sort();
        active.dedup();
        Self { active }
    }

    /// Three-phase black-oil usage (water, oil, gas).
    pub fn black_oil() -> Self {
        Self::new(&Phase::ALL)
    }

    /// Number of active phases.
    pub fn num_phases(&self) -> usize {
        self.active.len()
    }

    /// Whether `phase` is active.
    pub fn is_active(&self, phase: Phase) -> bool {
        self.active.contains(&phase)
    }

    /// Index of `phase` within a cell's per-phase block, if active.
    pub fn position(&self, phase: Phase) -> Option<usize> {
        self.active.iter().position(|&p| p == phase)
    }

    /// Active phases in canonical order.
    pub fn phases(&self) -> &[Phase] {
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_follow_canonical_order() {
        let pu = PhaseUsage::new(&[Phase::Gas, Phase::Oil]);
        assert_eq!(pu.num_phases(), 2);
        assert_eq!(pu.position(Phase::Oil), Some(0));
        assert_eq!(pu.position(Phase::Gas), Some(1));
        assert_eq!(pu.position(Phase::Water), None);
    }

    #[test]
    fn duplicates_are_collapsed() {
        let pu = PhaseUsage::new(&[Phase::Water, Phase::Water, Phase::Oil]);
        assert_eq!(pu.phases(), &[Phase::Water, Phase::Oil]);
    }

    #[test]
    fn black_oil_has_three_phases() {
        let pu = PhaseUsage::black_oil();
        assert!(Phase::ALL.iter().all(|&p| pu.is_active(p)));
        assert_eq!(pu.position(Phase::Gas), Some(2));
    }
}
