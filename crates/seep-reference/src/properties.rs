//! Constant fluid properties with Corey relative permeabilities.

use smallvec::SmallVec;

use seep_core::{Phase, PhaseUsage, PropertyModel, RelpermTable};

/// Rows in each generated relative-permeability table.
const TABLE_ROWS: usize = 11;

/// Per-phase constants.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PhaseConstants {
    density: f64,
    inverse_fvf: f64,
}

fn constants(phase: Phase) -> PhaseConstants {
    match phase {
        Phase::Water => PhaseConstants {
            density: 1000.0,
            inverse_fvf: 1.0,
        },
        Phase::Oil => PhaseConstants {
            density: 800.0,
            inverse_fvf: 1.0 / 1.2,
        },
        Phase::Gas => PhaseConstants {
            density: 100.0,
            // Bg = 0.005 rm3/sm3
            inverse_fvf: 200.0,
        },
    }
}

/// Pressure-independent properties for every cell.
///
/// Capillary pressure is linear in the wetting saturation with a slope of
/// `pc_scale`; `SWATINIT` rescaling replaces that slope with the mean
/// ratio that reproduces the initial saturation.
#[derive(Clone, Debug)]
pub struct ConstantProperties {
    phases: PhaseUsage,
    pc_scale: f64,
    use_local_perm: bool,
    tables: Vec<RelpermTable>,
}

impl ConstantProperties {
    /// Connate water saturation of the generated tables.
    pub const CONNATE_WATER: f64 = 0.2;
    /// Residual oil saturation of the generated tables.
    pub const RESIDUAL_OIL: f64 = 0.2;
    /// Corey exponent of the generated tables.
    pub const COREY_EXPONENT: i32 = 2;

    /// Properties for `phases` with no capillary pressure.
    pub fn new(phases: PhaseUsage, use_local_perm: bool) -> Self {
        let tables = phases.phases().iter().map(|&p| corey_table(p)).collect();
        Self {
            phases,
            pc_scale: 0.0,
            use_local_perm,
            tables,
        }
    }

    /// Use a linear capillary pressure `scale * (1 - s)`, in Pa.
    pub fn with_capillary_scale(mut self, scale: f64) -> Self {
        self.pc_scale = scale;
        self
    }

    /// Current capillary pressure slope.
    pub fn capillary_scale(&self) -> f64 {
        self.pc_scale
    }

    /// Whether per-cell permeability was requested.
    pub fn use_local_perm(&self) -> bool {
        self.use_local_perm
    }
}

/// Corey curve `((s - s_min) / (s_max - s_min))^n` between the phase's end
/// points.
fn corey_table(phase: Phase) -> RelpermTable {
    let (s_min, s_max) = match phase {
        Phase::Water => (ConstantProperties::CONNATE_WATER, 1.0),
        Phase::Oil => (0.0, 1.0 - ConstantProperties::CONNATE_WATER),
        Phase::Gas => (0.0, 1.0 - ConstantProperties::CONNATE_WATER),
    };
    let residual = if phase == Phase::Oil {
        ConstantProperties::RESIDUAL_OIL
    } else {
        s_min
    };
    let mut saturation = Vec::with_capacity(TABLE_ROWS);
    let mut kr = Vec::with_capacity(TABLE_ROWS);
    for row in 0..TABLE_ROWS {
        let s = s_min + (s_max - s_min) * row as f64 / (TABLE_ROWS - 1) as f64;
        let mobile = ((s - residual) / (s_max - residual)).clamp(0.0, 1.0);
        saturation.push(s);
        kr.push(mobile.powi(ConstantProperties::COREY_EXPONENT));
    }
    RelpermTable {
        region: 0,
        phase,
        saturation,
        kr,
    }
}

impl PropertyModel for ConstantProperties {
    fn num_phases(&self) -> usize {
        self.phases.num_phases()
    }

    fn densities(&self, _cell: usize) -> SmallVec<[f64; 3]> {
        self.phases
            .phases()
            .iter()
            .map(|&p| constants(p).density)
            .collect()
    }

    fn inverse_fvf(&self, _cell: usize, _pressure: f64) -> SmallVec<[f64; 3]> {
        self.phases
            .phases()
            .iter()
            .map(|&p| constants(p).inverse_fvf)
            .collect()
    }

    fn capillary_pressure(&self, saturation: &[f64]) -> Vec<f64> {
        saturation.iter().map(|s| self.pc_scale * (1.0 - s)).collect()
    }

    fn apply_swatinit_scaling(&mut self, saturation: &[f64], capillary_pressure: &[f64]) {
        let ratios: Vec<f64> = saturation
            .iter()
            .zip(capillary_pressure)
            .filter(|(s, _)| **s < 1.0)
            .map(|(s, pc)| pc / (1.0 - s))
            .collect();
        if ratios.is_empty() {
            return;
        }
        self.pc_scale = ratios.iter().sum::<f64>() / ratios.len() as f64;
        tracing::debug!(pc_scale = self.pc_scale, "capillary pressure rescaled");
    }

    fn relperm_tables(&self) -> &[RelpermTable] {
        &self.tables
    }
}
