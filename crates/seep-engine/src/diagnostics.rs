//! Relative-permeability sanity checks.
//!
//! Findings are advisory: the driver logs them and carries on.

use std::collections::BTreeMap;
use std::fmt;

use seep_core::{Phase, RelpermTable, Severity};

/// One diagnostic about a relative-permeability table.
#[derive(Clone, Debug, PartialEq)]
pub struct Finding {
    /// [`Severity::Warning`] for suspicious data, [`Severity::Problem`] for
    /// data the simulator cannot use as intended.
    pub severity: Severity,
    /// Zero-based saturation region.
    pub region: usize,
    /// Phase of the offending table, `None` for cross-table checks.
    pub phase: Option<Phase>,
    /// What is wrong.
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Some(phase) => write!(
                f,
                "{phase} relperm table, region {}: {}",
                self.region + 1,
                self.message
            ),
            None => write!(f, "saturation region {}: {}", self.region + 1, self.message),
        }
    }
}

/// Runs the table checks.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticsRunner {
    tolerance: f64,
}

impl Default for DiagnosticsRunner {
    fn default() -> Self {
        Self { tolerance: 1e-9 }
    }
}

impl DiagnosticsRunner {
    /// A runner with the default round-off tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every table, then the per-region end points.
    pub fn run(&self, tables: &[RelpermTable]) -> Vec<Finding> {
        let mut findings = Vec::new();
        for table in tables {
            self.check_table(table, &mut findings);
        }
        self.check_end_points(tables, &mut findings);
        findings
    }

    fn check_table(&self, table: &RelpermTable, findings: &mut Vec<Finding>) {
        let mut report = |severity, message: String| {
            findings.push(Finding {
                severity,
                region: table.region,
                phase: Some(table.phase),
                message,
            });
        };
        let (sat, kr) = (&table.saturation, &table.kr);
        if sat.len() != kr.len() {
            report(
                Severity::Problem,
                format!("{} saturations but {} kr values", sat.len(), kr.len()),
            );
            return;
        }
        if sat.len() < 2 {
            report(
                Severity::Problem,
                format!("needs at least two rows, found {}", sat.len()),
            );
            return;
        }

        let tol = self.tolerance;
        let outside = |v: f64| v < -tol || v > 1.0 + tol;
        if let Some((row, v)) = sat.iter().enumerate().find(|(_, v)| outside(**v)) {
            report(
                Severity::Problem,
                format!("saturation {v} at row {} is outside [0, 1]", row + 1),
            );
        }
        if let Some(row) = sat.windows(2).position(|w| w[1] <= w[0]) {
            report(
                Severity::Problem,
                format!("saturations are not strictly increasing at row {}", row + 2),
            );
        }
        if let Some((row, v)) = kr.iter().enumerate().find(|(_, v)| outside(**v)) {
            report(
                Severity::Problem,
                format!("kr {v} at row {} is outside [0, 1]", row + 1),
            );
        }
        if let Some(row) = kr.windows(2).position(|w| w[1] < w[0] - tol) {
            report(
                Severity::Warning,
                format!("kr decreases at row {}", row + 2),
            );
        }
        if kr[0].abs() > tol {
            report(
                Severity::Warning,
                format!("kr at the first row is {}, expected 0", kr[0]),
            );
        }
    }

    /// Connate water plus residual oil must leave room for mobile fluid.
    fn check_end_points(&self, tables: &[RelpermTable], findings: &mut Vec<Finding>) {
        let mut regions: BTreeMap<usize, (Option<f64>, Option<f64>)> = BTreeMap::new();
        for table in tables {
            if table.saturation.is_empty() || table.saturation.len() != table.kr.len() {
                continue;
            }
            let entry = regions.entry(table.region).or_default();
            match table.phase {
                Phase::Water => entry.0 = Some(table.saturation[0]),
                Phase::Oil => entry.1 = Some(self.residual_saturation(table)),
                Phase::Gas => {}
            }
        }
        for (region, ends) in regions {
            let (Some(swc), Some(sor)) = ends else {
                continue;
            };
            if swc + sor >= 1.0 - self.tolerance {
                findings.push(Finding {
                    severity: Severity::Problem,
                    region,
                    phase: None,
                    message: format!(
                        "connate water {swc} plus residual oil {sor} leaves no mobile saturation"
                    ),
                });
            }
        }
    }

    /// Largest tabulated saturation before kr becomes positive.
    fn residual_saturation(&self, table: &RelpermTable) -> f64 {
        table
            .saturation
            .iter()
            .zip(&table.kr)
            .take_while(|(_, kr)| **kr <= self.tolerance)
            .last()
            .map_or(0.0, |(s, _)| *s)
    }
}
