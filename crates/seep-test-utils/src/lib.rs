//! Test utilities and mock collaborators for Seep development.
//!
//! Provides in-memory implementations of the collaborator traits
//! ([`Deck`], [`Grid`], [`PropertyModel`]) plus a [`SharedBuffer`] for
//! capturing stream output. Stepper, writer, and solver fixtures live in
//! [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use seep_core::{
    Deck, DeckMessage, EquilRecord, Grid, InitialStateRecords, MessageLimits, PhaseUsage,
    PropertyModel, RelpermTable,
};
use smallvec::SmallVec;

// ── MockDeck ───────────────────────────────────────────────────────

/// In-memory [`Deck`] assembled with builder methods.
#[derive(Clone, Debug, Default)]
pub struct MockDeck {
    keywords: BTreeSet<String>,
    messages: Vec<DeckMessage>,
    limits: MessageLimits,
    report_steps: Vec<f64>,
    restart_step: usize,
    equil: Vec<EquilRecord>,
    initial_state: Option<InitialStateRecords>,
}

impl MockDeck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyword(mut self, keyword: &str) -> Self {
        self.keywords.insert(keyword.to_string());
        self
    }

    pub fn with_message(mut self, message: DeckMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_limits(mut self, limits: MessageLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_report_steps(mut self, steps: Vec<f64>) -> Self {
        self.report_steps = steps;
        self
    }

    pub fn with_restart_step(mut self, step: usize) -> Self {
        self.restart_step = step;
        self
    }

    /// Adds the record and the `EQUIL` keyword.
    pub fn with_equil(mut self, record: EquilRecord) -> Self {
        self.keywords.insert("EQUIL".to_string());
        self.equil.push(record);
        self
    }

    pub fn with_initial_state(mut self, records: InitialStateRecords) -> Self {
        self.initial_state = Some(records);
        self
    }
}

impl Deck for MockDeck {
    fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.contains(keyword)
    }

    fn messages(&self) -> &[DeckMessage] {
        &self.messages
    }

    fn message_limits(&self) -> MessageLimits {
        self.limits
    }

    fn report_steps(&self) -> &[f64] {
        &self.report_steps
    }

    fn restart_step(&self) -> usize {
        self.restart_step
    }

    fn equilibration_records(&self) -> &[EquilRecord] {
        &self.equil
    }

    fn initial_state(&self) -> Option<&InitialStateRecords> {
        self.initial_state.as_ref()
    }
}

// ── MockGrid ───────────────────────────────────────────────────────

/// Column of cells with explicit depths and equilibration regions.
#[derive(Clone, Debug)]
pub struct MockGrid {
    depths: Vec<f64>,
    regions: Vec<usize>,
    faces: usize,
    phases: PhaseUsage,
}

impl MockGrid {
    /// One cell per depth, all in region 0, black-oil phases.
    pub fn column(depths: &[f64]) -> Self {
        Self {
            depths: depths.to_vec(),
            regions: vec![0; depths.len()],
            faces: depths.len().saturating_sub(1),
            phases: PhaseUsage::black_oil(),
        }
    }

    pub fn with_phases(mut self, phases: PhaseUsage) -> Self {
        self.phases = phases;
        self
    }

    pub fn with_regions(mut self, regions: Vec<usize>) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_faces(mut self, faces: usize) -> Self {
        self.faces = faces;
        self
    }
}

impl Grid for MockGrid {
    fn num_cells(&self) -> usize {
        self.depths.len()
    }

    fn num_faces(&self) -> usize {
        self.faces
    }

    fn cell_depth(&self, cell: usize) -> f64 {
        self.depths[cell]
    }

    fn equilibration_region(&self, cell: usize) -> usize {
        self.regions[cell]
    }

    fn phase_usage(&self) -> &PhaseUsage {
        &self.phases
    }
}

// ── MockProperties ─────────────────────────────────────────────────

/// Constant densities and formation volume factors, linear capillary
/// pressure, and a record of SWATINIT rescaling calls.
#[derive(Clone, Debug)]
pub struct MockProperties {
    densities: Vec<f64>,
    inverse_fvf: Vec<f64>,
    pc_slope: f64,
    tables: Vec<RelpermTable>,
    pub swatinit_calls: Vec<(Vec<f64>, Vec<f64>)>,
}

impl MockProperties {
    /// `densities` and `inverse_fvf` hold one entry per active phase.
    pub fn new(densities: &[f64], inverse_fvf: &[f64]) -> Self {
        Self {
            densities: densities.to_vec(),
            inverse_fvf: inverse_fvf.to_vec(),
            pc_slope: 0.0,
            tables: Vec::new(),
            swatinit_calls: Vec::new(),
        }
    }

    /// Water 1000, oil 800, gas 100 kg/m³; unit formation volume factors.
    pub fn black_oil() -> Self {
        Self::new(&[1000.0, 800.0, 100.0], &[1.0, 1.0, 1.0])
    }

    /// Capillary pressure `slope * (1 - s)` for every entry.
    pub fn with_pc_slope(mut self, slope: f64) -> Self {
        self.pc_slope = slope;
        self
    }

    pub fn with_tables(mut self, tables: Vec<RelpermTable>) -> Self {
        self.tables = tables;
        self
    }
}

impl PropertyModel for MockProperties {
    fn num_phases(&self) -> usize {
        self.densities.len()
    }

    fn densities(&self, _cell: usize) -> SmallVec<[f64; 3]> {
        SmallVec::from_slice(&self.densities)
    }

    fn inverse_fvf(&self, _cell: usize, _pressure: f64) -> SmallVec<[f64; 3]> {
        SmallVec::from_slice(&self.inverse_fvf)
    }

    fn capillary_pressure(&self, saturation: &[f64]) -> Vec<f64> {
        saturation.iter().map(|s| self.pc_slope * (1.0 - s)).collect()
    }

    fn apply_swatinit_scaling(&mut self, saturation: &[f64], capillary_pressure: &[f64]) {
        self.swatinit_calls
            .push((saturation.to_vec(), capillary_pressure.to_vec()));
    }

    fn relperm_tables(&self) -> &[RelpermTable] {
        &self.tables
    }
}

// ── SharedBuffer ───────────────────────────────────────────────────

/// Cloneable in-memory writer; every clone appends to the same buffer.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| io::Error::other("shared buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
