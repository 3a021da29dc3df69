//! Benchmark profiles for the Seep simulation driver.
//!
//! Each profile is a deck plus matching reference grid and properties,
//! ready to hand to [`StateInitializer`](seep_init::StateInitializer):
//!
//! - [`equil_profile`]: one `EQUIL` region over a layered box
//! - [`restart_profile`]: explicit `PRESSURE`/`SWAT`/`SGAS` arrays, every
//!   other cell's pressure left for hydrostatic completion

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::fmt::Write;
use std::path::Path;

use seep_core::PhaseUsage;
use seep_reference::{CartesianGrid, ConstantProperties, KeywordDeck};

/// Depth of the top of every profile grid, in metres.
pub const TOP_DEPTH: f64 = 2000.0;
/// Layer thickness of every profile grid, in metres.
pub const LAYER_THICKNESS: f64 = 5.0;

/// A deck with its grid and properties.
pub struct Profile {
    /// The parsed deck.
    pub deck: KeywordDeck,
    /// Grid matching the deck's `DIMENS`.
    pub grid: CartesianGrid,
    /// Black-oil constant properties.
    pub properties: ConstantProperties,
}

fn build(text: &str, dims: [usize; 3]) -> Profile {
    let deck = KeywordDeck::parse(text, Path::new("BENCH.DATA"));
    Profile {
        deck,
        grid: CartesianGrid::new(dims, TOP_DEPTH, LAYER_THICKNESS, PhaseUsage::black_oil()),
        properties: ConstantProperties::new(PhaseUsage::black_oil(), true),
    }
}

fn header(dims: [usize; 3]) -> String {
    format!(
        "DIMENS\n {} {} {} /\nWATER\nOIL\nGAS\nDISGAS\n",
        dims[0], dims[1], dims[2]
    )
}

/// Gas cap, oil leg, and aquifer across `dims`, contacts at a third and
/// two thirds of the depth range.
pub fn equil_profile(dims: [usize; 3]) -> Profile {
    let height = dims[2] as f64 * LAYER_THICKNESS;
    let goc = TOP_DEPTH + height / 3.0;
    let woc = TOP_DEPTH + 2.0 * height / 3.0;
    let text = format!(
        "{}EQUIL\n {goc} 250 {woc} 0.2 {goc} 0 /\n",
        header(dims)
    );
    build(&text, dims)
}

/// Per-cell initial-state arrays; odd cells have defaulted pressure.
pub fn restart_profile(dims: [usize; 3]) -> Profile {
    let cells: usize = dims.iter().product();
    let mut text = header(dims);
    text.push_str("PRESSURE\n");
    for cell in 0..cells {
        let item = if cell % 2 == 0 { "250" } else { "1*" };
        // Writing to a String cannot fail.
        let _ = write!(text, " {item}");
    }
    text.push_str(" /\n");
    let _ = write!(text, "SWAT\n {cells}*0.25 /\nSGAS\n {cells}*0.25 /\n");
    build(&text, dims)
}
