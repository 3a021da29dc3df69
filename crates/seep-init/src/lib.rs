//! Initial reservoir state construction.
//!
//! [`StateInitializer`] picks exactly one [`InitStrategy`] per run,
//! builds the starting [`ReservoirState`](seep_core::ReservoirState) with
//! it, derives surface volumes, optionally rescales capillary pressure
//! (`SWATINIT`), and classifies each cell's hydrocarbon state.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod equil;
pub mod explicit;
pub mod initializer;
pub mod post;
pub mod restart;
pub mod strategy;
pub mod surface;

pub use initializer::{InitOptions, StateInitializer};
pub use strategy::InitStrategy;
