//! bandgem-io: File I/O for Band-GEM geometry processing.
//!
//! This crate reads the tab-delimited engineering coordinate file into
//! centroid-relative pads, loads the instrument placement configuration,
//! and writes the Mantid instrument-definition XML plus the companion
//! detector-ID map CSV.
//!

pub mod config;
pub mod coordinate;
mod error;
pub mod idf;
pub mod map;

pub use config::InstrumentConfig;
pub use coordinate::{load_pads, valid_ids, PadTable};
pub use error::{Error, Result};
pub use idf::IdfWriter;
pub use map::{DetectorMap, DetectorMapWriter};
