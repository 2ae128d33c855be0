//! bandgem-core: Panel geometry extraction for Band-GEM detector arrays.
//!
//! This crate recovers the panel/row structure of a detector array from
//! per-pad corner coordinates: pads are clustered into rows keyed by
//! (pitch, y-level), rows are sanitized (sorted, deduplicated) and then
//! stitched into maximal contiguous panels.
//!

pub mod cluster;
pub mod error;
pub mod model;
pub mod offset;
pub mod pad;
pub mod panel;
pub mod row;
pub mod sanitize;

pub use cluster::cluster_rows;
pub use error::{Error, Result};
pub use model::{ExtractionStatistics, GeometryModel};
pub use offset::position_offset;
pub use pad::{Pad, Point};
pub use panel::{assemble_panels, sort_panels, Panel};
pub use row::{Row, RowBuilder, RowKey};
pub use sanitize::sanitize_row;
