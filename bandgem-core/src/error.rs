//! Error types for bandgem-core.

use thiserror::Error;

/// Result type alias for geometry extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for geometry extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// No pads were provided to the extraction pipeline.
    #[error("no pads available for geometry extraction")]
    EmptyGeometry,

    /// A row collapsed below two vertices during sanitization.
    #[error("row (pitch {pitch} mm, y {y}) is degenerate: {vertices} vertex(es) after sanitization")]
    DegenerateRow {
        /// Row pitch in integer millimetres.
        pitch: i32,
        /// Canonical row y-level in millimetres.
        y: f64,
        /// Surviving vertex count.
        vertices: usize,
    },

    /// The offset reference line is vertical (single-column geometry).
    #[error("degenerate geometry: offset reference points share x = {x}")]
    DegenerateGeometry {
        /// Shared x coordinate of both reference points.
        x: f64,
    },

    /// A panel's detector-ID count disagrees with its pixel grid.
    #[error("panel {panel}: expected {expected} detector IDs for the pixel grid, found {actual}")]
    PanelIdMismatch {
        /// Panel index in discovery order.
        panel: usize,
        /// Pixel count implied by the panel's grid dimensions.
        expected: usize,
        /// Distinct detector IDs collected from the panel's rows.
        actual: usize,
    },
}
