//! Pad types: the raw per-detector quadrilateral geometry.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D point in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    /// X coordinate (horizontal, along a row).
    pub x: f64,
    /// Y coordinate (vertical, across rows).
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One physical detector pad: an ID and four corner positions.
///
/// Coordinates are centroid-relative millimetres once loaded. Corners are
/// in file order: corners 0 and 1 form one vertical edge of the
/// quadrilateral, corners 2 and 3 the other.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pad {
    /// Physical detector ID.
    pub det_id: u32,
    /// Pad centre.
    pub centre: Point,
    /// Corner positions, paired into vertical edges (0,1) and (2,3).
    pub corners: [Point; 4],
}

impl Pad {
    /// Creates a new pad.
    #[inline]
    pub fn new(det_id: u32, centre: Point, corners: [Point; 4]) -> Self {
        Self {
            det_id,
            centre,
            corners,
        }
    }

    /// Returns the two vertical edges as corner pairs.
    #[inline]
    pub fn vertical_edges(&self) -> [(Point, Point); 2] {
        [
            (self.corners[0], self.corners[1]),
            (self.corners[2], self.corners[3]),
        ]
    }
}
