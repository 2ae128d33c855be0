//! Row types: keys, builders, and the sanitized row.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed-point scale for canonical y-levels (4 decimal digits).
const Y_SCALE: f64 = 10_000.0;

/// Composite row key: integer pitch and canonicalised y-level.
///
/// The y-level is rounded to 4 decimal digits and stored as fixed-point
/// tenths of micrometres so the key is `Ord + Eq` and a
/// `BTreeMap<RowKey, RowBuilder>` iterates rows in deterministic
/// (pitch, y) order. Numerically adjacent y-levels collapse to the same
/// key at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey {
    /// Vertical pitch rounded to integer millimetres.
    pub pitch: i32,
    /// Canonical y-level in fixed-point 1e-4 mm units.
    pub y_fixed: i64,
}

impl RowKey {
    /// Creates a key from an integer pitch and a raw y-level.
    ///
    /// Rounding uses ties-to-even in both the pitch and the y
    /// canonicalisation.
    #[inline]
    pub fn new(pitch: i32, y: f64) -> Self {
        Self {
            pitch,
            y_fixed: (y * Y_SCALE).round_ties_even() as i64,
        }
    }

    /// Returns the canonical y-level in millimetres.
    #[inline]
    pub fn y(&self) -> f64 {
        self.y_fixed as f64 / Y_SCALE
    }
}

/// Mutable accumulation of one row's (x, detector-ID) samples.
///
/// Pads append their edge corners as they are scanned; the sanitizer
/// finalizes the builder into an immutable [`Row`].
#[derive(Debug, Clone, Default)]
pub struct RowBuilder {
    /// X coordinates in pad-scan order, unsorted and with duplicates.
    pub xs: Vec<f64>,
    /// Owning detector ID per x sample.
    pub det_ids: Vec<u32>,
}

impl RowBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one corner sample.
    #[inline]
    pub fn push(&mut self, x: f64, det_id: u32) {
        self.xs.push(x);
        self.det_ids.push(det_id);
    }

    /// Returns the number of accumulated samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Returns true if no samples have been accumulated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }
}

/// A sanitized horizontal row: strictly increasing pixel-edge vertices
/// and the detector IDs of the pads bounded by them.
///
/// The ID list is not the same length as the vertex list: a clean row of
/// N pads has N + 1 boundary vertices, and an interior row shared by two
/// pad rows carries both rows' IDs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Row {
    /// Vertical pitch in integer millimetres.
    pub pitch: i32,
    /// Canonical y-level in millimetres.
    pub y: f64,
    /// Pixel-edge x positions, strictly increasing.
    pub vertices: Vec<f64>,
    /// Detector IDs in first-occurrence x order.
    pub det_ids: Vec<u32>,
}

impl Row {
    /// Returns the number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the row has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_key_canonicalisation() {
        // Levels within 1e-4 mm collapse to the same key.
        let a = RowKey::new(8, 12.345_67);
        let b = RowKey::new(8, 12.345_71);
        assert_eq!(a, b);
        assert!((a.y() - 12.3457).abs() < 1e-9);

        // Levels further apart stay distinct.
        let c = RowKey::new(8, 12.3459);
        assert_ne!(a, c);
    }

    #[test]
    fn test_row_key_ordering() {
        let mut keys = vec![
            RowKey::new(8, 16.0),
            RowKey::new(5, 100.0),
            RowKey::new(8, 0.0),
            RowKey::new(8, -8.0),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                RowKey::new(5, 100.0),
                RowKey::new(8, -8.0),
                RowKey::new(8, 0.0),
                RowKey::new(8, 16.0),
            ]
        );
    }

    #[test]
    fn test_row_builder_accumulation() {
        let mut builder = RowBuilder::new();
        assert!(builder.is_empty());

        builder.push(0.0, 1);
        builder.push(8.0, 1);
        builder.push(8.0, 2);

        assert_eq!(builder.len(), 3);
        assert_eq!(builder.det_ids, vec![1, 1, 2]);
    }
}
