//! Panel assembly: stitching contiguous rows into maximal panels.

use crate::error::{Error, Result};
use crate::row::Row;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A physically contiguous strip of uniform-width rows.
///
/// All rows share the same pitch and vertex count; consecutive rows are
/// one pitch apart in y. A panel of R rows with V vertices each spans a
/// pixel grid of (V - 1) x (R - 1).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Panel {
    /// Rows in ascending y order.
    pub rows: Vec<Row>,
}

impl Panel {
    /// Returns the number of pixel columns.
    #[inline]
    pub fn x_pixels(&self) -> usize {
        self.rows.first().map_or(0, |r| r.vertices.len() - 1)
    }

    /// Returns the number of pixel rows.
    #[inline]
    pub fn y_pixels(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Returns the total pixel count of the panel grid.
    #[inline]
    pub fn num_pixels(&self) -> usize {
        self.x_pixels() * self.y_pixels()
    }

    /// Returns the y-level of the panel's first (lowest) row.
    #[inline]
    pub fn first_y(&self) -> f64 {
        self.rows.first().map_or(0.0, |r| r.y)
    }

    /// Collects the panel's detector IDs in scan order: row by row from
    /// the bottom, first occurrence wins.
    pub fn detector_ids(&self) -> Vec<u32> {
        let mut ids = Vec::with_capacity(self.num_pixels());
        for row in &self.rows {
            for &id in &row.det_ids {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    /// Checks that the distinct detector-ID count matches the pixel grid.
    ///
    /// The two dedup passes of sanitization act on vertices and IDs
    /// independently, so a misalignment between them surfaces here
    /// rather than as silently shifted downstream numbering.
    pub fn verify_ids(&self, panel_index: usize) -> Result<()> {
        let expected = self.num_pixels();
        let actual = self.detector_ids().len();
        if expected != actual {
            return Err(Error::PanelIdMismatch {
                panel: panel_index,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

/// Merges rows into maximal panels with a greedy single pass.
///
/// Precondition: `rows` is sorted ascending by (pitch, y), as produced
/// by iterating the clustering map in key order.
///
/// A row whose y-level matches the previous row's under integer rounding
/// or floor, with equal pitch and vertex count, is the same physical row
/// reached through a second key and is skipped. A row continues the
/// current panel when pitch and vertex count match and the rounded y
/// step does not exceed the pitch; any other transition closes the panel
/// and opens a new one.
pub fn assemble_panels(rows: Vec<Row>) -> (Vec<Panel>, usize) {
    let mut panels = Vec::new();
    let mut current: Vec<Row> = Vec::new();
    let mut skipped = 0usize;

    for row in rows {
        let Some(prev) = current.last() else {
            current.push(row);
            continue;
        };

        let same_shape = prev.pitch == row.pitch && prev.vertices.len() == row.vertices.len();
        let same_level = prev.y.round_ties_even() == row.y.round_ties_even()
            || prev.y.floor() == row.y.floor();
        if same_shape && same_level {
            skipped += 1;
            continue;
        }

        let step = (row.y - prev.y).round_ties_even();
        if same_shape && step <= f64::from(row.pitch) {
            current.push(row);
        } else {
            panels.push(Panel {
                rows: std::mem::take(&mut current),
            });
            current.push(row);
        }
    }

    if !current.is_empty() {
        panels.push(Panel { rows: current });
    }

    (panels, skipped)
}

/// Reorders panels ascending by their first row's y-level.
///
/// Stable on a single numeric key, so the ordering (and the panel
/// numbering derived from it) is deterministic and idempotent.
pub fn sort_panels(panels: &mut [Panel]) {
    panels.sort_by(|a, b| a.first_y().total_cmp(&b.first_y()));
}
