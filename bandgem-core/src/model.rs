//! The extraction pipeline and its resulting geometry model.

use crate::cluster::cluster_rows;
use crate::error::{Error, Result};
use crate::offset::position_offset;
use crate::pad::{Pad, Point};
use crate::panel::{assemble_panels, sort_panels, Panel};
use crate::row::Row;
use crate::sanitize::sanitize_row;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Summary counters for one extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExtractionStatistics {
    /// Pads fed into the pipeline.
    pub pads: usize,
    /// Rows produced by clustering.
    pub rows: usize,
    /// Duplicate same-level rows skipped during assembly.
    pub duplicate_rows: usize,
    /// Vertex samples removed by sanitization.
    pub vertices_removed: usize,
    /// Panels in the final model.
    pub panels: usize,
}

/// The structured geometry recovered from a pad table: panels sorted by
/// ascending y, plus the residual centre of the pad positions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeometryModel {
    /// Panels in ascending first-row y order.
    pub panels: Vec<Panel>,
    /// Mean of the centroid-relative pad centres (close to the origin).
    pub centre: Point,
    /// Pipeline counters.
    pub statistics: ExtractionStatistics,
}

impl GeometryModel {
    /// Runs the full extraction pipeline over centroid-relative pads.
    ///
    /// Clusters pad corners into rows, sanitizes each row in sorted key
    /// order, assembles contiguous rows into panels, verifies each
    /// panel's detector-ID count against its pixel grid, and sorts the
    /// panels by ascending y.
    pub fn extract(pads: &[Pad]) -> Result<Self> {
        if pads.is_empty() {
            return Err(Error::EmptyGeometry);
        }

        let n = pads.len() as f64;
        let centre = Point::new(
            pads.iter().map(|p| p.centre.x).sum::<f64>() / n,
            pads.iter().map(|p| p.centre.y).sum::<f64>() / n,
        );

        let clustered = cluster_rows(pads);
        let mut statistics = ExtractionStatistics {
            pads: pads.len(),
            rows: clustered.len(),
            ..ExtractionStatistics::default()
        };

        let mut rows: Vec<Row> = Vec::with_capacity(clustered.len());
        for (key, builder) in &clustered {
            let samples = builder.len();
            let row = sanitize_row(*key, builder)?;
            statistics.vertices_removed += samples - row.vertices.len();
            rows.push(row);
        }

        let (mut panels, duplicate_rows) = assemble_panels(rows);
        statistics.duplicate_rows = duplicate_rows;
        for (index, panel) in panels.iter().enumerate() {
            panel.verify_ids(index)?;
        }

        sort_panels(&mut panels);
        statistics.panels = panels.len();

        Ok(Self {
            panels,
            centre,
            statistics,
        })
    }

    /// Returns the number of panels.
    #[inline]
    pub fn num_panels(&self) -> usize {
        self.panels.len()
    }

    /// Returns the total pixel count across all panels.
    pub fn num_pixels(&self) -> usize {
        self.panels.iter().map(Panel::num_pixels).sum()
    }

    /// Returns the largest detector ID carried by any panel.
    pub fn max_detector_id(&self) -> Option<u32> {
        self.panels
            .iter()
            .flat_map(|p| p.rows.iter())
            .flat_map(|r| r.det_ids.iter().copied())
            .max()
    }

    /// Returns the array's radial placement offset.
    pub fn radial_offset(&self) -> Result<f64> {
        position_offset(&self.panels, self.centre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pad::Point;

    fn square_pad(det_id: u32, cx: f64, cy: f64, half: f64) -> Pad {
        Pad::new(
            det_id,
            Point::new(cx, cy),
            [
                Point::new(cx - half, cy - half),
                Point::new(cx - half, cy + half),
                Point::new(cx + half, cy - half),
                Point::new(cx + half, cy + half),
            ],
        )
    }

    #[test]
    fn test_two_by_two_grid() {
        // Centroid-relative 2x2 grid, 8 mm pitch.
        let pads = [
            square_pad(1, -4.0, -4.0, 4.0),
            square_pad(2, 4.0, -4.0, 4.0),
            square_pad(3, -4.0, 4.0, 4.0),
            square_pad(4, 4.0, 4.0, 4.0),
        ];

        let model = GeometryModel::extract(&pads).unwrap();
        assert_eq!(model.num_panels(), 1);
        assert_eq!(model.num_pixels(), 4);

        let panel = &model.panels[0];
        assert_eq!(panel.rows.len(), 3);
        let levels: Vec<f64> = panel.rows.iter().map(|r| r.y).collect();
        assert_eq!(levels, vec![-8.0, 0.0, 8.0]);
        for row in &panel.rows {
            assert_eq!(row.vertices, vec![-8.0, 0.0, 8.0]);
        }
        assert_eq!(panel.detector_ids(), vec![1, 2, 3, 4]);
        assert_eq!(model.max_detector_id(), Some(4));
    }

    #[test]
    fn test_no_pads() {
        assert!(matches!(
            GeometryModel::extract(&[]),
            Err(Error::EmptyGeometry)
        ));
    }

    #[test]
    fn test_statistics_counts() {
        let pads = [
            square_pad(1, -4.0, -4.0, 4.0),
            square_pad(2, 4.0, -4.0, 4.0),
            square_pad(3, -4.0, 4.0, 4.0),
            square_pad(4, 4.0, 4.0, 4.0),
        ];

        let model = GeometryModel::extract(&pads).unwrap();
        let stats = model.statistics;
        assert_eq!(stats.pads, 4);
        assert_eq!(stats.rows, 3);
        assert_eq!(stats.panels, 1);
        // 16 corner samples per boundary level pair collapse to 3
        // vertices per row: 4 + 8 + 4 samples in, 9 vertices out.
        assert_eq!(stats.vertices_removed, 16 - 9);
    }
}
