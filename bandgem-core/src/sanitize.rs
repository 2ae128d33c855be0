//! Row sanitization: sorting, vertex deduplication, ID reconciliation.

use crate::error::{Error, Result};
use crate::row::{Row, RowBuilder, RowKey};

/// Minimum gap between surviving neighbour vertices, in millimetres.
const MIN_VERTEX_GAP: f64 = 2.0;

/// Finalizes a clustered row builder into a sanitized [`Row`].
///
/// The (x, detector-ID) samples are stable-sorted by x, then vertices are
/// deduplicated in two passes: first by integer-rounded x value (keeping
/// the first occurrence of each rounded value), then by dropping the
/// earlier vertex of any neighbour pair closer than 2 mm. Detector IDs
/// are deduplicated independently by first occurrence over the full
/// x-sorted sample list.
///
/// A row left with fewer than two vertices cannot bound a pixel and is
/// reported as [`Error::DegenerateRow`].
pub fn sanitize_row(key: RowKey, builder: &RowBuilder) -> Result<Row> {
    let mut samples: Vec<(f64, u32)> = builder
        .xs
        .iter()
        .copied()
        .zip(builder.det_ids.iter().copied())
        .collect();
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));

    // First occurrence per rounded value; rounded values are
    // non-decreasing over the sorted samples, so equal runs are
    // contiguous.
    let mut vertices: Vec<f64> = Vec::with_capacity(samples.len());
    for &(x, _) in &samples {
        let rounded = x.round_ties_even();
        let fresh = vertices
            .last()
            .is_none_or(|last| last.round_ties_even() != rounded);
        if fresh {
            vertices.push(x);
        }
    }

    // Gap pass over the surviving neighbours: when two vertices are
    // still closer than the minimum gap, the earlier one goes.
    let close: Vec<bool> = (0..vertices.len())
        .map(|i| i + 1 < vertices.len() && vertices[i + 1] - vertices[i] < MIN_VERTEX_GAP)
        .collect();
    let mut idx = 0;
    vertices.retain(|_| {
        let drop = close[idx];
        idx += 1;
        !drop
    });

    let mut det_ids: Vec<u32> = Vec::new();
    for &(_, id) in &samples {
        if !det_ids.contains(&id) {
            det_ids.push(id);
        }
    }

    if vertices.len() < 2 {
        return Err(Error::DegenerateRow {
            pitch: key.pitch,
            y: key.y(),
            vertices: vertices.len(),
        });
    }

    Ok(Row {
        pitch: key.pitch,
        y: key.y(),
        vertices,
        det_ids,
    })
}
