//! Row clustering: grouping pad corners by (pitch, y-level).

use crate::pad::Pad;
use crate::row::{RowBuilder, RowKey};
use std::collections::BTreeMap;

/// Clusters pad corner coordinates into candidate rows.
///
/// Each pad contributes its two vertical edges. Per edge, the pitch is
/// the edge height rounded to integer millimetres, and each of the two
/// corners files its x coordinate (and the owning detector ID) under the
/// row keyed by (pitch, corner y-level). A pad therefore feeds up to
/// four distinct rows; rows are an emergent property of many pads
/// sharing a y-level, not a field of the input.
///
/// The returned map iterates in ascending (pitch, y) order, which the
/// panel assembler relies on.
pub fn cluster_rows(pads: &[Pad]) -> BTreeMap<RowKey, RowBuilder> {
    let mut rows: BTreeMap<RowKey, RowBuilder> = BTreeMap::new();

    for pad in pads {
        for (a, b) in pad.vertical_edges() {
            let pitch = (a.y - b.y).abs().round_ties_even() as i32;
            rows.entry(RowKey::new(pitch, a.y))
                .or_default()
                .push(a.x, pad.det_id);
            rows.entry(RowKey::new(pitch, b.y))
                .or_default()
                .push(b.x, pad.det_id);
        }
    }

    rows
}
