//! Coordinate-file loading.
//!
//! The engineering coordinate file is tab-delimited with one header line
//! and one row per pad: an ID, a label, the pad centre, five flag
//! fields, and four corner offsets from the centre. A row whose five
//! flag fields are all `1` is an excluded dummy pad.

use crate::error::{Error, Result};
use bandgem_core::{Pad, Point};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Expected field count per data row.
const COLUMNS: usize = 17;

/// Field offsets within a data row.
const COL_ID: usize = 0;
const COL_LABEL: usize = 1;
const COL_CENTRE_X: usize = 2;
const COL_FLAGS: usize = 4;
const COL_CORNERS: usize = 9;

/// Loaded pad table: centroid-relative pads plus the raw file-frame
/// centroid they were translated by.
#[derive(Debug, Clone)]
pub struct PadTable {
    /// Surviving pads, in file order, centroid-relative.
    pub pads: Vec<Pad>,
    /// Mean centre of the surviving pads in the file frame.
    pub centroid: Point,
}

struct RawPad {
    det_id: u32,
    centre: Point,
    corner_offsets: [Point; 4],
}

fn parse_field<T: std::str::FromStr>(
    field: &str,
    path: &Path,
    line: usize,
) -> Result<T> {
    field.trim().parse().map_err(|_| Error::MalformedInput {
        path: path.to_path_buf(),
        line,
        reason: format!("invalid numeric field '{}'", field.trim()),
    })
}

fn parse_row(fields: &[&str], path: &Path, line: usize) -> Result<RawPad> {
    let det_id = parse_field(fields[COL_ID], path, line)?;
    let centre = Point::new(
        parse_field(fields[COL_CENTRE_X], path, line)?,
        parse_field(fields[COL_CENTRE_X + 1], path, line)?,
    );

    let mut corner_offsets = [Point::default(); 4];
    for (k, corner) in corner_offsets.iter_mut().enumerate() {
        *corner = Point::new(
            parse_field(fields[COL_CORNERS + 2 * k], path, line)?,
            parse_field(fields[COL_CORNERS + 2 * k + 1], path, line)?,
        );
    }

    Ok(RawPad {
        det_id,
        centre,
        corner_offsets,
    })
}

/// Loads the coordinate file into centroid-relative pads.
///
/// The header line is discarded, dummy rows (all five flags `1`) are
/// dropped, and all surviving coordinates are translated so the pad
/// centroid sits at the origin.
pub fn load_pads<P: AsRef<Path>>(path: P) -> Result<PadTable> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut raw: Vec<RawPad> = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        if line_no == 1 || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != COLUMNS {
            return Err(Error::MalformedInput {
                path: path.to_path_buf(),
                line: line_no,
                reason: format!("expected {COLUMNS} fields, found {}", fields.len()),
            });
        }

        let dummy = fields[COL_FLAGS..COL_FLAGS + 5]
            .iter()
            .all(|f| f.trim() == "1");
        if dummy {
            continue;
        }

        raw.push(parse_row(&fields, path, line_no)?);
    }

    if raw.is_empty() {
        return Err(Error::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    let n = raw.len() as f64;
    let centroid = Point::new(
        raw.iter().map(|p| p.centre.x).sum::<f64>() / n,
        raw.iter().map(|p| p.centre.y).sum::<f64>() / n,
    );

    let pads = raw
        .into_iter()
        .map(|p| {
            let centre = Point::new(p.centre.x - centroid.x, p.centre.y - centroid.y);
            let corners = p
                .corner_offsets
                .map(|c| Point::new(centre.x + c.x, centre.y + c.y));
            Pad::new(p.det_id, centre, corners)
        })
        .collect();

    Ok(PadTable { pads, centroid })
}

/// Extracts the valid detector IDs from the coordinate file.
///
/// A pad is valid when its label field does not carry the dummy marker
/// `Z`. The returned list is in file order with the monitor ID
/// (last valid ID + 1) appended.
pub fn valid_ids<P: AsRef<Path>>(path: P) -> Result<Vec<u32>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut ids: Vec<u32> = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        if line_no == 1 || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 2 {
            return Err(Error::MalformedInput {
                path: path.to_path_buf(),
                line: line_no,
                reason: format!("expected at least 2 fields, found {}", fields.len()),
            });
        }

        if !fields[COL_LABEL].contains('Z') {
            ids.push(parse_field(fields[COL_ID], path, line_no)?);
        }
    }

    match ids.last().copied() {
        Some(last) => {
            ids.push(last + 1);
            Ok(ids)
        }
        None => Err(Error::EmptyInput {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn coordinate_row(
        id: u32,
        label: &str,
        cx: f64,
        cy: f64,
        flags: [u8; 5],
        half: f64,
    ) -> String {
        let mut fields = vec![id.to_string(), label.to_string(), cx.to_string(), cy.to_string()];
        fields.extend(flags.iter().map(|f| f.to_string()));
        for (dx, dy) in [(-half, -half), (-half, half), (half, -half), (half, half)] {
            fields.push(dx.to_string());
            fields.push(dy.to_string());
        }
        fields.join("\t")
    }

    fn write_file(rows: &[String]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "ID\tLabel\tX\tY\tF1\tF2\tF3\tF4\tF5\tcorners...").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    #[test]
    fn test_load_translates_to_centroid() {
        let file = write_file(&[
            coordinate_row(1, "A1", 0.0, 0.0, [0; 5], 4.0),
            coordinate_row(2, "A2", 8.0, 0.0, [0; 5], 4.0),
        ]);

        let table = load_pads(file.path()).unwrap();
        assert_eq!(table.pads.len(), 2);
        assert_relative_eq!(table.centroid.x, 4.0);
        assert_relative_eq!(table.centroid.y, 0.0);

        assert_relative_eq!(table.pads[0].centre.x, -4.0);
        assert_relative_eq!(table.pads[1].centre.x, 4.0);
        // Corners are centre-relative offsets in the file.
        assert_relative_eq!(table.pads[0].corners[0].x, -8.0);
        assert_relative_eq!(table.pads[1].corners[3].x, 8.0);
    }

    #[test]
    fn test_dummy_flags_exclude_row() {
        let file = write_file(&[
            coordinate_row(1, "A1", 0.0, 0.0, [0; 5], 4.0),
            coordinate_row(2, "ZZ", 8.0, 0.0, [1; 5], 4.0),
        ]);

        let table = load_pads(file.path()).unwrap();
        assert_eq!(table.pads.len(), 1);
        assert_eq!(table.pads[0].det_id, 1);
        // Centroid comes from the surviving pad alone.
        assert_relative_eq!(table.centroid.x, 0.0);
    }

    #[test]
    fn test_wrong_column_count() {
        let file = write_file(&["1\tA1\t0.0\t0.0".to_string()]);

        let err = load_pads(file.path()).unwrap_err();
        match err {
            Error::MalformedInput { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("expected 17 fields"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_field() {
        let mut row = coordinate_row(1, "A1", 0.0, 0.0, [0; 5], 4.0);
        row = row.replace("\t-4\t", "\tabc\t");

        let file = write_file(&[row]);
        let err = load_pads(file.path()).unwrap_err();
        assert!(matches!(err, Error::MalformedInput { line: 2, .. }));
    }

    #[test]
    fn test_empty_input() {
        let file = write_file(&[coordinate_row(1, "ZZ", 1.0, 1.0, [1; 5], 0.0)]);
        assert!(matches!(
            load_pads(file.path()),
            Err(Error::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_valid_ids_with_monitor() {
        let file = write_file(&[
            coordinate_row(10, "A1", 0.0, 0.0, [0; 5], 4.0),
            coordinate_row(11, "Z9", 1.0, 1.0, [1; 5], 0.0),
            coordinate_row(12, "A2", 8.0, 0.0, [0; 5], 4.0),
        ]);

        let ids = valid_ids(file.path()).unwrap();
        assert_eq!(ids, vec![10, 12, 13]);
    }
}
