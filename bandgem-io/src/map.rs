//! Detector-ID mapping: physical detector ID to generated pixel index.

use crate::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Mapping from physical detector IDs to the pixel indices assigned by
/// the IDF generator, plus the monitor entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectorMap {
    /// `(det_id, pixel_index)` pairs, in bank/panel scan order.
    pub entries: Vec<(u32, u32)>,
    /// `(physical_id, idf_id)` of the beam monitor.
    pub monitor: (u32, u32),
}

impl DetectorMap {
    /// Returns the number of mapped detectors (monitor excluded).
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no detectors are mapped.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Writer for the companion detector-map CSV.
///
/// The format is headerless `det_id,pixel_index` lines, detector entries
/// first and the monitor entry last.
pub struct DetectorMapWriter {
    writer: BufWriter<File>,
}

impl DetectorMapWriter {
    /// Creates a new map writer.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer })
    }

    /// Writes the full map as CSV.
    pub fn write_map(&mut self, map: &DetectorMap) -> Result<()> {
        for &(det_id, pixel) in &map.entries {
            writeln!(self.writer, "{det_id},{pixel}")?;
        }
        writeln!(self.writer, "{},{}", map.monitor.0, map.monitor.1)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_map_csv() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = DetectorMapWriter::create(file.path()).unwrap();

        let map = DetectorMap {
            entries: vec![(10, 0), (11, 1), (12, 2)],
            monitor: (2496, 3),
        };
        writer.write_map(&map).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "10,0\n11,1\n12,2\n2496,3\n");
    }
}
