//! Mantid instrument-definition (IDF) XML generation.
//!
//! Serializes a [`GeometryModel`] into an IDF document: instrument
//! header and defaults, source and sample holder, beam monitor, one
//! placed bank per configured angle, and one `StructuredDetector` type
//! per panel carrying its regularized vertex list. Pixel indexing uses
//! `idstart`/`idstepbyrow` bookkeeping, and the assignment of physical
//! detector IDs to pixel indices is returned as a [`DetectorMap`].

use crate::config::InstrumentConfig;
use crate::error::Result;
use crate::map::DetectorMap;
use bandgem_core::GeometryModel;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writer for the instrument-definition XML document.
pub struct IdfWriter {
    writer: BufWriter<File>,
}

impl IdfWriter {
    /// Creates a new IDF writer.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer })
    }

    /// Writes the complete instrument document and returns the
    /// detector-ID map it implies.
    pub fn write_instrument(
        &mut self,
        model: &GeometryModel,
        config: &InstrumentConfig,
    ) -> Result<DetectorMap> {
        let total_pixels = model.num_pixels() as u32;
        let monitor_idf_id = total_pixels * config.banks;
        let monitor_physical_id = config
            .monitor_id
            .unwrap_or_else(|| model.max_detector_id().map_or(0, |id| id + 1));

        // Radial standoff of the panel array, in metres.
        let radius = model.radial_offset()? / 1000.0;

        self.write_header(config)?;
        self.write_defaults()?;
        self.write_source_and_sample(config)?;
        self.write_monitor(config, monitor_idf_id)?;
        let id_starts = self.write_banks(model, config, radius)?;
        let id_lists = self.write_panel_types(model)?;
        writeln!(self.writer, "<type is=\"detector\" name=\"pixel\" />\n")?;
        self.writer.write_all(b"</instrument>")?;
        self.writer.flush()?;

        let mut entries = Vec::new();
        for bank_starts in &id_starts {
            for (start, ids) in bank_starts.iter().zip(&id_lists) {
                for (position, &id) in ids.iter().enumerate() {
                    entries.push((id, start + position as u32));
                }
            }
        }

        Ok(DetectorMap {
            entries,
            monitor: (monitor_physical_id, monitor_idf_id),
        })
    }

    fn write_header(&mut self, config: &InstrumentConfig) -> Result<()> {
        writeln!(self.writer, "<?xml version='1.0' encoding='ASCII'?>")?;
        writeln!(
            self.writer,
            "<!-- For help on the notation used to specify an Instrument Definition File"
        )?;
        writeln!(self.writer, "     see http://www.mantidproject.org/IDF -->")?;
        writeln!(
            self.writer,
            "<instrument xmlns=\"http://www.mantidproject.org/IDF/1.0\""
        )?;
        writeln!(
            self.writer,
            "            xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\""
        )?;
        writeln!(
            self.writer,
            "            xsi:schemaLocation=\"http://www.mantidproject.org/IDF/1.0 http://schema.mantidproject.org/IDF/1.0/IDFSchema.xsd\""
        )?;
        writeln!(
            self.writer,
            " name=\"{}\" valid-from=\"{}\"",
            config.name, config.valid_from
        )?;
        writeln!(self.writer, "            valid-to=\"{}\"", config.valid_to)?;
        writeln!(
            self.writer,
            "            last-modified=\"{}\">",
            config.last_modified
        )?;
        writeln!(self.writer, "<!---->")?;
        Ok(())
    }

    fn write_defaults(&mut self) -> Result<()> {
        writeln!(self.writer, "<defaults>")?;
        writeln!(self.writer, "\t<length unit=\"metre\"/>")?;
        writeln!(self.writer, "\t<angle unit=\"degree\"/>")?;
        writeln!(self.writer, "\t<reference-frame>")?;
        writeln!(self.writer, "\t\t<along-beam axis=\"z\"/>")?;
        writeln!(self.writer, "\t\t<pointing-up axis=\"y\"/>")?;
        writeln!(self.writer, "\t\t<handedness val=\"right\"/>")?;
        writeln!(self.writer, "\t</reference-frame>")?;
        writeln!(self.writer, "\t<default-view axis-view=\"z-\"/>")?;
        writeln!(self.writer, "</defaults>\n")?;
        Ok(())
    }

    fn write_source_and_sample(&mut self, config: &InstrumentConfig) -> Result<()> {
        writeln!(self.writer, "<component type=\"source\">")?;
        writeln!(self.writer, "\t<location />")?;
        writeln!(self.writer, "</component>")?;
        writeln!(self.writer, "<type name=\"source\" is=\"Source\" />\n")?;

        writeln!(self.writer, "<component type=\"some-sample-holder\">")?;
        writeln!(self.writer, "\t<location z=\"{}\" />", config.sample_z_m)?;
        writeln!(self.writer, "</component>")?;
        writeln!(
            self.writer,
            "<type name=\"some-sample-holder\" is=\"SamplePos\" />\n"
        )?;
        Ok(())
    }

    fn write_monitor(&mut self, config: &InstrumentConfig, monitor_idf_id: u32) -> Result<()> {
        writeln!(
            self.writer,
            "<component type=\"Moderator-Monitor4\" idlist=\"monitors\">"
        )?;
        writeln!(
            self.writer,
            "\t<location z=\"{}\" name=\"monitor4\" />",
            config.monitor_z_m
        )?;
        writeln!(self.writer, "</component>\n")?;

        writeln!(self.writer, "<type name=\"Moderator-Monitor4\" is=\"monitor\">")?;
        writeln!(self.writer, "\t<percent-transparency val=\"99.9\" />")?;
        writeln!(self.writer, "\t<cuboid id=\"shape\">")?;
        writeln!(
            self.writer,
            "\t\t<left-front-bottom-point x=\"0.0125\" y=\"-0.0125\" z=\"0.0\" />"
        )?;
        writeln!(
            self.writer,
            "\t\t<left-front-top-point x=\"0.0125\" y=\"-0.0125\" z=\"0.005\" />"
        )?;
        writeln!(
            self.writer,
            "\t\t<left-back-bottom-point x=\"-0.0125\" y=\"-0.0125\" z=\"0.0\" />"
        )?;
        writeln!(
            self.writer,
            "\t\t<right-front-bottom-point x=\"0.0125\" y=\"0.0125\" z=\"0.0\" />"
        )?;
        writeln!(self.writer, "\t</cuboid>")?;
        writeln!(self.writer, "\t<algebra val=\"shape\" />")?;
        writeln!(self.writer, "</type>\n")?;

        writeln!(self.writer, "<idlist idname=\"monitors\">")?;
        writeln!(self.writer, "\t<id val=\"{monitor_idf_id}\" />")?;
        writeln!(self.writer, "</idlist>\n")?;
        Ok(())
    }

    /// Writes one placed component and one type per bank; panel pixel
    /// blocks keep accumulating `idstart` across banks. Returns the
    /// per-bank, per-panel `idstart` values.
    fn write_banks(
        &mut self,
        model: &GeometryModel,
        config: &InstrumentConfig,
        radius: f64,
    ) -> Result<Vec<Vec<u32>>> {
        let mut angle = config.first_bank_angle_deg;
        let mut start = 0u32;
        let mut id_starts = Vec::with_capacity(config.banks as usize);

        for bank in 0..config.banks {
            let x = -radius * angle.to_radians().sin();
            let y = radius * angle.to_radians().cos();
            writeln!(self.writer, "<component type=\"bank_{bank}\">")?;
            writeln!(
                self.writer,
                "\t<location x=\"{x}\" y=\"{y}\" z=\"{}\" rot=\"{angle}\" axis-x=\"0.0\" axis-y=\"0.0\" axis-z=\"1.0\" />",
                config.bank_z_m
            )?;
            writeln!(self.writer, "</component>\n")?;
            angle += config.bank_angle_step_deg;

            writeln!(self.writer, "<type name=\"bank_{bank}\">")?;
            writeln!(self.writer, "<properties />")?;

            let mut starts = Vec::with_capacity(model.num_panels());
            for (index, panel) in model.panels.iter().enumerate() {
                starts.push(start);
                writeln!(
                    self.writer,
                    "<component type=\"Structured_{index}\" idstart=\"{start}\" idfillbyfirst=\"x\" idstepbyrow=\"{}\" idstep=\"1\">",
                    panel.x_pixels()
                )?;
                writeln!(
                    self.writer,
                    "\t<location x=\"0.0\" y=\"0.0\" z=\"{}\" />",
                    config.panel_z_m
                )?;
                writeln!(self.writer, "</component>")?;
                start += panel.num_pixels() as u32;
            }
            writeln!(self.writer, "</type>\n")?;
            id_starts.push(starts);
        }

        Ok(id_starts)
    }

    /// Writes one `StructuredDetector` type per panel and returns each
    /// panel's detector IDs in scan order.
    fn write_panel_types(&mut self, model: &GeometryModel) -> Result<Vec<Vec<u32>>> {
        let mut id_lists = Vec::with_capacity(model.num_panels());

        for (index, panel) in model.panels.iter().enumerate() {
            writeln!(
                self.writer,
                "<type name=\"Structured_{index}\" is=\"StructuredDetector\" xpixels=\"{}\" ypixels=\"{}\" type=\"pixel\">",
                panel.x_pixels(),
                panel.y_pixels()
            )?;

            for row in &panel.rows {
                // Vertices are regularized to even spacing between the
                // row's extremes and emitted in metres.
                let n = row.vertices.len();
                let xmin = row.vertices[0];
                let xmax = row.vertices[n - 1];
                let step = (xmax - xmin) / (n - 1) as f64;
                for k in 0..n {
                    let x = xmin + step * k as f64;
                    writeln!(
                        self.writer,
                        "\t<vertex x=\"{}\" y=\"{}\"/>",
                        x / 1000.0,
                        row.y / 1000.0
                    )?;
                }
            }

            writeln!(self.writer, "</type>\n")?;
            id_lists.push(panel.detector_ids());
        }

        Ok(id_lists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandgem_core::{Pad, Point};
    use tempfile::NamedTempFile;

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

    /// Two stacked pad columns offset in x so the offset line is
    /// well-defined.
    fn slanted_model() -> GeometryModel {
        let pads = vec![
            square_pad(1, -14.0, -30.0, 4.0),
            square_pad(2, -6.0, -30.0, 4.0),
            square_pad(10, 6.0, 30.0, 4.0),
            square_pad(11, 14.0, 30.0, 4.0),
        ];
        GeometryModel::extract(&pads).unwrap()
    }

    #[test]
    fn test_structured_detector_types() {
        let model = slanted_model();
        let file = NamedTempFile::new().unwrap();
        let mut writer = IdfWriter::create(file.path()).unwrap();
        writer
            .write_instrument(&model, &InstrumentConfig::default())
            .unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.starts_with("<?xml version='1.0' encoding='ASCII'?>"));
        assert!(content.ends_with("</instrument>"));
        assert!(content.contains(
            "<type name=\"Structured_0\" is=\"StructuredDetector\" xpixels=\"2\" ypixels=\"1\" type=\"pixel\">"
        ));
        assert!(content.contains("Structured_1"));
        assert!(content.contains("idstart=\"0\" idfillbyfirst=\"x\" idstepbyrow=\"2\" idstep=\"1\""));
        assert!(content.contains("idstart=\"2\""));
        // Vertex coordinates are written in metres.
        assert!(content.contains("<vertex x=\"-0.018\" y=\"-0.034\"/>"));
    }

    #[test]
    fn test_detector_map_scan_order() {
        let model = slanted_model();
        let file = NamedTempFile::new().unwrap();
        let mut writer = IdfWriter::create(file.path()).unwrap();
        let map = writer
            .write_instrument(&model, &InstrumentConfig::default())
            .unwrap();

        assert_eq!(map.entries, vec![(1, 0), (2, 1), (10, 2), (11, 3)]);
        // Monitor: physical ID is max pad ID + 1, IDF ID the pixel total.
        assert_eq!(map.monitor, (12, 4));
    }

    #[test]
    fn test_multiple_banks_accumulate_idstart() {
        let model = slanted_model();
        let config = InstrumentConfig {
            banks: 2,
            monitor_id: Some(2496),
            ..InstrumentConfig::default()
        };

        let file = NamedTempFile::new().unwrap();
        let mut writer = IdfWriter::create(file.path()).unwrap();
        let map = writer.write_instrument(&model, &config).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("<component type=\"bank_0\">"));
        assert!(content.contains("<component type=\"bank_1\">"));
        // Second bank's panels continue the pixel numbering.
        assert!(content.contains("idstart=\"4\""));
        assert!(content.contains("idstart=\"6\""));

        assert_eq!(map.entries.len(), 8);
        assert_eq!(map.entries[4], (1, 4));
        assert_eq!(map.monitor, (2496, 8));
    }
}
