//!
//! Command-line front end for Band-GEM geometry extraction and IDF
//! generation.
#![allow(
    clippy::uninlined_format_args,
    clippy::cast_precision_loss,
    clippy::too_many_lines
)]

use clap::{Parser, Subcommand};

use bandgem_core::GeometryModel;
use bandgem_io::{load_pads, valid_ids, DetectorMapWriter, IdfWriter, InstrumentConfig};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    BandgemIo(#[from] bandgem_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] bandgem_core::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Band-GEM detector geometry processor.
#[derive(Parser)]
#[command(name = "bandgem")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the instrument definition and detector map
    Generate {
        /// Engineering coordinate file
        coordinates: PathBuf,

        /// Output IDF path
        #[arg(short, long, default_value = "LOKI_BANDGEM_definition.xml")]
        output: PathBuf,

        /// Output detector-map path
        #[arg(short, long, default_value = "LOKI_map.csv")]
        map: PathBuf,

        /// Number of banks (overrides the configuration)
        #[arg(short, long)]
        banks: Option<u32>,

        /// Instrument configuration JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the panel structure of a coordinate file
    Inspect {
        /// Engineering coordinate file
        coordinates: PathBuf,
    },

    /// Export the extracted geometry model as JSON
    Export {
        /// Engineering coordinate file
        coordinates: PathBuf,

        /// Output path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>, banks: Option<u32>) -> Result<InstrumentConfig> {
    let mut config = match path {
        Some(path) => InstrumentConfig::from_file(path)?,
        None => InstrumentConfig::default(),
    };
    if let Some(banks) = banks {
        config.banks = banks;
        config.validate()?;
    }
    Ok(config)
}

fn extract_model(coordinates: &PathBuf, verbose: bool) -> Result<GeometryModel> {
    if verbose {
        eprintln!("Reading: {}", coordinates.display());
    }
    let table = load_pads(coordinates)?;
    if verbose {
        eprintln!("  {} pads loaded", table.pads.len());
        eprintln!(
            "  centroid: ({:.4}, {:.4})",
            table.centroid.x, table.centroid.y
        );
    }

    let model = GeometryModel::extract(&table.pads)?;
    if verbose {
        let stats = model.statistics;
        eprintln!("  {} rows clustered", stats.rows);
        eprintln!("  {} duplicate rows skipped", stats.duplicate_rows);
        eprintln!("  {} vertex samples removed", stats.vertices_removed);
        eprintln!("  {} panels assembled", stats.panels);
    }
    Ok(model)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            coordinates,
            output,
            map,
            banks,
            config,
            verbose,
        } => {
            let start = Instant::now();
            let config = load_config(config.as_ref(), banks)?;
            if verbose {
                eprintln!("Instrument: {}", config.name);
                eprintln!("Banks: {}", config.banks);
            }

            let model = extract_model(&coordinates, verbose)?;

            if verbose {
                eprintln!("Writing IDF to: {}", output.display());
            }
            let mut idf = IdfWriter::create(&output)?;
            let detector_map = idf.write_instrument(&model, &config)?;

            if verbose {
                eprintln!("Writing detector map to: {}", map.display());
            }
            DetectorMapWriter::create(&map)?.write_map(&detector_map)?;

            let elapsed = start.elapsed();
            println!("Generated {} in {:.2}s", output.display(), elapsed.as_secs_f64());
            println!("Panels: {}", model.num_panels());
            println!("Pixels: {}", model.num_pixels());
            println!("Mapped detectors: {}", detector_map.len());
        }

        Commands::Inspect { coordinates } => {
            let table = load_pads(&coordinates)?;
            let model = GeometryModel::extract(&table.pads)?;

            println!("File: {}", coordinates.display());
            println!("Pads: {}", table.pads.len());
            println!(
                "Centroid: ({:.4}, {:.4})",
                table.centroid.x, table.centroid.y
            );
            println!("Valid IDs: {}", valid_ids(&coordinates)?.len());

            let mut line = 0usize;
            for (index, panel) in model.panels.iter().enumerate() {
                println!(
                    "panel {} ({} x {} pixels, pitch {} mm)",
                    index,
                    panel.x_pixels(),
                    panel.y_pixels(),
                    panel.rows[0].pitch
                );
                for row in &panel.rows {
                    println!(
                        "  {} {:.4}: {:.3} - {:.3}  size: {}",
                        line,
                        row.y,
                        row.vertices[0],
                        row.vertices[row.vertices.len() - 1],
                        row.vertices.len()
                    );
                    line += 1;
                }
            }

            println!("Total pixels: {}", model.num_pixels());
            match model.radial_offset() {
                Ok(offset) => println!("Radial offset: {:.4} mm", offset),
                Err(err) => println!("Radial offset: unavailable ({err})"),
            }
        }

        Commands::Export {
            coordinates,
            output,
        } => {
            let table = load_pads(&coordinates)?;
            let model = GeometryModel::extract(&table.pads)?;

            match output {
                Some(path) => {
                    let writer = BufWriter::new(File::create(&path)?);
                    serde_json::to_writer_pretty(writer, &model)?;
                    println!("Exported {} panels to {}", model.num_panels(), path.display());
                }
                None => {
                    let stdout = std::io::stdout().lock();
                    serde_json::to_writer_pretty(stdout, &model)?;
                    println!();
                }
            }
        }
    }

    Ok(())
}
