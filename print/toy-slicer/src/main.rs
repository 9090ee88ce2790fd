//! Command line front end for the toy slicer.
//!
//! # Usage
//!
//! ```bash
//! toy-slicer slice model.stl -o model.gcode --profile universal
//! toy-slicer slice scene.stl --up-axis y --parallel -v
//! toy-slicer profiles
//! toy-slicer show-profile kobra-2-pro > my-printer.json
//! toy-slicer slice model.stl --config my-printer.json
//! toy-slicer summary model.gcode
//! toy-slicer export-stl scene.stl placed.stl --prepare --ascii
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use owo_colors::OwoColorize;
use tracing::info;

use toy_slicer::mesh_io::{load_mesh, save_stl, StlEncoding};
use toy_slicer::mesh_prepare::{prepare_mesh, UpAxis};
use toy_slicer::mesh_types::MeshTopology;
use toy_slicer::print_gcode::GcodeSummary;
use toy_slicer::print_profile::{preset, PrinterProfile, PRESET_NAMES};
use toy_slicer::{JobOptions, SliceJob};

#[derive(Parser)]
#[command(name = "toy-slicer")]
#[command(about = "Slice triangle meshes into single-wall G-code")]
#[command(version)]
struct Cli {
    /// Log progress information
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log per-layer details
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Slice a mesh into G-code
    Slice {
        /// Input mesh (STL)
        input: PathBuf,

        /// Output G-code file [default: input with .gcode extension]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Built-in printer profile
        #[arg(short, long, default_value = "kobra-2-pro", conflicts_with = "config")]
        profile: String,

        /// Printer profile from a JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Up axis of the input mesh
        #[arg(long, value_enum, default_value_t = Axis::Z)]
        up_axis: Axis,

        /// Override the profile's layer height (mm)
        #[arg(long)]
        layer_height: Option<f64>,

        /// Slice layers in parallel
        #[arg(long)]
        parallel: bool,

        /// Name reported in the job stats [default: output file name]
        #[arg(long)]
        name: Option<String>,
    },

    /// List built-in printer profiles
    Profiles,

    /// Print a built-in profile as JSON
    ShowProfile {
        /// Profile name
        name: String,
    },

    /// Summarize an existing G-code file
    Summary {
        /// G-code file
        input: PathBuf,
    },

    /// Re-export a mesh as STL, optionally placed on the bed
    ExportStl {
        /// Input mesh (STL)
        input: PathBuf,

        /// Output STL file
        output: PathBuf,

        /// Write ASCII instead of binary
        #[arg(long)]
        ascii: bool,

        /// Rotate, scale and center the mesh as slicing would
        #[arg(long)]
        prepare: bool,

        /// Built-in printer profile used with --prepare
        #[arg(short, long, default_value = "kobra-2-pro")]
        profile: String,

        /// Up axis of the input mesh
        #[arg(long, value_enum, default_value_t = Axis::Z)]
        up_axis: Axis,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Axis {
    Y,
    Z,
}

impl From<Axis> for UpAxis {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::Y => Self::Y,
            Axis::Z => Self::Z,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Slice {
            input,
            output,
            profile,
            config,
            up_axis,
            layer_height,
            parallel,
            name,
        } => {
            let profile = load_profile(&profile, config.as_deref())?;
            let output = output.unwrap_or_else(|| input.with_extension("gcode"));
            let name = name.unwrap_or_else(|| file_name(&output));

            let mut options = JobOptions::default()
                .with_up_axis(up_axis.into())
                .with_parallel(parallel)
                .with_filename(name);
            if let Some(h) = layer_height {
                options = options.with_layer_height(h);
            }
            slice(&input, &output, profile, options)
        }
        Commands::Profiles => {
            for name in PRESET_NAMES {
                let profile = preset(name)?;
                println!(
                    "{:<14} {} ({}x{}x{} mm, layer {} mm)",
                    name.bold(),
                    profile.name,
                    profile.bed.width,
                    profile.bed.depth,
                    profile.bed.max_height,
                    profile.layer_height,
                );
            }
            Ok(())
        }
        Commands::ShowProfile { name } => {
            let profile = preset(&name)?;
            println!("{}", profile.to_json_pretty()?);
            Ok(())
        }
        Commands::Summary { input } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let summary = GcodeSummary::scan(&text);
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({
                "layers": summary.layers,
                "filamentMm": summary.max_e,
                "estimatedMinutes": summary.estimated_minutes,
            }))?);
            Ok(())
        }
        Commands::ExportStl {
            input,
            output,
            ascii,
            prepare,
            profile,
            up_axis,
        } => {
            let mut mesh = load_mesh(&input)
                .with_context(|| format!("Failed to load {}", input.display()))?;
            if prepare {
                let options = JobOptions::default().with_up_axis(up_axis.into());
                let job = SliceJob::new(preset(&profile)?, options)?;
                let prepared = prepare_mesh(&mesh, &job.prepare_params())?;
                info!(scale = prepared.scale_factor, "Prepared mesh");
                mesh = prepared.mesh;
            }
            let encoding = if ascii {
                StlEncoding::Ascii
            } else {
                StlEncoding::Binary
            };
            save_stl(&mesh, &output, encoding)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "{} {} ({} faces)",
                "Wrote".green(),
                output.display(),
                mesh.face_count()
            );
            Ok(())
        }
    }
}

fn load_profile(name: &str, config: Option<&Path>) -> Result<PrinterProfile> {
    match config {
        Some(path) => PrinterProfile::from_json_file(path)
            .with_context(|| format!("Failed to load profile {}", path.display())),
        None => Ok(preset(name)?),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| "model.gcode".to_string(), |n| n.to_string_lossy().into_owned())
}

fn slice(input: &Path, output: &Path, profile: PrinterProfile, options: JobOptions) -> Result<()> {
    let job = SliceJob::new(profile, options)?;
    info!(profile = %job.profile().name, input = %input.display(), "Slicing");

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}",
        )
        .context("Invalid progress template")?
        .progress_chars("#>-"),
    );
    bar.set_message("slicing");

    let result = job.run_file(input, |p| bar.set_position(u64::from(p)));
    let out = match result {
        Ok(out) => out,
        Err(err) => {
            bar.abandon_with_message("failed");
            return Err(err).with_context(|| format!("Failed to slice {}", input.display()));
        }
    };
    bar.finish_with_message("done");

    fs::write(output, &out.gcode.text)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("{}", serde_json::to_string_pretty(&out.stats)?);
    eprintln!(
        "{} {} ({} layers, {:.1} mm filament, scale {:.3})",
        "Wrote".green(),
        output.display(),
        out.stats.layers,
        out.stats.filament_mm,
        out.scale_factor,
    );
    Ok(())
}
