//! Configuration management for the G-code filter.
//!
//! Handles:
//! - Command-line argument parsing
//! - Calibration file discovery

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

use crate::mapping::MappingMode;

/// File names searched for in the default configuration directories
pub const DEFAULT_CALIBRATION_FILES: [&str; 2] = ["calibration.json", "calibration.toml"];

/// Command-line arguments for the G-code filter
#[derive(Debug, Parser)]
#[command(name = "gfilter")]
#[command(about = "Corrects G-code move coordinates using calibration points")]
#[command(version)]
pub struct Args {
    /// Calibration file with a "map" array of {domain, range} points
    #[arg(long, value_name = "FILE", conflicts_with = "offsets")]
    pub map: Option<PathBuf>,

    /// Calibration file with an "offsets" array of {point, offset} points
    #[arg(long, value_name = "FILE")]
    pub offsets: Option<PathBuf>,

    /// Neighbor search radius, overriding the derived one
    #[arg(long, value_name = "MM")]
    pub radius: Option<f64>,

    /// Rewrite every move with explicit X, Y and Z for delta controllers
    #[arg(long)]
    pub delta: bool,

    /// Read G-code from this file instead of stdin
    #[arg(long, short, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write G-code to this file instead of stdout
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Log level for the filter
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Where calibration points come from
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationSource {
    pub path: PathBuf,
    /// `None` when the mode should be read from the document itself
    pub mode: Option<MappingMode>,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub calibration: Option<CalibrationSource>,
    pub radius: Option<f64>,
    pub delta: bool,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub log_level: String,
}

impl Config {
    /// Create configuration from parsed command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        Self::from_args_with_search(args, &Self::search_dirs())
    }

    /// Like [`Config::from_args`], but with explicit directories to search
    /// when no calibration file is given.
    pub fn from_args_with_search(args: Args, search_dirs: &[PathBuf]) -> Result<Self> {
        if let Some(radius) = args.radius {
            anyhow::ensure!(
                radius.is_finite() && radius >= 0.0,
                "radius must be a non-negative number, got {}",
                radius
            );
        }

        let calibration = match (args.map, args.offsets) {
            (Some(path), _) => Some(CalibrationSource {
                path,
                mode: Some(MappingMode::Absolute),
            }),
            (None, Some(path)) => Some(CalibrationSource {
                path,
                mode: Some(MappingMode::Offset),
            }),
            (None, None) => find_calibration(search_dirs),
        };

        Ok(Config {
            calibration,
            radius: args.radius,
            delta: args.delta,
            input: args.input,
            output: args.output,
            log_level: args.log_level,
        })
    }

    /// Default directories searched for a calibration file
    pub fn search_dirs() -> Vec<PathBuf> {
        let mut search = Vec::new();

        // Add default user config directory
        if let Some(config_dir) = dirs::config_dir() {
            search.push(config_dir.join("gfilter"));
        }

        search
    }
}

/// First default calibration file found in `search_dirs`
pub fn find_calibration(search_dirs: &[PathBuf]) -> Option<CalibrationSource> {
    search_dirs
        .iter()
        .flat_map(|dir| DEFAULT_CALIBRATION_FILES.iter().map(move |name| dir.join(name)))
        .find(|path| is_file(path))
        .map(|path| {
            log::info!("Using calibration file: {:?}", path);
            CalibrationSource { path, mode: None }
        })
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}
