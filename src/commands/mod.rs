use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use hoplite_data::ScreenLayout;
use hoplite_vision::{PartsRecorder, ScreenParser};

mod capture;
mod parse;

pub use capture::watch;
pub use parse::parse;

/// Reads Hoplite screenshots into structured game state
#[derive(Parser, Debug)]
#[command(name = "hoplite-observer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding layout.json
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse one screenshot and print the observation as JSON
    Parse {
        /// Screenshot file, 1080x1920
        image: PathBuf,

        /// Save every extracted part to this directory
        #[arg(long)]
        parts_dir: Option<PathBuf>,
    },
    /// Observe a live source, printing one JSON line per observation
    Watch(WatchArgs),
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub source: Source,

    /// Delay between two screenshots
    #[arg(long, default_value_t = 500)]
    pub interval_ms: u64,

    /// Save every extracted part to this directory
    #[arg(long)]
    pub parts_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct Source {
    /// Image file rewritten by another tool
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Title (or part of it) of an emulator window
    #[arg(long)]
    pub window: Option<String>,

    /// Android device connected through adb
    #[arg(long)]
    pub adb: bool,
}

/// Resolve the data directory for layout configuration
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));
    if let Some(dir) = exe_dir {
        // target/<profile>/hoplite-observer → project root
        let project_root = dir.parent().and_then(|p| p.parent());
        if let Some(root) = project_root {
            let data = root.join("data");
            if data.exists() {
                return data;
            }
        }
    }
    PathBuf::from("data")
}

pub fn build_parser(data_dir: &Path, parts_dir: Option<&Path>) -> Result<ScreenParser> {
    let layout = ScreenLayout::load(data_dir)?;
    let parser = ScreenParser::with_layout(&layout);
    Ok(match parts_dir {
        Some(dir) => {
            tracing::info!("Recording parts to {}", dir.display());
            parser.record_parts(PartsRecorder::new(dir)?)
        }
        None => parser,
    })
}
