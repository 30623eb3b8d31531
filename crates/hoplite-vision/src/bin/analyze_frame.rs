//! CLI tool to run a saved Hoplite screenshot through every locator and
//! classifier, dumping the extracted parts for inspection.
//! Usage: cargo run -p hoplite-vision --features cli --bin analyze_frame -- <screenshot.png> [output_dir] [data_dir]

use anyhow::{Context, Result};
use hoplite_data::ScreenLayout;
use hoplite_state::Interface;
use hoplite_vision::{Capture, PartsRecorder, ScreenParser};
use std::path::PathBuf;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <screenshot.png> [output_dir] [data_dir]", args[0]);
        std::process::exit(1);
    }

    let input_path = PathBuf::from(&args[1]);
    let output_dir = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./debug_output"));
    let layout = match args.get(3) {
        Some(dir) => ScreenLayout::load(&PathBuf::from(dir))?,
        None => ScreenLayout::default(),
    };

    println!("Loading image: {}", input_path.display());
    let capture = Capture::open(&input_path)?;

    let recorder = PartsRecorder::new(&output_dir)?;
    let mut parser = ScreenParser::with_layout(&layout).record_parts(recorder);

    let interface = parser.interface(&capture);
    println!("\n=== Interface ===");
    println!("{:?}", interface);

    println!("\n=== Status ===");
    println!("Depth: {}", parser.observe_depth(&capture)?);
    println!("Energy: {}", parser.observe_energy(&capture)?);
    println!("Cooldown: {}", parser.observe_cooldown(&capture)?);
    let (health, maximum_health) = parser.observe_hearts(&capture)?;
    println!("Hearts: {}/{}", health, maximum_health);
    println!("Spear: {}", parser.observe_spear(&capture)?);
    println!("Spree: {}", parser.observe_spree(&capture)?);

    println!("\n=== Terrain ===");
    let terrain = parser
        .observe_terrain(&capture)
        .context("Failed to read terrain")?;
    for (coords, element) in terrain.iter() {
        match element {
            Some(e) => println!("  ({:>2}, {:>2}): {:?}", coords.x, coords.y, e),
            None => println!("  ({:>2}, {:>2}): UNKNOWN", coords.x, coords.y),
        }
    }

    if interface == Interface::Altar {
        println!("\n=== Altar ===");
        let altar = parser.observe_altar(&capture)?;
        for slot in &altar.prayers {
            println!("  row {:>4}: {:?}", slot.row, slot.prayer);
        }
    }

    println!("\nParts saved to: {}", output_dir.display());
    Ok(())
}
