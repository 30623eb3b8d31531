use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File looked up in the data directory by [`ScreenLayout::load`].
pub const LAYOUT_FILE: &str = "layout.json";

/// Geometry of a grid of same-sized screen parts.
///
/// `anchor_x`/`anchor_y` is the top-left corner of the first part for uniform
/// grids, and the center of the origin tile for the hexagonal terrain grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub width: u32,
    pub height: u32,
    pub anchor_x: i32,
    pub anchor_y: i32,
    #[serde(default)]
    pub hmargin: i32,
    #[serde(default)]
    pub vmargin: i32,
}

impl GridSpec {
    pub const fn new(width: u32, height: u32, anchor_x: i32, anchor_y: i32) -> Self {
        Self {
            width,
            height,
            anchor_x,
            anchor_y,
            hmargin: 0,
            vmargin: 0,
        }
    }

    pub fn with_margins(mut self, hmargin: i32, vmargin: i32) -> Self {
        self.hmargin = hmargin;
        self.vmargin = vmargin;
        self
    }
}

/// Where and how the altar prayer list is scanned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrayerScanSpec {
    pub width: u32,
    pub height: u32,
    /// Pixel column watched for divider rows; also the left edge of each part.
    pub column: u32,
    /// First row of the scan, where the cursor returns after each full list.
    pub start_row: u32,
    /// Scan stops before this row.
    pub end_row: u32,
}

impl Default for PrayerScanSpec {
    fn default() -> Self {
        Self {
            width: 900,
            height: 120,
            column: 40,
            start_row: 450,
            end_row: 1600,
        }
    }
}

/// Tuned thresholds for recognizing the fleece reward screen from one pixel
/// whose green channel follows its red channel linearly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FleeceHeuristic {
    pub slope: f32,
    pub intercept: f32,
    /// Allowed distance between the green channel and the fitted line.
    pub tolerance: f32,
    /// Largest allowed channel difference to pure yellow.
    pub max_deviation: f32,
}

impl Default for FleeceHeuristic {
    fn default() -> Self {
        Self {
            slope: 0.80465513,
            intercept: 0.018641233,
            tolerance: 0.03,
            max_deviation: 0.5,
        }
    }
}

/// Positions of every screen part read by the parser, for a 1080x1920
/// portrait capture of game version 2.6.1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenLayout {
    pub terrain: GridSpec,
    pub depth: GridSpec,
    pub cooldown: GridSpec,
    /// Probe area telling how many digits the energy counter has.
    pub energy: GridSpec,
    pub energy_one: GridSpec,
    pub energy_two: GridSpec,
    pub energy_three: GridSpec,
    pub spear: GridSpec,
    pub hearts: GridSpec,
    pub spree: GridSpec,
    pub prayer: PrayerScanSpec,
    pub fleece: FleeceHeuristic,
}

impl Default for ScreenLayout {
    fn default() -> Self {
        Self {
            terrain: GridSpec::new(52, 52, 540, 903).with_margins(104, 112),
            depth: GridSpec::new(20, 28, 178, 70).with_margins(4, 0),
            cooldown: GridSpec::new(20, 28, 158, 1885),
            energy: GridSpec::new(40, 28, 552, 1885),
            energy_one: GridSpec::new(20, 28, 520, 1885).with_margins(4, 0),
            energy_two: GridSpec::new(20, 28, 508, 1885).with_margins(4, 0),
            energy_three: GridSpec::new(20, 28, 496, 1885).with_margins(4, 0),
            spear: GridSpec::new(16, 96, 892, 1776),
            hearts: GridSpec::new(80, 80, 26, 1664),
            spree: GridSpec::new(60, 72, 874, 1668),
            prayer: PrayerScanSpec::default(),
            fleece: FleeceHeuristic::default(),
        }
    }
}

impl ScreenLayout {
    /// Load the layout from `data_dir/layout.json`.
    ///
    /// Falls back to the built-in layout when the file does not exist; fields
    /// missing from the file keep their built-in values.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(LAYOUT_FILE);
        if !path.exists() {
            tracing::warn!(
                "No {} found at {}, using built-in screen layout",
                LAYOUT_FILE,
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let layout: ScreenLayout = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::info!("Loaded screen layout from {}", path.display());
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_nonexistent() {
        let layout = ScreenLayout::load(Path::new("/nonexistent")).unwrap();
        assert_eq!(layout, ScreenLayout::default());
    }

    #[test]
    fn test_load_partial_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(LAYOUT_FILE),
            r#"{ "depth": { "width": 22, "height": 30, "anchor_x": 180, "anchor_y": 72 },
                 "fleece": { "slope": 0.8, "intercept": 0.02, "tolerance": 0.05, "max_deviation": 0.4 } }"#,
        )
        .unwrap();

        let layout = ScreenLayout::load(dir.path()).unwrap();
        assert_eq!(layout.depth, GridSpec::new(22, 30, 180, 72));
        assert_eq!(layout.fleece.tolerance, 0.05);
        assert_eq!(layout.hearts, ScreenLayout::default().hearts);
        assert_eq!(layout.prayer.start_row, 450);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(LAYOUT_FILE), "{ not json").unwrap();
        assert!(ScreenLayout::load(dir.path()).is_err());
    }
}
