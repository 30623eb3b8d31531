//! Screen parsing for Hoplite screenshots.
//!
//! Locators cut fixed-size parts out of a [`Capture`], classifiers turn a part
//! into a label by comparing a few probe pixels against reference colors, and
//! [`ScreenParser`] combines both into game and altar states.

pub mod classifiers;
pub mod color;
mod locator;
mod parser;
mod parts;
mod threshold;

#[cfg(test)]
mod fixtures;

pub use classifiers::{Glyph, Heart, Skull};
pub use locator::{GridLocator, HexLocator, Locator, PrayerLocator};
pub use parser::ScreenParser;
pub use parts::PartsRecorder;
pub use threshold::Thresholder;

pub use hoplite_capture::Capture;

/// A part of a capture, cut by a locator.
pub type Region = image::Rgb32FImage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisionError {
    #[error("part at ({x}, {y}) of size {width}x{height} lies outside the capture")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    #[error("classifier expects a {expected_width}x{expected_height} part, got {width}x{height}")]
    Shape {
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },
    #[error("number read by {locator} does not fit in 32 bits")]
    NumberOverflow { locator: String },
    #[error("invalid terrain: {0}")]
    Terrain(String),
}
