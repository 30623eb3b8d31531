use anyhow::{Context, Result};
use image::{DynamicImage, Rgb32FImage};
use std::path::Path;

mod provider;

#[cfg(feature = "window")]
pub use provider::WindowProvider;
pub use provider::{capture_loop, CaptureStatus, CommandProvider, FileProvider, SnapshotProvider};

/// Width of a portrait 1080p device screen, the only supported resolution.
pub const CAPTURE_WIDTH: u32 = 1080;

/// Height of a portrait 1080p device screen.
pub const CAPTURE_HEIGHT: u32 = 1920;

/// Rejected capture input.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("capture is {width}x{height}, expected {expected_width}x{expected_height}")]
    Dimensions {
        width: u32,
        height: u32,
        expected_width: u32,
        expected_height: u32,
    },
    #[error("failed to decode capture: {0}")]
    Decode(#[from] image::ImageError),
}

/// One screenshot of the game, RGB normalized to `0.0..=1.0`.
///
/// The capture is checked against the fixed screen resolution when built and
/// never changes afterwards.
#[derive(Debug, Clone)]
pub struct Capture {
    image: Rgb32FImage,
}

impl Capture {
    /// Normalize a decoded image. Alpha is discarded and 8/16-bit channels
    /// are scaled into `0.0..=1.0`.
    pub fn from_image(image: DynamicImage) -> Result<Self, CaptureError> {
        Self::from_rgb32f(image.to_rgb32f())
    }

    /// Wrap an already normalized image.
    pub fn from_rgb32f(image: Rgb32FImage) -> Result<Self, CaptureError> {
        let (width, height) = image.dimensions();
        if (width, height) != (CAPTURE_WIDTH, CAPTURE_HEIGHT) {
            return Err(CaptureError::Dimensions {
                width,
                height,
                expected_width: CAPTURE_WIDTH,
                expected_height: CAPTURE_HEIGHT,
            });
        }
        Ok(Self { image })
    }

    /// Decode an encoded screenshot (PNG from a device, file contents, ...).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CaptureError> {
        Self::from_image(image::load_from_memory(bytes)?)
    }

    /// Read a screenshot file.
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Self::from_image(img).with_context(|| format!("Invalid capture {}", path.display()))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &Rgb32FImage {
        &self.image
    }

    /// Color of the pixel at column `x`, row `y`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        self.image.get_pixel(x, y).0
    }

    /// Copy the `width`x`height` rectangle whose top-left corner is `(x, y)`.
    ///
    /// The rectangle is clamped to the capture; callers check bounds first.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Rgb32FImage {
        image::imageops::crop_imm(&self.image, x, y, width, height).to_image()
    }

    /// Write the capture as an 8-bit image file.
    pub fn save(&self, path: &Path) -> Result<()> {
        save_rgb32f(&self.image, path)
    }
}

/// Write a normalized image as 8-bit RGB, format picked from the extension.
pub fn save_rgb32f(image: &Rgb32FImage, path: &Path) -> Result<()> {
    DynamicImage::ImageRgb32F(image.clone())
        .to_rgb8()
        .save(path)
        .with_context(|| format!("Failed to save {}", path.display()))
}
