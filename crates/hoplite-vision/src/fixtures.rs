//! Synthetic screenshots for tests.

use hoplite_capture::{Capture, CAPTURE_HEIGHT, CAPTURE_WIDTH};
use image::Rgb;

use crate::classifiers::Glyph;
use crate::color::{Color, WHITE};
use crate::Region;

/// All-black full screen.
pub fn blank() -> Region {
    Region::new(CAPTURE_WIDTH, CAPTURE_HEIGHT)
}

pub fn blank_with(color: Rgb<f32>) -> Region {
    Region::from_pixel(CAPTURE_WIDTH, CAPTURE_HEIGHT, color)
}

pub fn capture(img: Region) -> Capture {
    Capture::from_rgb32f(img).unwrap()
}

pub fn paint(img: &mut Region, x: u32, y: u32, color: Color) {
    img.put_pixel(x, y, Rgb(color));
}

/// White pixels the font classifier reads for each glyph. Everything else of
/// the 20x28 cell stays black.
fn glyph_pixels(glyph: Glyph) -> &'static [(u32, u32)] {
    match glyph {
        Glyph::Digit(0) => &[(9, 0), (5, 0), (2, 20), (17, 17), (0, 10), (0, 12)],
        Glyph::Digit(1) => &[(9, 0)],
        Glyph::Digit(2) => &[(9, 0), (5, 0), (2, 20)],
        Glyph::Digit(3) => &[(9, 0), (5, 0), (2, 20), (17, 17)],
        Glyph::Digit(4) => &[(5, 9)],
        Glyph::Digit(5) => &[(9, 0), (5, 0), (0, 0)],
        Glyph::Digit(6) => &[(9, 0), (0, 10)],
        Glyph::Digit(7) => &[(9, 0), (5, 0), (0, 0), (10, 20), (17, 0)],
        Glyph::Digit(8) => &[(9, 0), (5, 0), (2, 20), (17, 17), (0, 10)],
        Glyph::Digit(9) => &[(9, 0), (5, 0)],
        Glyph::Digit(d) => panic!("no glyph for digit {}", d),
        Glyph::Lightning => &[(9, 0), (5, 0), (0, 0), (10, 20)],
        Glyph::Empty => &[],
    }
}

/// Draw `glyph` in the 20x28 cell whose top-left corner is `(x0, y0)`.
pub fn paint_glyph(img: &mut Region, x0: u32, y0: u32, glyph: Glyph) {
    for &(x, y) in glyph_pixels(glyph) {
        paint(img, x0 + x, y0 + y, WHITE);
    }
}
