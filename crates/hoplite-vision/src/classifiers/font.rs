use crate::color::{at, is_close, BLACK, WHITE};
use crate::{Region, VisionError};

pub const GLYPH_WIDTH: u32 = 20;
pub const GLYPH_HEIGHT: u32 = 28;

/// A character of the in-game font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Digit(u8),
    /// Energy symbol following the energy counter.
    Lightning,
    Empty,
}

impl Glyph {
    pub fn digit(&self) -> Option<u8> {
        match self {
            Glyph::Digit(d) => Some(*d),
            _ => None,
        }
    }
}

/// Recognize a thresholded 20x28 character.
pub fn classify(part: &Region) -> Result<Glyph, VisionError> {
    super::expect_shape(part, GLYPH_WIDTH, GLYPH_HEIGHT)?;

    let white = |x, y| is_close(at(part, x, y), WHITE);
    let black = |x, y| is_close(at(part, x, y), BLACK);

    let glyph = if white(9, 0) {
        if white(5, 0) {
            if white(0, 0) {
                if white(10, 20) {
                    if black(17, 0) {
                        Glyph::Lightning
                    } else {
                        Glyph::Digit(7)
                    }
                } else {
                    Glyph::Digit(5)
                }
            } else if white(2, 20) {
                if black(17, 17) {
                    Glyph::Digit(2)
                } else if white(0, 10) {
                    if black(0, 12) {
                        Glyph::Digit(8)
                    } else {
                        Glyph::Digit(0)
                    }
                } else {
                    Glyph::Digit(3)
                }
            } else {
                Glyph::Digit(9)
            }
        } else if white(0, 10) {
            Glyph::Digit(6)
        } else {
            Glyph::Digit(1)
        }
    } else if white(5, 9) {
        Glyph::Digit(4)
    } else {
        Glyph::Empty
    };

    Ok(glyph)
}
