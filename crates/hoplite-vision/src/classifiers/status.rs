//! Classifiers for the status HUD at the bottom of the screen.

use crate::color::{at, is_close, norm, Color};
use crate::{Region, VisionError};

const HEART_HEALTHY: Color = [0.741176, 0.141176, 0.192157];
const HEART_HURT: Color = [0.321569, 0.333333, 0.321569];
const SPEAR_ORANGE: Color = [0.937255, 0.541176, 0.192157];
const ENERGY_YELLOW: [u8; 3] = [230, 231, 90];
const SKULL_EMPTY: Color = [0.094118, 0.094118, 0.094118];
const SKULL_OFF: Color = [0.321569, 0.333333, 0.321569];

/// State of one heart of the life bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heart {
    Healthy,
    Hurt,
    /// No heart: the life bar ended.
    Empty,
}

/// State of one killing spree skull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skull {
    On,
    Off,
    Empty,
}

/// Classify an 80x80 heart of the life bar.
pub fn heart(part: &Region) -> Result<Heart, VisionError> {
    super::expect_shape(part, 80, 80)?;
    let probe = at(part, 40, 50);
    Ok(if is_close(probe, HEART_HEALTHY) {
        Heart::Healthy
    } else if is_close(probe, HEART_HURT) {
        Heart::Hurt
    } else {
        Heart::Empty
    })
}

/// Whether the spear is in the inventory, from the 16x96 spear slot.
pub fn spear(part: &Region) -> Result<bool, VisionError> {
    super::expect_shape(part, 16, 96)?;
    Ok(is_close(at(part, 10, 40), SPEAR_ORANGE))
}

/// Number of digits of the energy counter, from the 40x28 part right of the
/// two-digit position. The lightning symbol is yellow and shows where the
/// number ends.
pub fn energy_digits(part: &Region) -> Result<usize, VisionError> {
    super::expect_shape(part, 40, 28)?;
    let yellow = norm(ENERGY_YELLOW);
    Ok(if is_close(at(part, 0, 0), yellow) {
        1
    } else if is_close(at(part, 20, 0), yellow) {
        3
    } else {
        2
    })
}

/// Classify a 60x72 killing spree skull.
pub fn spree(part: &Region) -> Result<Skull, VisionError> {
    super::expect_shape(part, 60, 72)?;
    let probe = at(part, 30, 36);
    Ok(if is_close(probe, SKULL_EMPTY) {
        Skull::Empty
    } else if is_close(probe, SKULL_OFF) {
        Skull::Off
    } else {
        Skull::On
    })
}
