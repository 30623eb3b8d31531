//! Detection of the screen currently displayed.

use hoplite_capture::Capture;
use hoplite_data::FleeceHeuristic;
use hoplite_state::Interface;

use crate::color::{is_close, Color, WHITE};

const ALTAR_BROWN: Color = [0.352941, 0.270588, 0.160784];
const ALTAR_GRAY: Color = [0.290196, 0.301961, 0.290196];
const DEATH_RED: Color = [0.647059, 0.000000, 0.000000];
const FLEECE_GOLD: Color = [0.937255, 0.764706, 0.000000];
const LOADING_BLACK: Color = [0.094118, 0.109804, 0.094118];
const PURE_YELLOW: Color = [1.0, 1.0, 0.0];

/// Classify a full capture with the default fleece thresholds.
pub fn classify(capture: &Capture) -> Interface {
    classify_with(capture, &FleeceHeuristic::default())
}

/// Classify a full capture. Probes are checked in priority order; the
/// gameplay screen is the fallback.
pub fn classify_with(capture: &Capture, fleece: &FleeceHeuristic) -> Interface {
    let probe = |x, y, color| is_close(capture.pixel(x, y), color);

    if probe(1000, 600, ALTAR_BROWN) || probe(1000, 600, ALTAR_GRAY) {
        return Interface::Altar;
    }
    if probe(640, 635, DEATH_RED) {
        return Interface::Death;
    }
    if probe(20, 80, WHITE) {
        return Interface::Embark;
    }
    if probe(540, 1000, FLEECE_GOLD) {
        return Interface::Fleece;
    }
    if probe(640, 275, WHITE) {
        return Interface::Victory;
    }
    if probe(540, 1450, WHITE) {
        return Interface::Stairs;
    }
    if probe(1000, 750, ALTAR_BROWN) {
        return Interface::Altar;
    }
    if is_fleece_glow(capture.pixel(543, 1011), fleece) {
        return Interface::Fleece;
    }
    if probe(542, 949, LOADING_BLACK) {
        return Interface::Black;
    }
    Interface::Playing
}

/// The fleece screen glows with a shade of yellow that varies with the
/// animation frame, but whose green channel stays on a line in the red one.
fn is_fleece_glow(pixel: Color, fleece: &FleeceHeuristic) -> bool {
    let [r, g, _] = pixel;
    if (r * fleece.slope + fleece.intercept - g).abs() >= fleece.tolerance {
        return false;
    }
    let deviation = pixel
        .iter()
        .zip(PURE_YELLOW.iter())
        .map(|(c, y)| (c - y).abs())
        .fold(0.0f32, f32::max);
    deviation < fleece.max_deviation
}
