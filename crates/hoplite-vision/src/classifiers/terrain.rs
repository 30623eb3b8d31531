//! Terrain tile recognition.
//!
//! Most tiles are told apart by the color at the center-left of the tile
//! (`BASE_PROBE`). Altars, demolitionists and wizards have a second probe for
//! their state.

use hoplite_state::SurfaceElement;

use crate::color::{at, is_close, norm};
use crate::{Region, VisionError};

pub const TILE_SIZE: u32 = 52;

const BASE_PROBE: (u32, u32) = (27, 20);

type Predicate = fn(&Region) -> bool;

/// Tile predicates in priority order. The first match wins.
const TERRAIN_CLASSIFIERS: [(Predicate, SurfaceElement); 16] = [
    (is_altar_on, SurfaceElement::AltarOn),
    (is_altar_off, SurfaceElement::AltarOff),
    (is_archer, SurfaceElement::Archer),
    (is_bomb, SurfaceElement::Bomb),
    (is_demolitionist_without_bomb, SurfaceElement::DemolitionistWithoutBomb),
    (is_demolitionist_holding_bomb, SurfaceElement::DemolitionistHoldingBomb),
    (is_fleece, SurfaceElement::Fleece),
    (is_footman, SurfaceElement::Footman),
    (is_ground, SurfaceElement::Ground),
    (is_magma, SurfaceElement::Magma),
    (is_player, SurfaceElement::Player),
    (is_portal, SurfaceElement::Portal),
    (is_spear, SurfaceElement::Spear),
    (is_stairs, SurfaceElement::Stairs),
    (is_wizard_charged, SurfaceElement::WizardCharged),
    (is_wizard_discharged, SurfaceElement::WizardDischarged),
];

/// Classify a 52x52 terrain tile; `None` when no predicate matches.
pub fn classify(part: &Region) -> Result<Option<SurfaceElement>, VisionError> {
    super::expect_shape(part, TILE_SIZE, TILE_SIZE)?;
    Ok(TERRAIN_CLASSIFIERS
        .iter()
        .find(|(predicate, _)| predicate(part))
        .map(|(_, element)| *element))
}

fn probe(part: &Region, (x, y): (u32, u32), rgb: [u8; 3]) -> bool {
    is_close(at(part, x, y), norm(rgb))
}

fn base_is(part: &Region, rgb: [u8; 3]) -> bool {
    probe(part, BASE_PROBE, rgb)
}

fn is_altar(part: &Region) -> bool {
    base_is(part, [214, 219, 173])
}

fn altar_lit(part: &Region) -> bool {
    probe(part, (51, 40), [230, 93, 90])
}

fn is_altar_on(part: &Region) -> bool {
    is_altar(part) && altar_lit(part)
}

fn is_altar_off(part: &Region) -> bool {
    is_altar(part) && !altar_lit(part)
}

fn is_archer(part: &Region) -> bool {
    base_is(part, [74, 113, 41])
}

fn is_bomb(part: &Region) -> bool {
    base_is(part, [230, 93, 90]) || base_is(part, [255, 190, 66])
}

fn is_demolitionist(part: &Region) -> bool {
    base_is(part, [123, 97, 66])
}

fn demolitionist_has_bomb(part: &Region) -> bool {
    probe(part, (19, 28), [230, 93, 90])
}

fn is_demolitionist_holding_bomb(part: &Region) -> bool {
    is_demolitionist(part) && demolitionist_has_bomb(part)
}

fn is_demolitionist_without_bomb(part: &Region) -> bool {
    is_demolitionist(part) && !demolitionist_has_bomb(part)
}

fn is_fleece(part: &Region) -> bool {
    base_is(part, [189, 154, 0])
}

fn is_footman(part: &Region) -> bool {
    base_is(part, [206, 202, 206])
}

fn is_ground(part: &Region) -> bool {
    base_is(part, [49, 53, 49])
}

fn is_magma(part: &Region) -> bool {
    base_is(part, [197, 61, 8]) || base_is(part, [82, 40, 8]) || base_is(part, [197, 49, 0])
}

fn is_player(part: &Region) -> bool {
    probe(part, (20, 14), [255, 255, 255])
}

fn is_portal(part: &Region) -> bool {
    probe(part, (35, 20), [16, 142, 148])
}

fn is_spear(part: &Region) -> bool {
    probe(part, (22, 27), [115, 65, 25])
}

fn is_stairs(part: &Region) -> bool {
    base_is(part, [148, 162, 82])
}

fn is_wizard(part: &Region) -> bool {
    base_is(part, [156, 174, 206])
}

fn is_wizard_charged(part: &Region) -> bool {
    is_wizard(part) && probe(part, (0, 0), [197, 40, 58])
}

fn is_wizard_discharged(part: &Region) -> bool {
    is_wizard(part) && probe(part, (0, 0), [90, 85, 90])
}
