use hoplite_state::Prayer;

use crate::color::{at, is_close, Color, WHITE};
use crate::{Region, VisionError};

pub const PRAYER_WIDTH: u32 = 900;
pub const PRAYER_HEIGHT: u32 = 120;

const RESTORATION_GOLD: Color = [1.000000, 0.827451, 0.000000];
const FORTITUDE_RED: Color = [0.905882, 0.364706, 0.352941];
const BOOT_BROWN: Color = [0.388235, 0.286275, 0.094118];
const DIVIDER_BROWN: Color = [0.352941, 0.270588, 0.160784];
const SPEAR_ORANGE: Color = [0.937255, 0.541176, 0.192157];
const ENERGY_BROWN: Color = [0.482353, 0.380392, 0.258824];
const SHIELD_GRAY: Color = [0.450980, 0.443137, 0.450980];
const PATIENCE_YELLOW: Color = [0.968627, 0.890196, 0.419608];

/// Recognize the prayer shown in a 900x120 altar entry.
///
/// The first probes select the icon family, later ones read the text to tell
/// variants of a family apart. Returns `None` for an entry that matches no
/// known prayer.
pub fn classify(part: &Region) -> Result<Option<Prayer>, VisionError> {
    super::expect_shape(part, PRAYER_WIDTH, PRAYER_HEIGHT)?;

    let probe = |x, y, color| is_close(at(part, x, y), color);

    let prayer = if probe(90, 75, RESTORATION_GOLD) {
        Some(Prayer::DivineRestoration)
    } else if probe(90, 75, FORTITUDE_RED) {
        Some(Prayer::Fortitude)
    } else if probe(50, 100, BOOT_BROWN) {
        if probe(795, 50, WHITE) {
            Some(Prayer::GreaterEnergyII)
        } else if probe(580, 38, WHITE) {
            if probe(735, 60, DIVIDER_BROWN) {
                Some(Prayer::WingedSandals)
            } else {
                Some(Prayer::StaggeringLeap)
            }
        } else {
            Some(Prayer::Bloodlust)
        }
    } else if probe(83, 100, SPEAR_ORANGE) {
        if probe(680, 50, WHITE) {
            Some(Prayer::GreaterThrow)
        } else {
            Some(Prayer::DeepLunge)
        }
    } else if probe(50, 50, ENERGY_BROWN) {
        Some(Prayer::GreaterEnergy)
    } else if probe(72, 87, SHIELD_GRAY) {
        if probe(370, 60, DIVIDER_BROWN) {
            Some(Prayer::QuickBash)
        } else if probe(638, 60, WHITE) {
            if probe(215, 89, DIVIDER_BROWN) {
                Some(Prayer::SweepingBash)
            } else {
                Some(Prayer::SpinningBash)
            }
        } else {
            Some(Prayer::MightyBash)
        }
    } else if probe(200, 50, WHITE) {
        if probe(755, 60, WHITE) {
            Some(Prayer::GreaterThrowII)
        } else {
            Some(Prayer::DeepLunge)
        }
    } else if probe(536, 36, WHITE) {
        Some(Prayer::Regeneration)
    } else if probe(300, 86, WHITE) {
        Some(Prayer::Surge)
    } else if probe(82, 70, PATIENCE_YELLOW) {
        Some(Prayer::Patience)
    } else {
        None
    };

    Ok(prayer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn entry(probes: &[(u32, u32, Color)]) -> Region {
        let mut part = Region::new(PRAYER_WIDTH, PRAYER_HEIGHT);
        for &(x, y, color) in probes {
            part.put_pixel(x, y, Rgb(color));
        }
        part
    }

    #[test]
    fn test_icon_families() {
        let cases: Vec<(Vec<(u32, u32, Color)>, Prayer)> = vec![
            (vec![(90, 75, RESTORATION_GOLD)], Prayer::DivineRestoration),
            (vec![(90, 75, FORTITUDE_RED)], Prayer::Fortitude),
            (vec![(50, 100, BOOT_BROWN)], Prayer::Bloodlust),
            (vec![(50, 100, BOOT_BROWN), (795, 50, WHITE)], Prayer::GreaterEnergyII),
            (vec![(50, 100, BOOT_BROWN), (580, 38, WHITE)], Prayer::StaggeringLeap),
            (
                vec![(50, 100, BOOT_BROWN), (580, 38, WHITE), (735, 60, DIVIDER_BROWN)],
                Prayer::WingedSandals,
            ),
            (vec![(83, 100, SPEAR_ORANGE)], Prayer::DeepLunge),
            (vec![(83, 100, SPEAR_ORANGE), (680, 50, WHITE)], Prayer::GreaterThrow),
            (vec![(50, 50, ENERGY_BROWN)], Prayer::GreaterEnergy),
            (vec![(72, 87, SHIELD_GRAY)], Prayer::MightyBash),
            (vec![(72, 87, SHIELD_GRAY), (370, 60, DIVIDER_BROWN)], Prayer::QuickBash),
            (vec![(72, 87, SHIELD_GRAY), (638, 60, WHITE)], Prayer::SpinningBash),
            (
                vec![(72, 87, SHIELD_GRAY), (638, 60, WHITE), (215, 89, DIVIDER_BROWN)],
                Prayer::SweepingBash,
            ),
            (vec![(200, 50, WHITE)], Prayer::DeepLunge),
            (vec![(200, 50, WHITE), (755, 60, WHITE)], Prayer::GreaterThrowII),
            (vec![(536, 36, WHITE)], Prayer::Regeneration),
            (vec![(300, 86, WHITE)], Prayer::Surge),
            (vec![(82, 70, PATIENCE_YELLOW)], Prayer::Patience),
        ];
        for (probes, expected) in cases {
            assert_eq!(classify(&entry(&probes)).unwrap(), Some(expected), "{:?}", probes);
        }
    }

    #[test]
    fn test_family_probe_shadows_text_probes() {
        // Bash text probe set, but the boot icon is checked first
        let part = entry(&[(50, 100, BOOT_BROWN), (72, 87, SHIELD_GRAY)]);
        assert_eq!(classify(&part).unwrap(), Some(Prayer::Bloodlust));
    }

    #[test]
    fn test_unknown_entry() {
        assert_eq!(classify(&entry(&[])).unwrap(), None);
    }

    #[test]
    fn test_wrong_shape() {
        assert!(classify(&Region::new(120, 900)).is_err());
    }
}
