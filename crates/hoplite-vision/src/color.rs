//! Pixel color comparison.

use crate::Region;

/// RGB color with channels in `0.0..=1.0`.
pub type Color = [f32; 3];

/// Default tolerance for exact color matches.
pub const TOLERANCE: f32 = 0.001;

pub const WHITE: Color = [1.0, 1.0, 1.0];
pub const BLACK: Color = [0.0, 0.0, 0.0];

/// Whether every channel of `target` is within [`TOLERANCE`] of `reference`.
#[inline]
pub fn is_close(target: Color, reference: Color) -> bool {
    is_close_with(target, reference, TOLERANCE)
}

/// Whether every channel of `target` is within `tolerance` of `reference`.
#[inline]
pub fn is_close_with(target: Color, reference: Color, tolerance: f32) -> bool {
    target
        .iter()
        .zip(reference.iter())
        .all(|(t, r)| (t - r).abs() <= tolerance)
}

/// Convert an 8-bit color to normalized channels.
#[inline]
pub fn norm(rgb: [u8; 3]) -> Color {
    rgb.map(|c| c as f32 / 255.0)
}

/// Color of the pixel at column `x`, row `y` of a part.
#[inline]
pub(crate) fn at(part: &Region, x: u32, y: u32) -> Color {
    part.get_pixel(x, y).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_norm() {
        assert_eq!(norm([255, 0, 255]), [1.0, 0.0, 1.0]);
        assert!(is_close(norm([189, 36, 49]), [0.741176, 0.141176, 0.192157]));
    }

    #[test]
    fn test_tolerance_is_absolute() {
        assert!(is_close([0.5, 0.5, 0.5], [0.5009, 0.4991, 0.5]));
        assert!(!is_close([0.5, 0.5, 0.5], [0.5, 0.5, 0.502]));
        assert!(is_close_with([0.2, 0.2, 0.2], [0.22, 0.18, 0.2], 0.03));
    }

    proptest! {
        #[test]
        fn color_is_close_to_itself(r in 0.0f32..=1.0, g in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            prop_assert!(is_close([r, g, b], [r, g, b]));
        }

        #[test]
        fn shifted_channel_is_not_close(
            color in prop::array::uniform3(0.0f32..0.5),
            channel in 0usize..3,
            delta in 0.0015f32..0.5,
            negative in any::<bool>(),
        ) {
            let mut shifted = color;
            shifted[channel] += if negative { -delta } else { delta };
            prop_assert!(!is_close(color, shifted));
        }
    }
}
