//! Classifiers turning a part of a capture into a discrete label.
//!
//! Every classifier samples a handful of probe pixels at fixed offsets and
//! compares them with reference colors. The order of the comparisons matters:
//! they are written as nested branches and must stay in this order.

pub mod font;
pub mod interface;
pub mod prayer;
pub mod status;
pub mod terrain;

pub use font::Glyph;
pub use status::{Heart, Skull};

use crate::{Region, VisionError};

/// Check the size of a part before probing it.
pub(crate) fn expect_shape(part: &Region, width: u32, height: u32) -> Result<(), VisionError> {
    let (w, h) = part.dimensions();
    if (w, h) != (width, height) {
        return Err(VisionError::Shape {
            width: w,
            height: h,
            expected_width: width,
            expected_height: height,
        });
    }
    Ok(())
}
