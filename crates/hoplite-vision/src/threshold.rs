use crate::color::{BLACK, WHITE};
use crate::Region;

/// Binarizes a part: pixels whose mean channel reaches the threshold become
/// white, all others black.
#[derive(Debug, Clone, Copy)]
pub struct Thresholder {
    threshold: f32,
}

impl Thresholder {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn apply(&self, part: &Region) -> Region {
        let limit = 3.0 * self.threshold;
        Region::from_fn(part.width(), part.height(), |x, y| {
            let [r, g, b] = part.get_pixel(x, y).0;
            if r + g + b >= limit {
                image::Rgb(WHITE)
            } else {
                image::Rgb(BLACK)
            }
        })
    }
}

impl Default for Thresholder {
    fn default() -> Self {
        Self::new(0.5)
    }
}
