use hoplite_capture::Capture;
use hoplite_data::{GridSpec, PrayerScanSpec};
use tracing::debug;

use crate::color::{is_close, Color};
use crate::{Region, VisionError};

/// Divider line drawn above each prayer of the altar list.
const PRAYER_DIVIDER: Color = [0.3529412, 0.27058825, 0.16078432];

/// Maps logical `(i, j)` indices to fixed-size parts of a capture.
pub trait Locator {
    /// Name used when saving extracted parts.
    fn name(&self) -> &str;

    /// `(width, height)` of every part.
    fn shape(&self) -> (u32, u32);

    /// Pixel position `(x, y)` of the top-left corner of part `(i, j)`.
    fn locate(&self, i: i32, j: i32) -> (i32, i32);

    /// Locate and copy part `(i, j)` of `capture`.
    fn get(&self, capture: &Capture, i: i32, j: i32) -> Result<Region, VisionError> {
        let (x, y) = self.locate(i, j);
        extract(capture, x, y, self.shape())
    }
}

/// Copy a part, failing when it does not fit entirely inside the capture.
pub(crate) fn extract(
    capture: &Capture,
    x: i32,
    y: i32,
    (width, height): (u32, u32),
) -> Result<Region, VisionError> {
    let fits = x >= 0
        && y >= 0
        && x as u64 + width as u64 <= capture.width() as u64
        && y as u64 + height as u64 <= capture.height() as u64;
    if !fits {
        return Err(VisionError::OutOfBounds {
            x,
            y,
            width,
            height,
        });
    }
    Ok(capture.crop(x as u32, y as u32, width, height))
}

/// Parts laid out on a regular grid, anchored at the top-left corner of part
/// `(0, 0)`. `i` is the row and `j` the column.
#[derive(Debug, Clone)]
pub struct GridLocator {
    name: String,
    spec: GridSpec,
}

impl GridLocator {
    pub fn new(name: impl Into<String>, spec: GridSpec) -> Self {
        Self {
            name: name.into(),
            spec,
        }
    }
}

impl Locator for GridLocator {
    fn name(&self) -> &str {
        &self.name
    }

    fn shape(&self) -> (u32, u32) {
        (self.spec.width, self.spec.height)
    }

    fn locate(&self, i: i32, j: i32) -> (i32, i32) {
        let s = &self.spec;
        (
            s.anchor_x + (s.width as i32 + s.hmargin) * j,
            s.anchor_y + (s.height as i32 + s.vmargin) * i,
        )
    }
}

/// Hexagonal terrain tiles. `i` is the axial row and `j` the column; the
/// anchor is the center of tile `(0, 0)` and rows grow upwards.
#[derive(Debug, Clone)]
pub struct HexLocator {
    name: String,
    spec: GridSpec,
}

impl HexLocator {
    pub fn new(name: impl Into<String>, spec: GridSpec) -> Self {
        Self {
            name: name.into(),
            spec,
        }
    }
}

impl Locator for HexLocator {
    fn name(&self) -> &str {
        &self.name
    }

    fn shape(&self) -> (u32, u32) {
        (self.spec.width, self.spec.height)
    }

    fn locate(&self, i: i32, j: i32) -> (i32, i32) {
        let s = &self.spec;
        let column = j as f64;
        let row = i as f64 + 0.5 * j as f64;
        (
            (s.anchor_x as f64 + s.hmargin as f64 * column - 0.5 * s.width as f64) as i32,
            (s.anchor_y as f64 - s.vmargin as f64 * row - 0.5 * s.height as f64) as i32,
        )
    }
}

/// Finds the prayers listed at an altar by scanning down one pixel column for
/// divider lines.
///
/// Each call to [`PrayerLocator::next`] resumes from the last divider found.
/// Once the scan reaches the end of the list it returns `None` and rewinds,
/// so a full list is read by calling `next` until it returns `None`. The
/// cursor is per instance; never share one locator between two scans.
#[derive(Debug, Clone)]
pub struct PrayerLocator {
    spec: PrayerScanSpec,
    last_row: u32,
    last_value: Option<Color>,
}

impl PrayerLocator {
    pub fn new(spec: PrayerScanSpec) -> Self {
        Self {
            spec,
            last_row: spec.start_row,
            last_value: None,
        }
    }

    /// Row of the last divider found, or the start row after a reset.
    pub fn last_row(&self) -> u32 {
        self.last_row
    }

    /// Rewind the cursor to the top of the list.
    pub fn reset(&mut self) {
        self.last_row = self.spec.start_row;
        self.last_value = None;
    }

    pub fn shape(&self) -> (u32, u32) {
        (self.spec.width, self.spec.height)
    }

    /// Part below the next divider line, or `None` when the list is exhausted.
    pub fn next(&mut self, capture: &Capture) -> Result<Option<Region>, VisionError> {
        let column = self.spec.column;
        if column >= capture.width() {
            return Err(VisionError::OutOfBounds {
                x: column as i32,
                y: self.last_row as i32,
                width: self.spec.width,
                height: self.spec.height,
            });
        }
        let end = self.spec.end_row.min(capture.height());

        for row in self.last_row..end {
            let value = capture.pixel(column, row);
            let previous = *self.last_value.get_or_insert(value);
            if previous == value {
                continue;
            }
            self.last_value = Some(value);

            if is_close(value, PRAYER_DIVIDER) {
                self.last_row = row;
                debug!("Prayer divider at row {}", row);
                return extract(capture, column as i32, row as i32, self.shape()).map(Some);
            }
        }

        self.reset();
        Ok(None)
    }
}
