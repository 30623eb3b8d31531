use hoplite_data::{FleeceHeuristic, ScreenLayout};
use hoplite_state::{surface_coordinates, AltarState, GameState, Interface, Terrain};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::classifiers::{self, Glyph, Heart, Skull};
use crate::locator::{GridLocator, HexLocator, Locator, PrayerLocator};
use crate::parts::PartsRecorder;
use crate::threshold::Thresholder;
use crate::{Capture, Region, VisionError};

/// Most lit skulls the killing spree bar can show.
const MAX_SPREE: i32 = 3;

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Reads game and altar states out of captures.
///
/// Owns the locators of every screen part, including the stateful prayer
/// scanner; only [`ScreenParser::observe_altar`] needs `&mut self`.
#[derive(Debug, Clone)]
pub struct ScreenParser {
    terrain: HexLocator,
    depth: GridLocator,
    cooldown: GridLocator,
    energy: GridLocator,
    /// Counter positions for 1, 2 and 3 digit energy values.
    energy_counters: [GridLocator; 3],
    spear: GridLocator,
    hearts: GridLocator,
    spree: GridLocator,
    prayer: PrayerLocator,
    thresholder: Thresholder,
    fleece: FleeceHeuristic,
    recorder: Option<Arc<PartsRecorder>>,
}

impl Default for ScreenParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenParser {
    pub fn new() -> Self {
        Self::with_layout(&ScreenLayout::default())
    }

    pub fn with_layout(layout: &ScreenLayout) -> Self {
        Self {
            terrain: HexLocator::new("terrain", layout.terrain),
            depth: GridLocator::new("depth", layout.depth),
            cooldown: GridLocator::new("cooldown", layout.cooldown),
            energy: GridLocator::new("energy", layout.energy),
            energy_counters: [
                GridLocator::new("energy_one", layout.energy_one),
                GridLocator::new("energy_two", layout.energy_two),
                GridLocator::new("energy_three", layout.energy_three),
            ],
            spear: GridLocator::new("spear", layout.spear),
            hearts: GridLocator::new("hearts", layout.hearts),
            spree: GridLocator::new("spree", layout.spree),
            prayer: PrayerLocator::new(layout.prayer),
            thresholder: Thresholder::default(),
            fleece: layout.fleece,
            recorder: None,
        }
    }

    /// Save every extracted part through `recorder`.
    pub fn record_parts(mut self, recorder: PartsRecorder) -> Self {
        self.recorder = Some(Arc::new(recorder));
        self
    }

    fn get(
        &self,
        locator: &dyn Locator,
        capture: &Capture,
        i: i32,
        j: i32,
    ) -> Result<Region, VisionError> {
        let part = locator.get(capture, i, j)?;
        if let Some(recorder) = &self.recorder {
            recorder.record(locator.name(), &part);
        }
        Ok(part)
    }

    /// Screen currently displayed.
    pub fn interface(&self, capture: &Capture) -> Interface {
        classifiers::interface::classify_with(capture, &self.fleece)
    }

    /// Read a left-aligned number, one character per grid column, until the
    /// first character that is not a digit. Returns 0 when there is no digit
    /// and fails when the digits do not fit in a `u32`.
    pub fn observe_integer(
        &self,
        capture: &Capture,
        locator: &GridLocator,
    ) -> Result<u32, VisionError> {
        let mut value = 0u32;
        let mut column = 0;
        loop {
            let part = self.thresholder.apply(&self.get(locator, capture, 0, column)?);
            match classifiers::font::classify(&part)? {
                Glyph::Digit(d) => {
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(d as u32))
                        .ok_or_else(|| VisionError::NumberOverflow {
                            locator: locator.name().to_string(),
                        })?;
                }
                _ => return Ok(value),
            }
            column += 1;
        }
    }

    pub fn observe_depth(&self, capture: &Capture) -> Result<u32, VisionError> {
        let start = Instant::now();
        let depth = self.observe_integer(capture, &self.depth)?;
        debug!("Observed depth in {:.1} ms", elapsed_ms(start));
        Ok(depth)
    }

    pub fn observe_cooldown(&self, capture: &Capture) -> Result<u32, VisionError> {
        let start = Instant::now();
        let cooldown = self.observe_integer(capture, &self.cooldown)?;
        debug!("Observed cooldown in {:.1} ms", elapsed_ms(start));
        Ok(cooldown)
    }

    /// Probe the number of digits first, then read the counter at the
    /// position matching that width.
    pub fn observe_energy(&self, capture: &Capture) -> Result<u32, VisionError> {
        let start = Instant::now();
        let digits = classifiers::status::energy_digits(&self.get(&self.energy, capture, 0, 0)?)?;
        let energy = self.observe_integer(capture, &self.energy_counters[digits - 1])?;
        debug!("Observed energy in {:.1} ms", elapsed_ms(start));
        Ok(energy)
    }

    /// `(healthy, total)` hearts of the life bar.
    pub fn observe_hearts(&self, capture: &Capture) -> Result<(u32, u32), VisionError> {
        let start = Instant::now();
        let (mut healthy, mut total) = (0, 0);
        let mut column = 0;
        loop {
            match classifiers::status::heart(&self.get(&self.hearts, capture, 0, column)?)? {
                Heart::Empty => break,
                Heart::Healthy => healthy += 1,
                Heart::Hurt => {}
            }
            total += 1;
            column += 1;
        }
        debug!("Observed hearts in {:.1} ms", elapsed_ms(start));
        Ok((healthy, total))
    }

    pub fn observe_spear(&self, capture: &Capture) -> Result<bool, VisionError> {
        let start = Instant::now();
        let spear = classifiers::status::spear(&self.get(&self.spear, capture, 0, 0)?)?;
        debug!("Observed spear in {:.1} ms", elapsed_ms(start));
        Ok(spear)
    }

    pub fn observe_spree(&self, capture: &Capture) -> Result<u32, VisionError> {
        let start = Instant::now();
        let mut spree = 0;
        for column in 0..MAX_SPREE {
            match classifiers::status::spree(&self.get(&self.spree, capture, 0, column)?)? {
                Skull::Empty => break,
                Skull::On => spree += 1,
                Skull::Off => {}
            }
        }
        debug!("Observed spree in {:.1} ms", elapsed_ms(start));
        Ok(spree)
    }

    pub fn observe_terrain(&self, capture: &Capture) -> Result<Terrain, VisionError> {
        let start = Instant::now();
        let surface = surface_coordinates()
            .iter()
            .map(|c| {
                let part = self.get(&self.terrain, capture, c.y, c.x)?;
                classifiers::terrain::classify(&part)
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!("Observed terrain in {:.1} ms", elapsed_ms(start));
        Terrain::from_list(surface).map_err(|e| VisionError::Terrain(format!("{:#}", e)))
    }

    /// Parse a capture of the gameplay screen.
    pub fn observe_game(&self, capture: &Capture) -> Result<GameState, VisionError> {
        let start = Instant::now();
        let mut state = GameState::new();
        state.depth = self.observe_depth(capture)?;
        state.terrain = self.observe_terrain(capture)?;
        state.status.energy = self.observe_energy(capture)?;
        state.status.cooldown = self.observe_cooldown(capture)?;
        let (health, maximum_health) = self.observe_hearts(capture)?;
        state.status.health = health;
        state.status.attributes.maximum_health = maximum_health;
        state.status.spear = self.observe_spear(capture)?;
        state.status.spree = self.observe_spree(capture)?;
        info!("Observed game screen in {:.3} s", start.elapsed().as_secs_f64());
        Ok(state)
    }

    /// Parse a capture of the altar screen, listing every recognized prayer
    /// with the row it was found at. Entries that match no prayer are skipped.
    pub fn observe_altar(&mut self, capture: &Capture) -> Result<AltarState, VisionError> {
        let start = Instant::now();
        let mut altar = AltarState::new();
        self.prayer.reset();
        while let Some(part) = self.prayer.next(capture)? {
            if let Some(recorder) = &self.recorder {
                recorder.record("prayer", &part);
            }
            let row = self.prayer.last_row();
            match classifiers::prayer::classify(&part)? {
                Some(prayer) => altar.insert(prayer, row),
                None => debug!("Unrecognized prayer at row {}", row),
            }
        }
        debug!(
            "Observed {} prayers in {:.1} ms",
            altar.len(),
            elapsed_ms(start)
        );
        Ok(altar)
    }
}
