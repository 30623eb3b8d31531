use serde::{Deserialize, Serialize};

mod status;
mod terrain;

pub use status::{Attributes, Prayer, Status};
pub use terrain::{surface_coordinates, HexCoordinates, SurfaceElement, Terrain};

/// Represents the full game state extracted from a screen capture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub depth: u32,
    pub terrain: Terrain,
    pub status: Status,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Top-level screen currently displayed by the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interface {
    Altar,
    Death,
    Embark,
    Fleece,
    Victory,
    Stairs,
    Black,
    /// Main gameplay screen, assumed whenever no other screen is recognized.
    #[default]
    Playing,
}

/// A prayer offered by an altar, with the screen row it was found at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerSlot {
    pub prayer: Prayer,
    pub row: u32,
}

/// Prayers available at an altar, in the order they were found on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AltarState {
    pub prayers: Vec<PrayerSlot>,
}

impl AltarState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a prayer at `row`. A prayer seen twice keeps its first position
    /// in the list and takes the latest row.
    pub fn insert(&mut self, prayer: Prayer, row: u32) {
        match self.prayers.iter_mut().find(|slot| slot.prayer == prayer) {
            Some(slot) => slot.row = row,
            None => self.prayers.push(PrayerSlot { prayer, row }),
        }
    }

    /// Screen row of a prayer, if the altar offers it
    pub fn row(&self, prayer: Prayer) -> Option<u32> {
        self.prayers
            .iter()
            .find(|slot| slot.prayer == prayer)
            .map(|slot| slot.row)
    }

    pub fn contains(&self, prayer: Prayer) -> bool {
        self.row(prayer).is_some()
    }

    pub fn len(&self) -> usize {
        self.prayers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prayers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_altar_insert_keeps_discovery_order() {
        let mut altar = AltarState::new();
        altar.insert(Prayer::Surge, 520);
        altar.insert(Prayer::Fortitude, 700);
        altar.insert(Prayer::Surge, 610);

        assert_eq!(altar.len(), 2);
        assert_eq!(altar.prayers[0].prayer, Prayer::Surge);
        assert_eq!(altar.prayers[1].prayer, Prayer::Fortitude);
        assert_eq!(altar.row(Prayer::Surge), Some(610));
        assert!(!altar.contains(Prayer::Patience));
    }

    #[test]
    fn test_interface_defaults_to_playing() {
        assert_eq!(Interface::default(), Interface::Playing);
        let json = serde_json::to_string(&Interface::Fleece).unwrap();
        assert_eq!(json, "\"fleece\"");
    }

    #[test]
    fn test_new_game_state_is_empty() {
        let state = GameState::new();
        assert_eq!(state.depth, 0);
        assert!(state.terrain.is_empty());
        assert!(!state.status.spear);
    }
}
