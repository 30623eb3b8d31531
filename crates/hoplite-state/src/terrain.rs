use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Axial coordinates on the hexagonal board.
///
/// `x` is the column, `y` the row along the column. Moving one column to the
/// right shifts the tile half a row up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoordinates {
    pub x: i32,
    pub y: i32,
}

impl HexCoordinates {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Hex distance between two tiles
    pub fn distance(&self, other: &HexCoordinates) -> u32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        // Axial to cube: the third coordinate is -(dx + dy)
        ((dx.abs() + dy.abs() + (dx + dy).abs()) / 2) as u32
    }

    /// The six adjacent tiles, whether or not they are on the board
    pub fn neighbours(&self) -> [HexCoordinates; 6] {
        const OFFSETS: [(i32, i32); 6] = [(0, 1), (1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1)];
        OFFSETS.map(|(dx, dy)| HexCoordinates::new(self.x + dx, self.y + dy))
    }
}

/// Number of columns on each side of the middle column.
const HALF_WIDTH: i32 = 4;

/// Number of half-tile rows above and below the board center.
const HALF_HEIGHT: i32 = 5;

static SURFACE_COORDINATES: LazyLock<Vec<HexCoordinates>> = LazyLock::new(|| {
    let mut coords = Vec::new();
    for x in -HALF_WIDTH..=HALF_WIDTH {
        // Screen row of tile (x, y) is y + x/2; keep it within the board
        for y in -HALF_HEIGHT - HALF_WIDTH..=HALF_HEIGHT + HALF_WIDTH {
            let doubled_row = 2 * y + x;
            if (-2 * HALF_HEIGHT..=2 * HALF_HEIGHT).contains(&doubled_row) {
                coords.push(HexCoordinates::new(x, y));
            }
        }
    }
    coords
});

/// Every tile of the board, in the canonical order used by [`Terrain`].
pub fn surface_coordinates() -> &'static [HexCoordinates] {
    &SURFACE_COORDINATES
}

/// Content of a single terrain tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceElement {
    AltarOn,
    AltarOff,
    Archer,
    Bomb,
    DemolitionistWithoutBomb,
    DemolitionistHoldingBomb,
    Fleece,
    Footman,
    Ground,
    Magma,
    Player,
    Portal,
    Spear,
    Stairs,
    WizardCharged,
    WizardDischarged,
}

impl SurfaceElement {
    pub fn is_enemy(&self) -> bool {
        matches!(
            self,
            SurfaceElement::Archer
                | SurfaceElement::DemolitionistWithoutBomb
                | SurfaceElement::DemolitionistHoldingBomb
                | SurfaceElement::Footman
                | SurfaceElement::WizardCharged
                | SurfaceElement::WizardDischarged
        )
    }

    /// Whether the player may step on this tile
    pub fn is_walkable(&self) -> bool {
        matches!(
            self,
            SurfaceElement::AltarOn
                | SurfaceElement::AltarOff
                | SurfaceElement::Fleece
                | SurfaceElement::Ground
                | SurfaceElement::Portal
                | SurfaceElement::Spear
                | SurfaceElement::Stairs
        )
    }
}

/// Observed board. `surface[k]` is the tile at `surface_coordinates()[k]`,
/// `None` when the tile could not be recognized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terrain {
    pub surface: Vec<Option<SurfaceElement>>,
}

impl Terrain {
    /// Build a terrain from labels listed in canonical coordinate order.
    pub fn from_list(surface: Vec<Option<SurfaceElement>>) -> Result<Self> {
        let expected = surface_coordinates().len();
        ensure!(
            surface.len() == expected,
            "terrain surface has {} tiles, expected {}",
            surface.len(),
            expected
        );
        Ok(Self { surface })
    }

    pub fn is_empty(&self) -> bool {
        self.surface.is_empty()
    }

    pub fn get(&self, coords: HexCoordinates) -> Option<SurfaceElement> {
        let index = surface_coordinates().iter().position(|c| *c == coords)?;
        self.surface.get(index).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HexCoordinates, Option<SurfaceElement>)> + '_ {
        surface_coordinates()
            .iter()
            .copied()
            .zip(self.surface.iter().copied())
    }

    /// Coordinates of every tile holding `element`
    pub fn find(&self, element: SurfaceElement) -> Vec<HexCoordinates> {
        self.iter()
            .filter(|(_, e)| *e == Some(element))
            .map(|(c, _)| c)
            .collect()
    }

    pub fn player(&self) -> Option<HexCoordinates> {
        self.find(SurfaceElement::Player).into_iter().next()
    }
}
