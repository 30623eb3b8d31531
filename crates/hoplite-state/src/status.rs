use serde::{Deserialize, Serialize};

/// Player status read from the bottom HUD.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub energy: u32,
    pub cooldown: u32,
    pub health: u32,
    /// Whether the spear is in the inventory (not thrown).
    pub spear: bool,
    /// Lit killing spree skulls, at most 3.
    pub spree: u32,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub maximum_health: u32,
}

/// Blessings offered at an altar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prayer {
    DivineRestoration,
    Fortitude,
    Bloodlust,
    WingedSandals,
    StaggeringLeap,
    GreaterEnergy,
    #[serde(rename = "greater_energy_2")]
    GreaterEnergyII,
    GreaterThrow,
    #[serde(rename = "greater_throw_2")]
    GreaterThrowII,
    DeepLunge,
    QuickBash,
    SweepingBash,
    SpinningBash,
    MightyBash,
    Regeneration,
    Surge,
    Patience,
}

impl Prayer {
    pub const ALL: [Prayer; 17] = [
        Prayer::DivineRestoration,
        Prayer::Fortitude,
        Prayer::Bloodlust,
        Prayer::WingedSandals,
        Prayer::StaggeringLeap,
        Prayer::GreaterEnergy,
        Prayer::GreaterEnergyII,
        Prayer::GreaterThrow,
        Prayer::GreaterThrowII,
        Prayer::DeepLunge,
        Prayer::QuickBash,
        Prayer::SweepingBash,
        Prayer::SpinningBash,
        Prayer::MightyBash,
        Prayer::Regeneration,
        Prayer::Surge,
        Prayer::Patience,
    ];
}
