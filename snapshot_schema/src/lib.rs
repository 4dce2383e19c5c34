//! Source-side data contracts for the snapshot service.
//!
//! These types describe what the process-memory reader hands over on every
//! read. They are deliberately loose where the reader can fail to resolve an
//! attribute (names, positions): such fields are `Option` and the translators
//! in `snapshot_core` skip the entity instead of guessing.

use serde::{Deserialize, Serialize};

mod area;
mod stats;
mod units;

pub use area::{AdjacentLevel, AreaState, CatalogObject, NpcSpawn};
pub use stats::{SkillPoints, Stat, StatList};
pub use units::{
    CorpseUnit, ItemFlags, ItemPlace, ItemQuality, ItemUnit, MonsterType, MonsterUnit, ObjectUnit,
    Resist, Unit,
};

/// World-space coordinate pair as read from the process.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One complete read of the game process.
///
/// `live` and `area` are both `None` when no game is running.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub live: Option<LiveState>,
    pub area: Option<AreaState>,
    pub points_of_interest: Vec<PointOfInterest>,
}

impl GameState {
    pub fn is_active(&self) -> bool {
        self.live.is_some() && self.area.is_some()
    }
}

/// Entities detected in the running process during this read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveState {
    pub player: Option<PlayerUnit>,
    pub mercenaries: Vec<MercenaryUnit>,
    #[serde(deserialize_with = "units::deserialize_units")]
    pub units: Vec<Unit>,
    pub menu: MenuState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuState {
    pub inventory: bool,
    pub npc_interact: bool,
    pub npc_shop: bool,
    pub stash: bool,
    pub waypoint: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum PlayerClass {
    Amazon,
    Sorceress,
    Necromancer,
    Paladin,
    Barbarian,
    Druid,
    Assassin,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerUnit {
    pub name: Option<String>,
    pub class: Option<PlayerClass>,
    pub position: Option<Position>,
    pub stats: StatList,
    pub skills: Vec<SkillPoints>,
}

/// Hired companion. Only the first entry of [`LiveState::mercenaries`] is reported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MercenaryUnit {
    pub health_percentage: u32,
    pub stats: StatList,
}

/// Labelled location produced by the map-analysis helper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub label: String,
    pub position: Position,
}
