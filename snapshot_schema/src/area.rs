use serde::{Deserialize, Serialize};

use crate::Position;

/// Precomputed data for the area the player is standing in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaState {
    pub area: String,
    pub origin: Position,
    pub objects: Vec<CatalogObject>,
    pub npcs: Vec<NpcSpawn>,
    pub adjacent_levels: Vec<AdjacentLevel>,
    /// Row-major, aligned to `origin`. Zero marks a walkable cell.
    pub collision_grid: Vec<Vec<i32>>,
}

/// Static object placement from the map catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogObject {
    pub name: String,
    pub positions: Vec<Position>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcSpawn {
    pub class_id: u32,
    pub positions: Vec<Position>,
}

/// Connection from the current area to a neighbouring one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjacentLevel {
    pub area: String,
    pub exits: Vec<Position>,
}
