use ahash::AHashSet;
use snapshot_proto::api;
use snapshot_schema::{AdjacentLevel, NpcSpawn, PointOfInterest};

use super::note_skipped;
use crate::reference::ReferenceData;

pub(crate) fn points_of_interest(points: &[PointOfInterest]) -> Vec<api::PointOfInterest> {
    points
        .iter()
        .map(|point| api::PointOfInterest {
            name: point.label.clone(),
            position: Some(point.position.into()),
        })
        .collect()
}

/// One entry per connected area; a repeated area keeps its first entry.
pub(crate) fn adjacent_levels(levels: &[AdjacentLevel]) -> Vec<api::AdjacentLevel> {
    let mut seen = AHashSet::with_capacity(levels.len());
    levels
        .iter()
        .filter_map(|level| {
            if level.area.is_empty() {
                note_skipped("adjacent_level", "missing_area");
                return None;
            }
            seen.insert(level.area.as_str())
                .then(|| api::AdjacentLevel {
                    area: level.area.clone(),
                    positions: level.exits.iter().map(|&exit| exit.into()).collect(),
                })
        })
        .collect()
}

pub(crate) fn npcs(spawns: &[NpcSpawn], reference: &ReferenceData) -> Vec<api::Npc> {
    spawns
        .iter()
        .map(|spawn| api::Npc {
            name: reference
                .npc_name(spawn.class_id)
                .map(str::to_string)
                .unwrap_or_else(|| spawn.class_id.to_string()),
            positions: spawn.positions.iter().map(|&p| p.into()).collect(),
        })
        .collect()
}

pub(crate) fn collision_grid(grid: &[Vec<i32>]) -> Vec<api::CollisionGridRow> {
    grid.iter()
        .map(|row| api::CollisionGridRow {
            walkable: row.iter().map(|&cell| cell == 0).collect(),
        })
        .collect()
}
