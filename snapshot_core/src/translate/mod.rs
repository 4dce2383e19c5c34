//! Per-family translation from source entities to wire messages.
//!
//! Every translator preserves source order. An entity missing a required
//! attribute is dropped on its own; the rest of the call carries on.

mod area;
mod player;
mod units;

pub(crate) use area::{adjacent_levels, collision_grid, npcs, points_of_interest};
pub(crate) use player::{menu_state, player_unit, status};
pub(crate) use units::{corpses, items, monsters, objects, LiveUnits};

fn note_skipped(family: &'static str, reason: &'static str) {
    tracing::debug!(
        target: "snapshot_service::translate",
        family,
        reason,
        "entity.skipped"
    );
}
