use ahash::AHashSet;
use snapshot_proto::api;
use snapshot_schema::{LiveState, MenuState, PlayerClass, PlayerUnit, Stat, StatList};

use super::note_skipped;
use crate::decode::{decode_fixed_point, decode_merc_life};

pub(crate) fn status(live: &LiveState) -> api::Status {
    let player_stat = |stat: Stat| {
        live.player
            .as_ref()
            .and_then(|player| player.stats.get(stat))
            .map(decode_fixed_point)
    };

    let mut status = api::Status {
        life: player_stat(Stat::Life),
        max_life: player_stat(Stat::MaxLife),
        mana: player_stat(Stat::Mana),
        max_mana: player_stat(Stat::MaxMana),
        ..Default::default()
    };

    if let Some(merc) = live
        .mercenaries
        .first()
        .filter(|merc| merc.health_percentage != 0)
    {
        let raw_max_life = merc.stats.get(Stat::MaxLife);
        status.merc_alive = true;
        status.merc_life = merc
            .stats
            .get(Stat::Life)
            .and_then(|raw_life| decode_merc_life(raw_life, raw_max_life));
        status.merc_max_life = raw_max_life.map(decode_fixed_point);
    }

    status
}

pub(crate) fn player_unit(player: &PlayerUnit) -> Option<api::PlayerUnit> {
    let (Some(name), Some(position)) = (player.name.as_ref(), player.position) else {
        note_skipped("player", "missing_name_or_position");
        return None;
    };

    Some(api::PlayerUnit {
        name: name.clone(),
        class: player
            .class
            .filter(|&class| class != PlayerClass::Unknown)
            .map(|class| class.to_string())
            .unwrap_or_default(),
        position: Some(position.into()),
        stats: stat_list(&player.stats),
        skills: skill_list(player),
    })
}

/// Known stats only, first occurrence of each key, raw values.
pub(super) fn stat_list(stats: &StatList) -> Vec<api::Stat> {
    let mut seen = AHashSet::with_capacity(stats.len());
    stats
        .iter()
        .filter(|(stat, _)| *stat != Stat::Unknown && seen.insert(*stat))
        .map(|(stat, value)| api::Stat {
            name: stat.to_string(),
            value,
        })
        .collect()
}

fn skill_list(player: &PlayerUnit) -> Vec<api::Skill> {
    let mut seen = AHashSet::with_capacity(player.skills.len());
    player
        .skills
        .iter()
        .filter_map(|entry| {
            let Some(skill) = entry.skill.as_deref() else {
                note_skipped("skill", "missing_name");
                return None;
            };
            seen.insert(skill).then(|| api::Skill {
                name: skill.to_string(),
                points: entry.hard_points,
            })
        })
        .collect()
}

pub(crate) fn menu_state(menu: &MenuState) -> api::MenuState {
    api::MenuState {
        inventory: menu.inventory,
        npc_interact: menu.npc_interact,
        npc_shop: menu.npc_shop,
        stash: menu.stash,
        waypoint: menu.waypoint,
    }
}
