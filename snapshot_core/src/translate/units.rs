use ahash::AHashSet;
use snapshot_proto::api;
use snapshot_schema::{
    CatalogObject, CorpseUnit, ItemUnit, MonsterType, MonsterUnit, ObjectUnit, Resist, Unit,
};

use super::{note_skipped, player::stat_list};
use crate::reference::ReferenceData;

/// Live units split by family, each list in source order.
#[derive(Debug, Default)]
pub(crate) struct LiveUnits<'a> {
    pub corpses: Vec<&'a CorpseUnit>,
    pub monsters: Vec<&'a MonsterUnit>,
    pub objects: Vec<&'a ObjectUnit>,
    pub items: Vec<&'a ItemUnit>,
}

impl<'a> LiveUnits<'a> {
    pub fn partition(units: &'a [Unit]) -> Self {
        let mut split = Self::default();
        for unit in units {
            match unit {
                Unit::Corpse(corpse) => split.corpses.push(corpse),
                Unit::Monster(monster) => split.monsters.push(monster),
                Unit::Object(object) => split.objects.push(object),
                Unit::Item(item) => split.items.push(item),
                Unit::Unknown => note_skipped("unit", "unrecognised_entry"),
            }
        }
        split
    }
}

pub(crate) fn corpses(corpses: &[&CorpseUnit]) -> Vec<api::Corpse> {
    corpses
        .iter()
        .filter_map(|corpse| {
            let (Some(name), Some(position)) = (corpse.name.as_ref(), corpse.position) else {
                note_skipped("corpse", "missing_name_or_position");
                return None;
            };
            Some(api::Corpse {
                name: name.clone(),
                position: Some(position.into()),
            })
        })
        .collect()
}

pub(crate) fn monsters(monsters: &[&MonsterUnit], reference: &ReferenceData) -> Vec<api::Monster> {
    monsters
        .iter()
        .filter_map(|monster| {
            let Some(position) = monster.position else {
                note_skipped("monster", "missing_position");
                return None;
            };
            Some(api::Monster {
                id: monster.unit_id,
                name: monster_name(monster, reference),
                r#type: monster.monster_type.to_string(),
                position: Some(position.into()),
                hovered: monster.hovered,
                immunities: monster
                    .immunities
                    .iter()
                    .filter(|&&resist| resist != Resist::Unknown)
                    .map(|resist| resist.to_string())
                    .collect(),
            })
        })
        .collect()
}

/// Super-uniques are named after their stats entry; everything else after
/// its class. Unknown classes fall back to the numeric id.
fn monster_name(monster: &MonsterUnit, reference: &ReferenceData) -> String {
    let super_unique = (monster.monster_type == MonsterType::SuperUnique)
        .then(|| monster.stats_name.as_deref())
        .flatten()
        .and_then(|stats_name| reference.super_unique_name(stats_name));

    super_unique
        .or_else(|| reference.npc_name(monster.class_id))
        .map(str::to_string)
        .unwrap_or_else(|| monster.class_id.to_string())
}

/// Live objects first, then catalog objects whose name is not already listed.
pub(crate) fn objects(live: &[&ObjectUnit], catalog: &[CatalogObject]) -> Vec<api::GameObject> {
    let mut objects: Vec<api::GameObject> = live
        .iter()
        .filter_map(|object| {
            let (Some(name), Some(position)) = (object.name.as_ref(), object.position) else {
                note_skipped("object", "missing_name_or_position");
                return None;
            };
            Some(api::GameObject {
                name: name.clone(),
                position: Some(position.into()),
                hovered: object.hovered,
                selectable: object.interact_type != 0,
                chest: object.chest,
            })
        })
        .collect();

    let mut listed: AHashSet<String> = objects.iter().map(|object| object.name.clone()).collect();
    for entry in catalog {
        let Some(first) = entry.positions.first() else {
            note_skipped("catalog_object", "no_positions");
            continue;
        };
        if !listed.insert(entry.name.clone()) {
            continue;
        }
        objects.push(api::GameObject {
            name: entry.name.clone(),
            position: Some((*first).into()),
            ..Default::default()
        });
    }

    objects
}

pub(crate) fn items(items: &[&ItemUnit]) -> Vec<api::Item> {
    items
        .iter()
        .filter_map(|item| {
            let (Some(name), Some(position)) = (item.name.as_ref(), item.position) else {
                note_skipped("item", "missing_name_or_position");
                return None;
            };
            Some(api::Item {
                id: item.unit_id,
                position: Some(position.into()),
                name: name.clone(),
                hovered: item.hovered,
                place: item.place.to_string(),
                quality: item.quality.to_string(),
                ethereal: item.is_ethereal(),
                identified: item.is_identified(),
                vendor: item.vendor.clone().unwrap_or_default(),
                stats: item.stats.as_ref().map(stat_list).unwrap_or_default(),
            })
        })
        .collect()
}
