use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use crate::{Position, StatList};

/// A live entity, classified once when the reader walks the unit tables.
///
/// `Unknown` stands in for an entry the reader wrote but this schema cannot
/// interpret; translators skip it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Unit {
    Corpse(CorpseUnit),
    Monster(MonsterUnit),
    Object(ObjectUnit),
    Item(ItemUnit),
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UnitEntry {
    Known(Unit),
    Malformed(IgnoredAny),
}

/// Deserialize a unit table entry by entry. An entry that fails to parse
/// becomes [`Unit::Unknown`] instead of failing the whole read.
pub(crate) fn deserialize_units<'de, D>(deserializer: D) -> Result<Vec<Unit>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<UnitEntry>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            UnitEntry::Known(unit) => unit,
            UnitEntry::Malformed(_) => Unit::Unknown,
        })
        .collect())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpseUnit {
    pub name: Option<String>,
    pub position: Option<Position>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
pub enum MonsterType {
    #[default]
    Regular,
    Other,
    SuperUnique,
    Champion,
    Unique,
    Minion,
    Possessed,
    Ghostly,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Resist {
    Physical,
    Magic,
    Fire,
    Lightning,
    Cold,
    Poison,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterUnit {
    pub unit_id: u32,
    /// Row in the monster stats table; keys the NPC display-name table.
    pub class_id: u32,
    pub monster_type: MonsterType,
    /// Internal monster-stats name, used to resolve super-unique display names.
    pub stats_name: Option<String>,
    pub position: Option<Position>,
    pub hovered: bool,
    pub immunities: Vec<Resist>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectUnit {
    pub name: Option<String>,
    pub position: Option<Position>,
    pub hovered: bool,
    pub interact_type: u8,
    pub chest: bool,
}

bitflags::bitflags! {
    /// Subset of the item flag word the service cares about.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ItemFlags: u32 {
        const EQUIPPED = 0x0000_0001;
        const IN_SOCKET = 0x0000_0008;
        const IDENTIFIED = 0x0000_0010;
        const SOCKETED = 0x0000_0800;
        const NEW = 0x0000_2000;
        const ETHEREAL = 0x0040_0000;
        const RUNEWORD = 0x0400_0000;
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
pub enum ItemPlace {
    Inventory,
    Stash,
    Cube,
    Belt,
    Equipped,
    Ground,
    Cursor,
    Vendor,
    Socketed,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
pub enum ItemQuality {
    Inferior,
    Normal,
    Superior,
    Magic,
    Set,
    Rare,
    Unique,
    Crafted,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemUnit {
    pub unit_id: u32,
    pub name: Option<String>,
    pub position: Option<Position>,
    pub hovered: bool,
    pub place: ItemPlace,
    pub quality: ItemQuality,
    /// Raw item flag word; see [`ItemUnit::flags`].
    #[serde(rename = "flags")]
    pub flag_bits: u32,
    /// Display name of the vendor holding this item, if any.
    pub vendor: Option<String>,
    /// `None` when the reader could not walk the item's stat list.
    pub stats: Option<StatList>,
}

impl ItemUnit {
    pub fn flags(&self) -> ItemFlags {
        ItemFlags::from_bits_retain(self.flag_bits)
    }

    pub fn is_ethereal(&self) -> bool {
        self.flags().contains(ItemFlags::ETHEREAL)
    }

    pub fn is_identified(&self) -> bool {
        self.flags().contains(ItemFlags::IDENTIFIED)
    }
}
