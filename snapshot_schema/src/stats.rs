use serde::{Deserialize, Serialize};

/// Stat identifiers the reader knows how to name.
///
/// Values are raw: life, mana and stamina carry 8 fractional bits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Stat {
    Strength,
    Energy,
    Dexterity,
    Vitality,
    StatPoints,
    SkillPoints,
    Life,
    MaxLife,
    Mana,
    MaxMana,
    Stamina,
    MaxStamina,
    Level,
    Experience,
    Gold,
    StashGold,
    EnhancedDefense,
    EnhancedDamage,
    EnhancedDamageMax,
    AttackRating,
    ChanceToBlock,
    MinDamage,
    MaxDamage,
    SecondaryMinDamage,
    SecondaryMaxDamage,
    ManaRecovery,
    ManaRecoveryBonus,
    StaminaRecoveryBonus,
    LastExp,
    NextExp,
    Defense,
    DefenseVsMissiles,
    DefenseVsHth,
    NormalDamageReduction,
    MagicDamageReduction,
    DamageReduced,
    MagicDamageReduced,
    MagicResist,
    MaxMagicResist,
    FireResist,
    MaxFireResist,
    LightningResist,
    MaxLightningResist,
    ColdResist,
    MaxColdResist,
    PoisonResist,
    MaxPoisonResist,
    FasterRunWalk,
    IncreasedAttackSpeed,
    FasterHitRecovery,
    FasterBlockRate,
    FasterCastRate,
    MagicFind,
    GoldFind,
    LifeSteal,
    ManaSteal,
    Durability,
    MaxDurability,
    Quantity,
    NumSockets,
    AllSkills,
    /// Any stat id the reader could not map to a name.
    #[serde(other)]
    Unknown,
}

/// Ordered `(stat, raw value)` pairs, in the order the reader produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatList(Vec<(Stat, i32)>);

impl StatList {
    /// First recorded value for `stat`.
    pub fn get(&self, stat: Stat) -> Option<i32> {
        self.0
            .iter()
            .find_map(|(key, value)| (*key == stat).then_some(*value))
    }

    pub fn push(&mut self, stat: Stat, value: i32) {
        self.0.push((stat, value));
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, i32)> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Stat, i32)> for StatList {
    fn from_iter<I: IntoIterator<Item = (Stat, i32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Hard (allocated) points in a single skill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillPoints {
    pub skill: Option<String>,
    pub hard_points: u32,
}
