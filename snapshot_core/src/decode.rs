//! Fixed-point stat decoding.

/// Life, mana and stamina stats carry this many fractional bits.
pub const FIXED_POINT_SHIFT: u32 = 8;

/// Mercenary life readings at or below this raw value are treated as glitched.
pub const MERC_LIFE_GLITCH_THRESHOLD: i32 = 32_768;

/// Drop the fractional bits of a raw stat. Negative readings decode to zero.
pub fn decode_fixed_point(raw: i32) -> u32 {
    u32::try_from(raw >> FIXED_POINT_SHIFT).unwrap_or(0)
}

/// Decode the mercenary's current life.
///
/// The process sometimes reports a small, corrupted life value for the
/// mercenary. Readings at or below [`MERC_LIFE_GLITCH_THRESHOLD`] are rebuilt
/// as a ratio of the threshold applied to the decoded max life, which is
/// reliable. Returns `None` when that path is needed and max life is unknown.
pub fn decode_merc_life(raw_life: i32, raw_max_life: Option<i32>) -> Option<u32> {
    if raw_life > MERC_LIFE_GLITCH_THRESHOLD {
        return Some(decode_fixed_point(raw_life));
    }
    let max_life = f64::from(decode_fixed_point(raw_max_life?));
    let ratio = f64::from(raw_life) / f64::from(MERC_LIFE_GLITCH_THRESHOLD);
    Some((ratio * max_life).round().max(0.0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_point_drops_fraction() {
        assert_eq!(decode_fixed_point(0), 0);
        assert_eq!(decode_fixed_point(255), 0);
        assert_eq!(decode_fixed_point(256), 1);
        assert_eq!(decode_fixed_point((420 << 8) | 0x7f), 420);
        assert_eq!(decode_fixed_point(-512), 0);
    }

    #[test]
    fn healthy_merc_life_is_shifted() {
        assert_eq!(decode_merc_life(32_769, Some(0)), Some(128));
        assert_eq!(decode_merc_life(1_000 << 8, None), Some(1_000));
    }

    #[test]
    fn glitched_merc_life_uses_max_life_ratio() {
        assert_eq!(decode_merc_life(16_384, Some(65_536)), Some(128));
        assert_eq!(decode_merc_life(32_768, Some(800 << 8)), Some(800));
        assert_eq!(decode_merc_life(3_277, Some(300 << 8)), Some(30));
        assert_eq!(decode_merc_life(0, Some(500 << 8)), Some(0));
    }

    #[test]
    fn glitched_merc_life_without_max_is_unknown() {
        assert_eq!(decode_merc_life(10, None), None);
    }
}
