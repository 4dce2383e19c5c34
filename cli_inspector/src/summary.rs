use std::fmt::Write;

use snapshot_proto::api::{GameSnapshot, Position};

pub fn render(snapshot: &GameSnapshot) -> String {
    if snapshot.is_empty() {
        return "no active game".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "area {} origin {}",
        snapshot.area_name,
        fmt_position(snapshot.area_origin.as_ref())
    );

    if let Some(player) = &snapshot.player_unit {
        let _ = writeln!(
            out,
            "player {} ({}) at {}",
            player.name,
            player.class,
            fmt_position(player.position.as_ref())
        );
    }

    if let Some(status) = &snapshot.status {
        let _ = write!(
            out,
            "life {}/{} mana {}/{}",
            fmt_stat(status.life),
            fmt_stat(status.max_life),
            fmt_stat(status.mana),
            fmt_stat(status.max_mana)
        );
        if status.merc_alive {
            let _ = write!(
                out,
                " merc {}/{}",
                fmt_stat(status.merc_life),
                fmt_stat(status.merc_max_life)
            );
        }
        out.push('\n');
    }

    let width = snapshot
        .collision_grid
        .first()
        .map_or(0, |row| row.walkable.len());
    let _ = write!(
        out,
        "monsters {} items {} objects {} corpses {} npcs {} poi {} exits {} grid {}x{}",
        snapshot.monsters.len(),
        snapshot.items.len(),
        snapshot.objects.len(),
        snapshot.corpses.len(),
        snapshot.npcs.len(),
        snapshot.points_of_interest.len(),
        snapshot.adjacent_levels.len(),
        width,
        snapshot.collision_grid.len()
    );
    out
}

fn fmt_position(position: Option<&Position>) -> String {
    position.map_or_else(
        || "-".to_string(),
        |p| format!("({:.1}, {:.1})", p.x, p.y),
    )
}

fn fmt_stat(value: Option<u32>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}
