mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::time::Duration;

use snapshot_core::{GameStateReader, ReadError};
use snapshot_proto::api;
use snapshot_proto::SnapshotClient;
use snapshot_schema::{AreaState, GameState, LiveState, PlayerUnit, Position, Stat, StatList};

/// Hands out a distinct state per call and holds both reads open until the
/// other one has started, so the two builds overlap.
struct LabelledReader {
    calls: AtomicUsize,
    barrier: Barrier,
}

impl LabelledReader {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            barrier: Barrier::new(2),
        }
    }
}

fn labelled_state(label: &str, life: i32) -> GameState {
    let mut stats = StatList::default();
    stats.push(Stat::Life, life << 8);
    GameState {
        live: Some(LiveState {
            player: Some(PlayerUnit {
                name: Some(label.to_string()),
                position: Some(Position::new(life as f32, life as f32)),
                stats,
                ..Default::default()
            }),
            ..Default::default()
        }),
        area: Some(AreaState {
            area: format!("{label}Area"),
            ..Default::default()
        }),
        points_of_interest: Vec::new(),
    }
}

impl GameStateReader for LabelledReader {
    fn read_game_state(&self) -> Result<GameState, ReadError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.barrier.wait();
        Ok(if call % 2 == 0 {
            labelled_state("Alpha", 10)
        } else {
            labelled_state("Bravo", 20)
        })
    }
}

fn assert_consistent(snapshot: &api::GameSnapshot) -> String {
    let player = snapshot.player_unit.as_ref().expect("player present");
    let status = snapshot.status.as_ref().expect("status present");
    let expected_life = match player.name.as_str() {
        "Alpha" => 10,
        "Bravo" => 20,
        other => panic!("unexpected label {other}"),
    };
    assert_eq!(snapshot.area_name, format!("{}Area", player.name));
    assert_eq!(status.life, Some(expected_life));
    assert_eq!(
        player.position,
        Some(api::Position {
            x: expected_life as f32,
            y: expected_life as f32
        })
    );
    player.name.clone()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn overlapping_calls_do_not_share_state() -> anyhow::Result<()> {
    let server =
        common::start_server(Arc::new(LabelledReader::new()), Duration::from_secs(5)).await?;

    let mut first = SnapshotClient::connect(server.local_addr()).await?;
    let mut second = SnapshotClient::connect(server.local_addr()).await?;
    let (a, b) = tokio::join!(first.get_snapshot(), second.get_snapshot());
    let (a, b) = (a?, b?);

    let mut labels = vec![assert_consistent(&a), assert_consistent(&b)];
    labels.sort();
    assert_eq!(labels, vec!["Alpha".to_string(), "Bravo".to_string()]);

    server.shutdown().await;
    Ok(())
}
