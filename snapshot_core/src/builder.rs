//! Per-call snapshot assembly.

use std::{sync::Arc, time::Duration};

use snapshot_proto::api;
use snapshot_schema::{AreaState, GameState, LiveState, PointOfInterest};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::{
    reader::GameStateReader,
    reference::ReferenceData,
    translate::{self, LiveUnits},
};

/// Why a call produced the snapshot it did. Callers on the wire only ever see
/// a full or an empty snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SnapshotOutcome {
    Populated,
    NoActiveGame,
    ReadFailure,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSnapshot {
    pub snapshot: api::GameSnapshot,
    pub outcome: SnapshotOutcome,
}

impl BuiltSnapshot {
    fn empty(outcome: SnapshotOutcome) -> Self {
        Self {
            snapshot: api::GameSnapshot::default(),
            outcome,
        }
    }
}

/// Reads allowed on blocking workers at once unless configured otherwise.
pub const DEFAULT_MAX_CONCURRENT_READS: usize = 4;

/// Builds one snapshot per call. Holds only shared handles, so a clone can
/// serve every connection concurrently.
#[derive(Clone)]
pub struct SnapshotBuilder {
    reader: Arc<dyn GameStateReader>,
    reference: Arc<ReferenceData>,
    read_timeout: Duration,
    /// One permit per read in flight, held until the blocking read returns.
    read_slots: Arc<Semaphore>,
}

impl SnapshotBuilder {
    pub fn new(
        reader: Arc<dyn GameStateReader>,
        reference: Arc<ReferenceData>,
        read_timeout: Duration,
    ) -> Self {
        Self {
            reader,
            reference,
            read_timeout,
            read_slots: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT_READS)),
        }
    }

    /// Bound the number of reads running at once, including reads whose call
    /// already timed out. Clamped to at least one.
    pub fn with_max_concurrent_reads(mut self, max: usize) -> Self {
        self.read_slots = Arc::new(Semaphore::new(max.max(1)));
        self
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Read the game once and translate the result.
    ///
    /// Read failures, reader panics and reads that exceed the timeout all
    /// produce an empty snapshot. A timed-out read keeps running on its
    /// blocking worker and keeps its read slot until it returns; its result
    /// is discarded. With every slot held by a stuck reader, later calls time
    /// out waiting for a slot without starting another read.
    pub async fn build_snapshot(&self) -> BuiltSnapshot {
        let reader = Arc::clone(&self.reader);
        let read_slots = Arc::clone(&self.read_slots);
        let read = tokio::time::timeout(self.read_timeout, async move {
            // The semaphore is never closed.
            let permit = read_slots.acquire_owned().await.ok();
            tokio::task::spawn_blocking(move || {
                let _permit = permit;
                reader.read_game_state()
            })
            .await
        })
        .await;

        let state = match read {
            Ok(Ok(Ok(state))) => state,
            Ok(Ok(Err(err))) => {
                warn!(
                    target: "snapshot_service::builder",
                    error = %err,
                    "snapshot.read_failed"
                );
                return BuiltSnapshot::empty(SnapshotOutcome::ReadFailure);
            }
            Ok(Err(err)) => {
                warn!(
                    target: "snapshot_service::builder",
                    error = %err,
                    "snapshot.reader_panicked"
                );
                return BuiltSnapshot::empty(SnapshotOutcome::ReadFailure);
            }
            Err(_) => {
                warn!(
                    target: "snapshot_service::builder",
                    timeout_ms = self.read_timeout.as_millis() as u64,
                    "snapshot.read_timed_out"
                );
                return BuiltSnapshot::empty(SnapshotOutcome::TimedOut);
            }
        };

        self.build_from_state(&state)
    }

    pub fn build_from_state(&self, state: &GameState) -> BuiltSnapshot {
        match (&state.live, &state.area) {
            (Some(live), Some(area)) => BuiltSnapshot {
                snapshot: assemble_snapshot(live, area, &state.points_of_interest, &self.reference),
                outcome: SnapshotOutcome::Populated,
            },
            _ => {
                debug!(
                    target: "snapshot_service::builder",
                    live = state.live.is_some(),
                    area = state.area.is_some(),
                    "snapshot.no_active_game"
                );
                BuiltSnapshot::empty(SnapshotOutcome::NoActiveGame)
            }
        }
    }
}

/// Translate one consistent read into a wire snapshot.
pub fn assemble_snapshot(
    live: &LiveState,
    area: &AreaState,
    points_of_interest: &[PointOfInterest],
    reference: &ReferenceData,
) -> api::GameSnapshot {
    let units = LiveUnits::partition(&live.units);

    api::GameSnapshot {
        status: Some(translate::status(live)),
        player_unit: live.player.as_ref().and_then(translate::player_unit),
        area_origin: Some(area.origin.into()),
        area_name: area.area.clone(),
        menu_state: Some(translate::menu_state(&live.menu)),
        corpses: translate::corpses(&units.corpses),
        monsters: translate::monsters(&units.monsters, reference),
        objects: translate::objects(&units.objects, &area.objects),
        items: translate::items(&units.items),
        points_of_interest: translate::points_of_interest(points_of_interest),
        adjacent_levels: translate::adjacent_levels(&area.adjacent_levels),
        npcs: translate::npcs(&area.npcs, reference),
        collision_grid: translate::collision_grid(&area.collision_grid),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::reader::{NoGameReader, ReadError};
    use snapshot_schema::{
        CatalogObject, CorpseUnit, MenuState, MonsterType, MonsterUnit, ObjectUnit, PlayerClass,
        PlayerUnit, Position, Stat, Unit,
    };

    fn reference() -> Arc<ReferenceData> {
        Arc::new(ReferenceData::from_parts(
            [(5, "Zombie".to_string())],
            [("Bonebreaker".to_string(), "bonebreaker".to_string())],
        ))
    }

    fn builder(reader: Arc<dyn GameStateReader>) -> SnapshotBuilder {
        SnapshotBuilder::new(reader, reference(), Duration::from_millis(500))
    }

    fn active_state() -> GameState {
        GameState {
            live: Some(LiveState {
                player: Some(PlayerUnit {
                    name: Some("Nyx".to_string()),
                    class: Some(PlayerClass::Sorceress),
                    position: Some(Position::new(100.0, 200.0)),
                    stats: [(Stat::Life, 50 << 8), (Stat::MaxLife, 80 << 8)]
                        .into_iter()
                        .collect(),
                    skills: Vec::new(),
                }),
                mercenaries: Vec::new(),
                units: vec![
                    Unit::Monster(MonsterUnit {
                        unit_id: 1,
                        class_id: 5,
                        monster_type: MonsterType::SuperUnique,
                        stats_name: Some("bonebreaker".to_string()),
                        position: Some(Position::new(110.0, 205.0)),
                        ..MonsterUnit::default()
                    }),
                    Unit::Object(ObjectUnit {
                        name: Some("Waypoint".to_string()),
                        position: Some(Position::new(10.0, 20.0)),
                        interact_type: 0x28,
                        ..ObjectUnit::default()
                    }),
                    Unit::Corpse(CorpseUnit {
                        name: Some("Nyx".to_string()),
                        position: Some(Position::new(90.0, 190.0)),
                    }),
                ],
                menu: MenuState {
                    stash: true,
                    ..MenuState::default()
                },
            }),
            area: Some(AreaState {
                area: "BloodMoor".to_string(),
                origin: Position::new(3000.0, 5000.0),
                objects: vec![CatalogObject {
                    name: "Waypoint".to_string(),
                    positions: vec![Position::new(5.0, 5.0)],
                }],
                collision_grid: vec![vec![0, 1], vec![1, 0]],
                ..AreaState::default()
            }),
            points_of_interest: vec![PointOfInterest {
                label: "Den of Evil".to_string(),
                position: Position::new(1.0, 2.0),
            }],
        }
    }

    #[tokio::test]
    async fn absent_state_yields_empty_snapshot() {
        let built = builder(Arc::new(NoGameReader)).build_snapshot().await;
        assert_eq!(built.outcome, SnapshotOutcome::NoActiveGame);
        assert!(built.snapshot.is_empty());

        let half = GameState {
            live: Some(LiveState::default()),
            ..GameState::default()
        };
        let built = builder(Arc::new(NoGameReader)).build_from_state(&half);
        assert_eq!(built.outcome, SnapshotOutcome::NoActiveGame);
        assert!(built.snapshot.is_empty());
    }

    #[tokio::test]
    async fn read_failure_matches_no_active_game_on_the_wire() {
        let failing = || -> Result<GameState, ReadError> {
            Err(ReadError::Process("handle closed".to_string()))
        };
        let failed = builder(Arc::new(failing)).build_snapshot().await;
        let absent = builder(Arc::new(NoGameReader)).build_snapshot().await;

        assert_eq!(failed.outcome, SnapshotOutcome::ReadFailure);
        assert_eq!(failed.snapshot, absent.snapshot);
    }

    #[tokio::test]
    async fn panicking_reader_yields_empty_snapshot() {
        let panicking = || -> Result<GameState, ReadError> { panic!("reader blew up") };
        let built = builder(Arc::new(panicking)).build_snapshot().await;
        assert_eq!(built.outcome, SnapshotOutcome::ReadFailure);
        assert!(built.snapshot.is_empty());
    }

    #[tokio::test]
    async fn slow_reader_times_out_to_empty_snapshot() {
        let slow = || -> Result<GameState, ReadError> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(active_state())
        };
        let builder = SnapshotBuilder::new(Arc::new(slow), reference(), Duration::from_millis(20));
        let built = builder.build_snapshot().await;
        assert_eq!(built.outcome, SnapshotOutcome::TimedOut);
        assert!(built.snapshot.is_empty());
    }

    #[tokio::test]
    async fn stuck_reads_do_not_pile_up_past_the_slot_limit() {
        let started = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&started);
        let stuck = move || -> Result<GameState, ReadError> {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(400));
            Ok(active_state())
        };
        let builder =
            SnapshotBuilder::new(Arc::new(stuck), reference(), Duration::from_millis(20))
                .with_max_concurrent_reads(1);

        for _ in 0..3 {
            let built = builder.build_snapshot().await;
            assert_eq!(built.outcome, SnapshotOutcome::TimedOut);
            assert!(built.snapshot.is_empty());
        }
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn active_state_is_fully_assembled() {
        let reader = || -> Result<GameState, ReadError> { Ok(active_state()) };
        let built = builder(Arc::new(reader)).build_snapshot().await;
        assert_eq!(built.outcome, SnapshotOutcome::Populated);

        let snapshot = built.snapshot;
        assert_eq!(snapshot.area_name, "BloodMoor");
        assert_eq!(
            snapshot.area_origin,
            Some(api::Position {
                x: 3000.0,
                y: 5000.0
            })
        );
        let status = snapshot.status.expect("status present");
        assert_eq!(status.life, Some(50));
        assert_eq!(status.max_life, Some(80));
        assert_eq!(status.mana, None);

        let player = snapshot.player_unit.expect("player present");
        assert_eq!(player.name, "Nyx");
        assert_eq!(player.class, "Sorceress");

        assert_eq!(snapshot.monsters.len(), 1);
        assert_eq!(snapshot.monsters[0].name, "Bonebreaker");

        assert_eq!(snapshot.objects.len(), 1);
        assert_eq!(snapshot.objects[0].position, Some(api::Position { x: 10.0, y: 20.0 }));
        assert!(snapshot.objects[0].selectable);

        assert_eq!(snapshot.corpses.len(), 1);
        assert_eq!(snapshot.points_of_interest[0].name, "Den of Evil");
        assert!(snapshot.menu_state.expect("menu state").stash);
        let grid: Vec<_> = snapshot
            .collision_grid
            .iter()
            .map(|row| row.walkable.clone())
            .collect();
        assert_eq!(grid, vec![vec![true, false], vec![false, true]]);
    }
}
