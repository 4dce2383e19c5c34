//! Snapshot-aggregation service.
//!
//! Every call pulls a fresh [`GameState`](snapshot_schema::GameState) from a
//! [`GameStateReader`], runs it through the entity translators and returns a
//! complete [`GameSnapshot`](snapshot_proto::api::GameSnapshot). Nothing read
//! during one call outlives it.

pub mod builder;
pub mod config;
pub mod decode;
pub mod network;
pub mod reader;
pub mod reference;
mod translate;

pub use builder::{assemble_snapshot, BuiltSnapshot, SnapshotBuilder, SnapshotOutcome};
pub use config::{load_service_config_from_env, ConfigError, ServiceConfig};
pub use network::{start_snapshot_server, SnapshotServerHandle};
pub use reader::{CaptureFileReader, GameStateReader, NoGameReader, ReadError};
pub use reference::{load_reference_data_from_env, ReferenceData, ReferenceDataError};
