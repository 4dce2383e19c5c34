#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Once};
use std::time::Duration;

use snapshot_core::{
    start_snapshot_server, GameStateReader, ReferenceData, SnapshotBuilder, SnapshotServerHandle,
};

static INIT: Once = Once::new();

pub const MAX_REQUEST_BYTES: usize = 64 * 1024;

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn fixture_path(name: &str) -> PathBuf {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    debug_assert!(path.exists(), "missing fixture at {}", path.display());
    path
}

/// Serve `reader` on an ephemeral loopback port.
pub async fn start_server(
    reader: Arc<dyn GameStateReader>,
    read_timeout: Duration,
) -> anyhow::Result<SnapshotServerHandle> {
    init_tracing();
    let builder = SnapshotBuilder::new(reader, ReferenceData::builtin(), read_timeout);
    let server = start_snapshot_server("127.0.0.1:0".parse()?, builder, MAX_REQUEST_BYTES).await?;
    Ok(server)
}
