use std::sync::Arc;

use snapshot_core::{
    load_reference_data_from_env, load_service_config_from_env, start_snapshot_server,
    CaptureFileReader, GameStateReader, NoGameReader, SnapshotBuilder,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (config, config_path) = load_service_config_from_env();
    let reference = load_reference_data_from_env();

    let reader: Arc<dyn GameStateReader> = match &config.capture_path {
        Some(path) => {
            info!(
                target: "snapshot_service::server",
                capture = %path.display(),
                "reader.capture_file"
            );
            Arc::new(CaptureFileReader::new(path))
        }
        None => {
            warn!(
                target: "snapshot_service::server",
                "reader.none -- no capture_path configured, every call reports no active game"
            );
            Arc::new(NoGameReader)
        }
    };

    let builder = SnapshotBuilder::new(reader, reference, config.read_timeout())
        .with_max_concurrent_reads(config.max_concurrent_reads);
    let server = start_snapshot_server(config.bind, builder, config.max_request_bytes)
        .await
        .map_err(|err| {
            format!(
                "failed to bind {} (is another instance already running?): {}",
                config.bind, err
            )
        })?;

    info!(
        target: "snapshot_service::server",
        bind = %server.local_addr(),
        config = ?config_path,
        read_timeout_ms = config.read_timeout_ms,
        "Snapshot service ready"
    );

    tokio::signal::ctrl_c().await?;
    info!(target: "snapshot_service::server", "shutdown.requested");
    server.shutdown().await;

    Ok(())
}
