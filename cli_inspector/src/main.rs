use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use snapshot_proto::api::GameSnapshot;
use snapshot_proto::SnapshotClient;
use tracing::{info, warn};

mod summary;

#[derive(Parser, Debug)]
#[command(author, version, about = "Game snapshot inspector", long_about = None)]
struct Cli {
    /// Address of the snapshot service.
    #[arg(long, default_value = "127.0.0.1:50051")]
    endpoint: String,
    /// Poll every N milliseconds instead of fetching once.
    #[arg(long, value_name = "MS")]
    watch: Option<u64>,
    /// Print the full snapshot as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(interval_ms) = cli.watch else {
        info!("Connecting to snapshot service at {}", cli.endpoint);
        let mut client = SnapshotClient::connect(cli.endpoint.as_str()).await?;
        let snapshot = client.get_snapshot().await?;
        return print_snapshot(&snapshot, cli.json);
    };

    let mut client = None;
    let mut interval = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Inspector requested shutdown");
                break;
            }
            _ = interval.tick() => {
                match poll_snapshot(&mut client, &cli.endpoint).await {
                    Some(snapshot) => print_snapshot(&snapshot, cli.json)?,
                    None => {
                        info!("Reconnecting in 2 seconds...");
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                }
            }
        }
    }

    Ok(())
}

/// One watch tick. Connects first if needed; any failure drops the
/// connection so the next tick starts over.
async fn poll_snapshot(
    client: &mut Option<SnapshotClient>,
    endpoint: &str,
) -> Option<GameSnapshot> {
    if client.is_none() {
        info!("Connecting to snapshot service at {}", endpoint);
        match SnapshotClient::connect(endpoint).await {
            Ok(fresh) => *client = Some(fresh),
            Err(err) => {
                warn!("Failed to connect: {}", err);
                return None;
            }
        }
    }

    let connected = client.as_mut()?;
    match connected.get_snapshot().await {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            warn!("Snapshot call failed: {}", err);
            *client = None;
            None
        }
    }
}

fn print_snapshot(snapshot: &GameSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
    } else {
        println!("{}", summary::render(snapshot));
    }
    Ok(())
}
