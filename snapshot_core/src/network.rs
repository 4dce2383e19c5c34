use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use prost::Message;
use snapshot_proto::api::{self, rpc_request};
use snapshot_proto::{read_frame, write_message};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::builder::SnapshotBuilder;

/// Running RPC listener. The listener stops accepting connections once the
/// handle is dropped or [`SnapshotServerHandle::shutdown`] is called.
pub struct SnapshotServerHandle {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SnapshotServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting new connections. Connections already open finish the
    /// call they are serving and close when their client does.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.task.await {
            error!(
                target: "snapshot_service::rpc",
                error = %err,
                "rpc.accept_task_failed"
            );
        }
    }
}

pub async fn start_snapshot_server(
    bind_addr: SocketAddr,
    builder: SnapshotBuilder,
    max_request_bytes: usize,
) -> io::Result<SnapshotServerHandle> {
    let listener = TcpListener::bind(bind_addr).await?;
    let local_addr = listener.local_addr()?;
    let (shutdown, shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(accept_loop(
        listener,
        builder,
        max_request_bytes,
        shutdown_rx,
    ));

    info!(
        target: "snapshot_service::rpc",
        %local_addr,
        "rpc.listening"
    );

    Ok(SnapshotServerHandle {
        local_addr,
        shutdown,
        task,
    })
}

async fn accept_loop(
    listener: TcpListener,
    builder: SnapshotBuilder,
    max_request_bytes: usize,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!(target: "snapshot_service::rpc", "rpc.stopped");
                    break;
                }
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, addr)) => {
                        info!("Snapshot client connected: {}", addr);
                        if let Err(err) = stream.set_nodelay(true) {
                            warn!("Failed to set TCP_NODELAY: {}", err);
                        }
                        let builder = builder.clone();
                        tokio::spawn(serve_connection(stream, addr, builder, max_request_bytes));
                    }
                    Err(err) => {
                        error!("Error accepting snapshot client: {}", err);
                        tokio::time::sleep(Duration::from_millis(200)).await;
                    }
                }
            }
        }
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    addr: SocketAddr,
    builder: SnapshotBuilder,
    max_request_bytes: usize,
) {
    loop {
        let frame = match read_frame(&mut stream, max_request_bytes).await {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                debug!(target: "snapshot_service::rpc", %addr, "rpc.client_closed");
                break;
            }
            Err(err) => {
                warn!("Dropping snapshot client {}: {}", addr, err);
                break;
            }
        };

        let response = handle_request(&frame, &builder).await;
        if let Err(err) = write_message(&mut stream, &response).await {
            warn!("Failed to send snapshot to client {}: {}", addr, err);
            break;
        }
    }
}

/// Decode one request frame and produce its response.
pub async fn handle_request(frame: &[u8], builder: &SnapshotBuilder) -> api::RpcResponse {
    let request = match api::RpcRequest::decode(frame) {
        Ok(request) => request,
        Err(err) => {
            warn!(
                target: "snapshot_service::rpc",
                error = %err,
                "rpc.rejected=malformed_request"
            );
            return api::RpcResponse::error(
                None,
                api::RpcErrorCode::MalformedRequest,
                err.to_string(),
            );
        }
    };

    match request.call {
        Some(rpc_request::Call::GetSnapshot(_)) => {
            let built = builder.build_snapshot().await;
            debug!(
                target: "snapshot_service::rpc",
                correlation_id = request.correlation_id,
                outcome = %built.outcome,
                monsters = built.snapshot.monsters.len(),
                items = built.snapshot.items.len(),
                "rpc.get_snapshot"
            );
            api::RpcResponse::snapshot(request.correlation_id, built.snapshot)
        }
        None => {
            warn!(
                target: "snapshot_service::rpc",
                correlation_id = request.correlation_id,
                "rpc.rejected=missing_call"
            );
            api::RpcResponse::error(
                request.correlation_id,
                api::RpcErrorCode::MissingCall,
                "request carried no call",
            )
        }
    }
}
