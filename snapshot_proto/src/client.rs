use std::io;

use thiserror::Error;
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::trace;

use crate::api::{self, rpc_response};
use crate::frame::{read_message, write_message, FrameError};

/// Upper bound on a single response frame. Collision grids dominate the size.
pub const DEFAULT_RESPONSE_LIMIT: usize = 64 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("connect failed: {0}")]
    Connect(#[source] io::Error),
    #[error("request write failed: {0}")]
    Write(#[from] io::Error),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("server closed the connection")]
    Closed,
    #[error("server rejected call ({code:?}): {message}")]
    Rpc {
        code: api::RpcErrorCode,
        message: String,
    },
    #[error("response correlation id {got:?} does not match request {expected}")]
    CorrelationMismatch { expected: u64, got: Option<u64> },
    #[error("response carried no result")]
    EmptyResponse,
}

/// Client for a single connection to the snapshot service. Calls on one
/// connection are sequential; open more clients for parallel calls.
pub struct SnapshotClient {
    stream: TcpStream,
    next_correlation: u64,
    response_limit: usize,
}

impl SnapshotClient {
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(ClientError::Connect)?;
        if let Err(err) = stream.set_nodelay(true) {
            tracing::warn!("Failed to set TCP_NODELAY: {}", err);
        }
        Ok(Self {
            stream,
            next_correlation: 1,
            response_limit: DEFAULT_RESPONSE_LIMIT,
        })
    }

    pub fn with_response_limit(mut self, limit: usize) -> Self {
        self.response_limit = limit;
        self
    }

    pub async fn get_snapshot(&mut self) -> Result<api::GameSnapshot, ClientError> {
        let correlation_id = self.next_correlation;
        self.next_correlation = self.next_correlation.wrapping_add(1);

        let request = api::RpcRequest::get_snapshot(Some(correlation_id));
        write_message(&mut self.stream, &request).await?;

        let response: api::RpcResponse = read_message(&mut self.stream, self.response_limit)
            .await?
            .ok_or(ClientError::Closed)?;
        if response.correlation_id != Some(correlation_id) {
            return Err(ClientError::CorrelationMismatch {
                expected: correlation_id,
                got: response.correlation_id,
            });
        }

        match response.result {
            Some(rpc_response::Result::Snapshot(snapshot)) => {
                trace!(
                    correlation_id,
                    area = %snapshot.area_name,
                    monsters = snapshot.monsters.len(),
                    "snapshot.received"
                );
                Ok(snapshot)
            }
            Some(rpc_response::Result::Error(err)) => Err(ClientError::Rpc {
                code: err.code(),
                message: err.message,
            }),
            None => Err(ClientError::EmptyResponse),
        }
    }
}
