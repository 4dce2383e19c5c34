//! Wire contract for the snapshot service.
//!
//! The protobuf schema lives in `proto/snapshot.proto` and is compiled by
//! `prost-build`. Messages travel as length-prefixed frames (see [`frame`]),
//! with one [`api::RpcRequest`] answered by one [`api::RpcResponse`].

pub mod client;
pub mod frame;

pub mod api {
    include!(concat!(env!("OUT_DIR"), "/snapshot.api.rs"));
}

pub use client::{ClientError, SnapshotClient};
pub use frame::{read_frame, read_message, write_frame, write_message, FrameError};

use api::{rpc_request, rpc_response};

/// Port the service listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 50051;

impl From<snapshot_schema::Position> for api::Position {
    fn from(value: snapshot_schema::Position) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

impl From<api::Position> for snapshot_schema::Position {
    fn from(value: api::Position) -> Self {
        Self::new(value.x, value.y)
    }
}

impl api::RpcRequest {
    pub fn get_snapshot(correlation_id: Option<u64>) -> Self {
        Self {
            correlation_id,
            call: Some(rpc_request::Call::GetSnapshot(api::GetSnapshotRequest {})),
        }
    }
}

impl api::RpcResponse {
    pub fn snapshot(correlation_id: Option<u64>, snapshot: api::GameSnapshot) -> Self {
        Self {
            correlation_id,
            result: Some(rpc_response::Result::Snapshot(snapshot)),
        }
    }

    pub fn error(
        correlation_id: Option<u64>,
        code: api::RpcErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            correlation_id,
            result: Some(rpc_response::Result::Error(api::RpcError {
                code: code as i32,
                message: message.into(),
            })),
        }
    }
}

impl api::GameSnapshot {
    /// True when nothing was populated, i.e. the reader had no active game.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn position_survives_the_wire(x in any::<f32>().prop_filter("finite", |v| v.is_finite()),
                                      y in any::<f32>().prop_filter("finite", |v| v.is_finite())) {
            let encoded = api::Position::from(snapshot_schema::Position::new(x, y)).encode_to_vec();
            let decoded = api::Position::decode(encoded.as_slice()).expect("position decodes");
            let back = snapshot_schema::Position::from(decoded);
            prop_assert_eq!(back.x, x);
            prop_assert_eq!(back.y, y);
        }
    }

    #[test]
    fn default_snapshot_is_empty() {
        assert!(api::GameSnapshot::default().is_empty());
        let populated = api::GameSnapshot {
            area_name: "BloodMoor".to_string(),
            ..Default::default()
        };
        assert!(!populated.is_empty());
    }

    #[test]
    fn error_response_carries_code() {
        let response =
            api::RpcResponse::error(Some(7), api::RpcErrorCode::MissingCall, "no call set");
        match response.result {
            Some(rpc_response::Result::Error(err)) => {
                assert_eq!(err.code(), api::RpcErrorCode::MissingCall);
                assert_eq!(err.message, "no call set");
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(response.correlation_id, Some(7));
    }
}
