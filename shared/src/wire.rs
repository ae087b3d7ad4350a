//! Message envelopes exchanged with the relay and the durable shape store.
//!
//! A shape travels double-encoded: the `shape` field of a `chat` frame (and
//! of every history record) is itself a JSON string holding
//! `{"shape": <shape>}`. Both layers must be preserved exactly for the relay
//! and the store to interoperate.

use serde::{Deserialize, Serialize};

use crate::Shape;

/// Error returned by the envelope and frame decoders.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("malformed wire payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Inner layer of the double encoding.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ShapeEnvelope {
    pub shape: Shape,
}

pub fn encode_envelope(shape: &Shape) -> Result<String, WireError> {
    Ok(serde_json::to_string(&ShapeEnvelope {
        shape: shape.clone(),
    })?)
}

pub fn decode_envelope(raw: &str) -> Result<Shape, WireError> {
    let envelope: ShapeEnvelope = serde_json::from_str(raw)?;
    Ok(envelope.shape)
}

/// Room traffic, tagged on `type`. `Chat` carries an envelope-encoded shape
/// string, never a bare shape object.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum RoomMessage {
    #[serde(rename = "chat")]
    Chat {
        #[serde(rename = "roomId")]
        room_id: String,
        shape: String,
    },
    #[serde(rename = "join_room")]
    JoinRoom { link: String },
    #[serde(rename = "leave_room")]
    LeaveRoom {
        #[serde(rename = "roomId")]
        room_id: String,
    },
    #[serde(rename = "visitor_count")]
    VisitorCount { visitors: u32 },
}

/// Builds the broadcast frame for one committed shape.
pub fn shape_broadcast(room_id: &str, shape: &Shape) -> Result<RoomMessage, WireError> {
    Ok(RoomMessage::Chat {
        room_id: room_id.to_string(),
        shape: encode_envelope(shape)?,
    })
}

/// The relay acknowledges a join with an untyped `{"status": …}` frame.
#[derive(Deserialize, Clone, Debug)]
pub struct JoinAck {
    pub status: String,
}

/// Everything the relay is known to deliver. Frames matching neither arm are
/// malformed and get dropped by the caller.
#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum ServerFrame {
    Room(RoomMessage),
    Ack(JoinAck),
}

pub fn decode_server_frame(raw: &str) -> Result<ServerFrame, WireError> {
    Ok(serde_json::from_str(raw)?)
}

/// One record of the durable store's history read; `shape` is an encoded
/// envelope string.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StoredShape {
    pub shape: String,
}

/// Payload of the room-scoped history read.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HistoryResponse {
    pub shapes: Vec<StoredShape>,
}
