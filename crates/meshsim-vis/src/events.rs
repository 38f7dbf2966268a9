//! Simulation events streamed from the engine.
//!
//! Every unit on the event channel is a JSON object shaped as
//! `{type, from, to, ttl?, payload?}`. Seven types are known; anything else
//! decodes as [`Decoded::Unknown`] so a new server-side event shows up in the
//! log instead of disappearing.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Payload of a failed decryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailurePayload {
    pub error: String,
}

/// Payload of a successful decryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaintextPayload {
    pub plaintext: String,
}

/// An event reported by the simulation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    /// A node received a message
    Received { from: String, to: String, ttl: i64 },

    /// A node dropped a message whose TTL ran out
    DroppedTtl { from: String, to: String },

    /// The recipient could not decrypt a message
    DecryptFailed {
        from: String,
        to: String,
        payload: FailurePayload,
    },

    /// The recipient decrypted a message
    Decrypted {
        from: String,
        to: String,
        payload: PlaintextPayload,
    },

    /// A node forwarded a message to its neighbors
    Forwarded { from: String, to: String, ttl: i64 },

    /// The network dropped a hop
    DroppedNetwork { from: String, to: String },

    /// The network delivered a hop
    Delivered { from: String, to: String, ttl: i64 },
}

impl SimEvent {
    /// Wire names of every known event type.
    pub const KINDS: [&'static str; 7] = [
        "received",
        "dropped_ttl",
        "decrypt_failed",
        "decrypted",
        "forwarded",
        "dropped_network",
        "delivered",
    ];

    /// Wire name of this event's type.
    pub fn kind(&self) -> &'static str {
        match self {
            SimEvent::Received { .. } => "received",
            SimEvent::DroppedTtl { .. } => "dropped_ttl",
            SimEvent::DecryptFailed { .. } => "decrypt_failed",
            SimEvent::Decrypted { .. } => "decrypted",
            SimEvent::Forwarded { .. } => "forwarded",
            SimEvent::DroppedNetwork { .. } => "dropped_network",
            SimEvent::Delivered { .. } => "delivered",
        }
    }

    /// Sending node.
    pub fn from(&self) -> &str {
        match self {
            SimEvent::Received { from, .. }
            | SimEvent::DroppedTtl { from, .. }
            | SimEvent::DecryptFailed { from, .. }
            | SimEvent::Decrypted { from, .. }
            | SimEvent::Forwarded { from, .. }
            | SimEvent::DroppedNetwork { from, .. }
            | SimEvent::Delivered { from, .. } => from,
        }
    }

    /// Receiving node.
    pub fn to(&self) -> &str {
        match self {
            SimEvent::Received { to, .. }
            | SimEvent::DroppedTtl { to, .. }
            | SimEvent::DecryptFailed { to, .. }
            | SimEvent::Decrypted { to, .. }
            | SimEvent::Forwarded { to, .. }
            | SimEvent::DroppedNetwork { to, .. }
            | SimEvent::Delivered { to, .. } => to,
        }
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::Received { from, to, ttl } => {
                write!(f, "Node {} RECEIVED from {} (TTL={})", to, from, ttl)
            }
            SimEvent::DroppedTtl { from, to } => write!(f, "Node {} DROPPED_TTL from {}", to, from),
            SimEvent::DecryptFailed { from, to, payload } => {
                write!(f, "Node {} DECRYPT_FAILED from {}: {}", to, from, payload.error)
            }
            SimEvent::Decrypted { from, to, payload } => {
                write!(f, "Node {} DECRYPTED from {}: \"{}\"", to, from, payload.plaintext)
            }
            SimEvent::Forwarded { from, ttl, .. } => {
                write!(f, "Node {} FORWARDED (new TTL={})", from, ttl)
            }
            SimEvent::DroppedNetwork { from, to } => {
                write!(f, "Network DROPPED between {} → {}", from, to)
            }
            SimEvent::Delivered { from, to, ttl } => {
                write!(f, "Network DELIVERED from {} → {} (TTL={})", from, to, ttl)
            }
        }
    }
}

/// A decoded channel unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// One of the known event types
    Event(SimEvent),
    /// Valid JSON with an unrecognized or missing `type`
    Unknown(Value),
}

impl Decoded {
    /// The log line for this unit.
    pub fn log_line(&self) -> String {
        match self {
            Decoded::Event(event) => event.to_string(),
            Decoded::Unknown(value) => format!("Unknown event type: {}", value),
        }
    }
}

/// Errors decoding a channel unit.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The unit is not JSON
    #[error("not JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// A known type is missing or has malformed fields
    #[error("malformed {kind} event: {source}")]
    Fields {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode one text unit from the event channel.
pub fn decode(text: &str) -> Result<Decoded, DecodeError> {
    let value: Value = serde_json::from_str(text).map_err(DecodeError::Json)?;

    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .filter(|kind| SimEvent::KINDS.contains(kind))
        .map(str::to_string);
    let Some(kind) = kind else {
        return Ok(Decoded::Unknown(value));
    };

    serde_json::from_value(value)
        .map(Decoded::Event)
        .map_err(|source| DecodeError::Fields { kind, source })
}
