//! Simulated worker events
//!
//! The bootstrap treats events as opaque; these carry just enough structure
//! for assertions: which client a shared-mode connection came from, and a
//! payload string. Client identity is never used for ordering.

use core::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ----------------------------------------------------------------------------
// Client Identity
// ----------------------------------------------------------------------------

/// Identity of a simulated client connecting to a shared worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ----------------------------------------------------------------------------
// Simulated Event
// ----------------------------------------------------------------------------

/// Which worker hook delivered the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEventKind {
    /// Connection establishment from a client (shared mode)
    Connection { client: ClientId },
    /// Message delivery from the single implicit client (dedicated mode)
    Message,
}

/// One discrete event delivered by the simulated worker scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimEvent {
    pub kind: SimEventKind,
    pub payload: String,
}

impl SimEvent {
    pub fn connection(client: ClientId, payload: impl Into<String>) -> Self {
        Self {
            kind: SimEventKind::Connection { client },
            payload: payload.into(),
        }
    }

    pub fn message(payload: impl Into<String>) -> Self {
        Self {
            kind: SimEventKind::Message,
            payload: payload.into(),
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}
