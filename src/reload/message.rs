//! Reload message protocol.
//!
//! The browser snippet treats any truthy `r` field as "reload now", so the
//! whole protocol is a single JSON object: `{"r": <unix millis>}`.

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

/// Reload instruction sent once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReloadMessage {
    /// Milliseconds since the Unix epoch when the reload was decided.
    pub r: u64,
}

impl ReloadMessage {
    /// Create a reload message stamped with the current time.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        // Zero would be falsy on the client.
        Self { r: millis.max(1) }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!(r#"{{"r":{}}}"#, self.r))
    }
}
