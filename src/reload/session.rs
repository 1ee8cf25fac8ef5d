//! Per-connection reload session.
//!
//! ```text
//! ChangeDetector --[ChangeEvent]--+
//!                                 +--> select --> pending? --[tick]--> sink (once)
//! Heartbeat ------[tick]----------+
//! ```
//!
//! A session is Active from [`ReloadSession::start`] until it has sent one
//! reload message or failed. Either way both helpers are cancelled and
//! joined before [`ReloadSession::run`] returns. The browser reconnects to
//! resume watching.
//!
//! Idle ticks send a keepalive, so a client that went away fails the next
//! write and its session ends without waiting for a change.

use std::fmt;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use crossbeam::channel::select;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::detector::{ChangeDetector, ChangeEvent};
use super::heartbeat::Heartbeat;
use super::message::ReloadMessage;
use crate::config::WatchSpec;

/// Where a session delivers its reload message.
pub trait ReloadSink {
    fn send_reload(&mut self, message: &ReloadMessage) -> Result<()>;

    /// Check the connection is still there; an error ends the session.
    fn send_keepalive(&mut self) -> Result<()>;
}

impl<S: Read + Write> ReloadSink for WebSocket<S> {
    fn send_reload(&mut self, message: &ReloadMessage) -> Result<()> {
        self.send(Message::Text(message.to_json().into()))
            .context("failed to send reload message")
    }

    fn send_keepalive(&mut self) -> Result<()> {
        // Browsers answer pings on their own; the page script never sees them.
        self.send(Message::Ping(Default::default()))
            .context("client went away")
    }
}

/// Diagnostic identifier of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out increasing session ids. Owned by the server.
#[derive(Debug, Default)]
pub struct SessionIds {
    last: AtomicU64,
}

impl SessionIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> SessionId {
        SessionId(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

/// An Active session: one change detector plus one heartbeat.
pub struct ReloadSession {
    id: SessionId,
    detector: ChangeDetector,
    heartbeat: Heartbeat,
}

impl ReloadSession {
    /// Enter the Active state. The watch is registered when this returns.
    pub fn start(id: SessionId, spec: &WatchSpec, interval: Duration) -> notify::Result<Self> {
        let detector = ChangeDetector::spawn(spec)?;
        let heartbeat = Heartbeat::spawn(interval);
        crate::debug!("reload"; "session {} watching {}", id, spec.root().display());

        Ok(Self {
            id,
            detector,
            heartbeat,
        })
    }

    /// Wait for a change, send one reload at the next tick, then terminate.
    ///
    /// Errors (send failure, helper loss) are fatal to this session only.
    pub fn run<S: ReloadSink + ?Sized>(self, sink: &mut S) -> Result<()> {
        let Self {
            id,
            detector,
            heartbeat,
        } = self;

        let result = fire_once(id, &detector, &heartbeat, sink);

        detector.cancel();
        heartbeat.cancel();
        crate::debug!("reload"; "session {} terminated", id);

        result
    }
}

fn fire_once<S: ReloadSink + ?Sized>(
    id: SessionId,
    detector: &ChangeDetector,
    heartbeat: &Heartbeat,
    sink: &mut S,
) -> Result<()> {
    let mut pending: Option<ChangeEvent> = None;

    loop {
        select! {
            recv(detector.events()) -> change => {
                let change = change.map_err(|_| anyhow!("change detector stopped"))?;
                crate::debug!("reload"; "session {} pending: {}", id, change);
                pending = Some(change);
            }
            recv(heartbeat.ticks()) -> tick => {
                tick.map_err(|_| anyhow!("heartbeat stopped"))?;
                let Some(change) = &pending else {
                    sink.send_keepalive()?;
                    continue;
                };
                sink.send_reload(&ReloadMessage::now())?;
                crate::log!("reload"; "{} ({})", change.description(), id);
                return Ok(());
            }
        }
    }
}
