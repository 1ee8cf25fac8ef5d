//! WebSocket upgrade for the reload notification path.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tiny_http::{Request, Response, StatusCode};
use tungstenite::WebSocket;
use tungstenite::handshake::derive_accept_key;
use tungstenite::protocol::Role;

use super::response;
use crate::config::WatchSpec;
use crate::http::Headers;
use crate::reload::{ReloadSession, SessionIds};
use crate::{debug, log};

/// Accepts reload connections; one session (and thread) per connection.
pub struct ReloadEndpoint {
    spec: Arc<WatchSpec>,
    ids: SessionIds,
    interval: Duration,
}

impl ReloadEndpoint {
    pub fn new(spec: Arc<WatchSpec>, interval: Duration) -> Self {
        Self {
            spec,
            ids: SessionIds::new(),
            interval,
        }
    }

    /// Upgrade `request` and hand the socket to a new session thread.
    ///
    /// Returns once the session is running; the session ends on its own.
    pub fn accept(&self, request: Request) -> Result<()> {
        let headers = response::request_headers(&request);
        let Some(accept) = accept_key(&headers) else {
            let text = "400 Bad Request: WebSocket upgrade expected";
            return response::respond_text(request, 400, text);
        };
        let accept_header = response::make_header("Sec-WebSocket-Accept", &accept)?;

        // Watch first so a failure can still be reported as a plain HTTP error.
        let id = self.ids.next();
        let session = match ReloadSession::start(id, &self.spec, self.interval) {
            Ok(session) => session,
            Err(e) => {
                log!("watch"; "cannot watch {}: {}", self.spec.root().display(), e);
                return response::respond_text(request, 500, "500 Internal Server Error");
            }
        };

        // tiny_http adds `Upgrade` and `Connection` itself.
        let handshake = Response::empty(StatusCode(101)).with_header(accept_header);
        let stream = request.upgrade("websocket", handshake);
        let mut ws = WebSocket::from_raw_socket(stream, Role::Server, None);
        debug!("reload"; "session {} connected", id);

        thread::Builder::new()
            .name(format!("reload-{id}"))
            .spawn(move || {
                // Routine on navigation: the page closes its socket.
                if let Err(e) = session.run(&mut ws) {
                    debug!("reload"; "session {} ended: {:#}", id, e);
                }
                let _ = ws.close(None);
                let _ = ws.flush();
            })
            .context("failed to spawn reload session thread")?;

        Ok(())
    }
}

/// `Sec-WebSocket-Accept` value for a valid upgrade request, else `None`.
fn accept_key(headers: &Headers) -> Option<String> {
    let upgrade = headers.get("Upgrade")?;
    if !upgrade
        .split(',')
        .any(|p| p.trim().eq_ignore_ascii_case("websocket"))
    {
        return None;
    }

    let key = headers.get("Sec-WebSocket-Key")?.trim();
    if key.is_empty() {
        return None;
    }
    Some(derive_accept_key(key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upgrade_headers(key: &str) -> Headers {
        let mut headers = Headers::new();
        headers.set("Connection", "Upgrade");
        headers.set("upgrade", "WebSocket");
        headers.set("Sec-WebSocket-Version", "13");
        headers.set("sec-websocket-key", key);
        headers
    }

    #[test]
    fn test_accept_key_matches_rfc_example() {
        let headers = upgrade_headers("dGhlIHNhbXBsZSBub25jZQ==");
        assert_eq!(
            accept_key(&headers).as_deref(),
            Some("s3pPLMBiTxaQ9kYGzzhZRbK+xOo=")
        );
    }

    #[test]
    fn test_plain_get_is_not_an_upgrade() {
        let mut headers = Headers::new();
        headers.set("Accept", "text/html");
        assert_eq!(accept_key(&headers), None);
    }

    #[test]
    fn test_missing_key_rejected() {
        let mut headers = upgrade_headers("");
        assert_eq!(accept_key(&headers), None);

        headers.remove("Sec-WebSocket-Key");
        assert_eq!(accept_key(&headers), None);
    }

    #[test]
    fn test_other_protocol_rejected() {
        let mut headers = upgrade_headers("dGhlIHNhbXBsZSBub25jZQ==");
        headers.set("Upgrade", "h2c");
        assert_eq!(accept_key(&headers), None);
    }
}
