//! Server lifecycle management.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use tiny_http::Server;

use crate::{core::register_server, log};

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let Some(port) = base_port.checked_add(offset) else {
            break;
        };
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                // Port 0 asks the OS for one; report what was actually bound.
                let bound = server.server_addr().to_ip().unwrap_or(addr);
                return Ok((server, bound));
            }
            Err(e) => {
                crate::debug!("serve"; "cannot bind {}: {}", addr, e);
                last_error = Some((port, e));
            }
        }
    }

    match last_error {
        Some((port, e)) => Err(anyhow!(
            "failed to bind after {} attempts (ports {}-{}): {}",
            MAX_PORT_RETRIES,
            base_port,
            port,
            e
        )),
        None => Err(anyhow!("no port available from {}", base_port)),
    }
}

/// Register server for graceful shutdown.
///
/// When Ctrl+C is pressed, the handler set up in `main` unblocks the server
/// and the request loop returns.
pub fn register_server_for_shutdown(server: Arc<Server>) {
    register_server(server);
}
