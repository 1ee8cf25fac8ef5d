//! Development server with live reload support.
//!
//! Routes:
//! - `RELOAD_PATH` - WebSocket upgrade, one reload session per connection
//! - `GET|HEAD /*` - static files through the HTML-injecting filter
//! - anything else - 405

mod endpoint;
mod lifecycle;
mod response;
#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tiny_http::{Method, Request, Server};

use crate::config::{Config, WatchSpec};
use crate::embed::serve::{RELOAD_SNIPPET, ReloadVars};
use crate::http::{BufferedResponse, ContentFilter, FileServer, Handler};
use crate::reload::{HEARTBEAT_INTERVAL, RELOAD_PATH};
use crate::{debug, log};

use endpoint::ReloadEndpoint;

/// Request-independent state shared by the worker threads.
struct Routes {
    files: ContentFilter<FileServer>,
    reload: ReloadEndpoint,
    is_shutdown: fn() -> bool,
}

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    addr: SocketAddr,
    routes: Arc<Routes>,
}

/// Bind the HTTP server without starting the request loop
pub fn bind_server(config: &Config, spec: Arc<WatchSpec>) -> Result<BoundServer> {
    let bound = bind(config, spec, HEARTBEAT_INTERVAL, crate::core::is_shutdown)?;
    lifecycle::register_server_for_shutdown(Arc::clone(&bound.server));
    Ok(bound)
}

fn bind(
    config: &Config,
    spec: Arc<WatchSpec>,
    interval: Duration,
    is_shutdown: fn() -> bool,
) -> Result<BoundServer> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;

    let snippet = RELOAD_SNIPPET.render(&ReloadVars { path: RELOAD_PATH });
    let routes = Routes {
        files: ContentFilter::new(FileServer::new(spec.root()), snippet),
        reload: ReloadEndpoint::new(Arc::clone(&spec), interval),
        is_shutdown,
    };

    log!("watch"; "{} matching {}", spec.root().display(), spec.pattern());

    Ok(BoundServer {
        server: Arc::new(server),
        addr,
        routes: Arc::new(routes),
    })
}

impl BoundServer {
    /// Start the request loop (blocking). Returns after Ctrl+C.
    pub fn run(self) -> Result<()> {
        // Sessions run on their own threads; the pool only does short work.
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .context("failed to create thread pool")?;

        log!("serve"; "http://{}", self.addr);

        for request in self.server.incoming_requests() {
            let routes = Arc::clone(&self.routes);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &routes) {
                    log!("serve"; "request error: {:#}", e);
                }
            });
        }
        Ok(())
    }
}

/// Handle a single HTTP request
fn handle_request(request: Request, routes: &Routes) -> Result<()> {
    if (routes.is_shutdown)() {
        return response::respond_unavailable(request);
    }

    let url = request.url().to_string();
    let path = url.split('?').next().unwrap_or_default();

    if path == RELOAD_PATH {
        if request.method() != &Method::Get {
            return response::respond_method_not_allowed(request, "GET");
        }
        return routes.reload.accept(request);
    }

    if !matches!(request.method(), Method::Get | Method::Head) {
        return response::respond_method_not_allowed(request, "GET, HEAD");
    }

    let mut buffered = BufferedResponse::new();
    if let Err(e) = routes.files.serve(&url, &mut buffered) {
        log!("serve"; "{}: {:#}", url, e);
        return response::respond_text(request, 500, "500 Internal Server Error");
    }

    debug!("serve"; "{} {} {}", request.method(), url, buffered.status);
    response::respond_buffered(request, buffered)
}
