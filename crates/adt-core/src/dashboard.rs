//! Interactive dashboard server.
//!
//! Serves the rendered dashboard page plus a small JSON API on a background
//! thread. All state is computed before the server starts and shared
//! immutably; request handling never mutates anything.
//!
//! Routes:
//! - `GET /` dashboard page
//! - `GET /api/summary` aggregation tables as JSON
//! - `GET /api/user-events?user=NAME` drill-down rows for one user
//! - `GET /health` liveness probe

use crate::aggregate::rows_for_user;
use adt_common::{AggregationResult, CriticalEvent, Error, Result, SCHEMA_VERSION};
use adt_report::{render_dashboard, DashboardOptions};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

/// Bind settings for the dashboard server.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Bind address (default: 127.0.0.1).
    pub bind: String,
    /// Port (default: 8050).
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8050,
        }
    }
}

/// Immutable state shared with the serve loop.
struct DashboardState {
    page: String,
    summary_json: String,
    critical: Vec<CriticalEvent>,
}

/// Handle to the running dashboard HTTP server.
pub struct DashboardServer {
    shutdown: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
    addr: SocketAddr,
}

impl DashboardServer {
    /// Render the page, bind the socket, and start serving on a background
    /// thread.
    pub fn start(
        config: &DashboardConfig,
        result: &AggregationResult,
        critical: Vec<CriticalEvent>,
        options: &DashboardOptions,
    ) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
            .parse()
            .map_err(|e| Error::DashboardBind {
                addr: format!("{}:{}", config.bind, config.port),
                reason: format!("invalid bind address: {e}"),
            })?;

        let page = render_dashboard(result, options).map_err(|e| Error::Render(e.to_string()))?;
        let summary_json = serde_json::to_string(&json!({
            "schema_version": SCHEMA_VERSION,
            "summary": result,
        }))?;

        let server = tiny_http::Server::http(addr).map_err(|e| Error::DashboardBind {
            addr: addr.to_string(),
            reason: e.to_string(),
        })?;

        info!(addr = %addr, "dashboard server started");

        let state = Arc::new(DashboardState {
            page,
            summary_json,
            critical,
        });

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let thread = thread::Builder::new()
            .name("adt-dashboard".to_string())
            .spawn(move || {
                serve_loop(server, &state, &shutdown_clone);
            })
            .map_err(|e| Error::DashboardBind {
                addr: addr.to_string(),
                reason: format!("failed to spawn server thread: {e}"),
            })?;

        Ok(Self {
            shutdown,
            thread: Some(thread),
            addr,
        })
    }

    /// The bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Shut down the server and wait for the serve loop to exit.
    pub fn shutdown(mut self) {
        self.stop();
        info!("dashboard server stopped");
    }

    /// Block the calling thread until the serve loop exits.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }

    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        // Dummy connection to unblock the accept loop
        let _ = std::net::TcpStream::connect(self.addr);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for DashboardServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn serve_loop(server: tiny_http::Server, state: &DashboardState, shutdown: &AtomicBool) {
    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        // Accept with timeout so the shutdown flag is checked regularly
        let request = match server.recv_timeout(std::time::Duration::from_secs(1)) {
            Ok(Some(req)) => req,
            Ok(None) => continue,
            Err(e) => {
                if !shutdown.load(Ordering::SeqCst) {
                    error!(error = %e, "dashboard server accept error");
                }
                break;
            }
        };

        if shutdown.load(Ordering::SeqCst) {
            let _ = request
                .respond(tiny_http::Response::from_string("shutting down").with_status_code(503));
            break;
        }

        let url = request.url().to_string();
        debug!(method = %request.method(), url = %url, "dashboard request");

        let (path, query) = match url.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (url.as_str(), None),
        };

        match path {
            "/" | "/index.html" => {
                respond(request, &state.page, "text/html; charset=utf-8", 200);
            }
            "/api/summary" => {
                respond(
                    request,
                    &state.summary_json,
                    "application/json; charset=utf-8",
                    200,
                );
            }
            "/api/user-events" => match query.and_then(|q| query_param(q, "user")) {
                Some(user) => {
                    let rows = rows_for_user(&state.critical, &user);
                    match serde_json::to_string(&json!({
                        "schema_version": SCHEMA_VERSION,
                        "user": user,
                        "rows": rows,
                    })) {
                        Ok(body) => {
                            respond(request, &body, "application/json; charset=utf-8", 200)
                        }
                        Err(e) => {
                            error!(error = %e, "failed to serialize drill-down rows");
                            respond(request, "internal error", "text/plain", 500);
                        }
                    }
                }
                None => {
                    respond(
                        request,
                        r#"{"error":"missing required query parameter 'user'"}"#,
                        "application/json; charset=utf-8",
                        400,
                    );
                }
            },
            "/health" | "/healthz" => {
                respond(request, "ok", "text/plain", 200);
            }
            _ => {
                respond(request, "not found", "text/plain", 404);
            }
        }
    }
}

fn respond(request: tiny_http::Request, body: &str, content_type: &str, status: u16) {
    let response = tiny_http::Response::from_string(body).with_status_code(status);
    let response = match format!("Content-Type: {content_type}").parse::<tiny_http::Header>() {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    };
    if let Err(e) = request.respond(response) {
        warn!(error = %e, "failed to send dashboard response");
    }
}

/// Extract and percent-decode one parameter from a query string.
fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == name {
            Some(percent_decode(value))
        } else {
            None
        }
    })
}

/// Decode %XX escapes and '+' as space. Invalid escapes pass through
/// verbatim.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = [bytes[i + 1], bytes[i + 2]];
                match std::str::from_utf8(&hex)
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
