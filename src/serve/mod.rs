//! `tiny_http` host for the asset middleware.
//!
//! Requests are handled on a rayon pool. Pass-through requests go to a
//! fallback handler; asset errors are logged and answered with a plain-text
//! error page.
//!
//! ```ignore
//! let middleware = Arc::new(Middleware::from_config(&config)?);
//! let server = bind("127.0.0.1".parse()?, 8080, middleware)?;
//! server.run(serve::not_found)?;
//! ```

mod response;

pub use response::{build_headers, error_response, not_found, respond, status_for};

use crate::log;
use crate::middleware::{Middleware, Request as AssetRequest};
use crate::response::HttpResponse;
use anyhow::{Context, Result, anyhow};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Default size of the request pool.
pub const DEFAULT_THREADS: usize = 4;

impl AssetRequest for Request {
    fn path(&self) -> &str {
        self.url()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers()
            .iter()
            .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

/// Bound server ready to accept requests.
pub struct AssetServer {
    server: Arc<Server>,
    addr: SocketAddr,
    middleware: Arc<Middleware>,
    threads: usize,
}

/// Bind to `interface:port`, trying the next ports when it is taken.
pub fn bind(interface: IpAddr, port: u16, middleware: Arc<Middleware>) -> Result<AssetServer> {
    let (server, addr) = bind_with_retry(interface, port)?;
    log!("serve"; "http://{}", addr);

    Ok(AssetServer {
        server: Arc::new(server),
        addr,
        middleware,
        threads: DEFAULT_THREADS,
    })
}

fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                // port 0 binds an ephemeral port
                let addr = server.server_addr().to_ip().unwrap_or(addr);
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

impl AssetServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Server handle, e.g. to `unblock` the request loop from another thread.
    pub fn handle(&self) -> Arc<Server> {
        Arc::clone(&self.server)
    }

    /// Run the request loop until the server is unblocked.
    pub fn run<F>(self, fallback: F) -> Result<()>
    where
        F: Fn(&Request) -> HttpResponse + Send + Sync + 'static,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .context("failed to create thread pool")?;
        let fallback = Arc::new(fallback);

        for request in self.server.incoming_requests() {
            let middleware = Arc::clone(&self.middleware);
            let fallback = Arc::clone(&fallback);
            pool.spawn(move || {
                if let Err(e) = handle_request(request, &middleware, &*fallback) {
                    log!("serve"; "request error: {e:#}");
                }
            });
        }
        Ok(())
    }
}

/// Handle a single HTTP request.
pub fn handle_request(
    request: Request,
    middleware: &Middleware,
    fallback: &dyn Fn(&Request) -> HttpResponse,
) -> Result<()> {
    let response = match middleware.handle(&request, |r| fallback(r)) {
        Ok(response) => response,
        Err(e) => {
            log!("error"; "{}: {}", request.url(), e);
            error_response(&e)
        }
    };
    respond(request, response)
}
