//! Loopback static file server for the smoke test
//!
//! Serves the repository root over plain HTTP so the site bundle is
//! reachable under `/site/`, on an OS-assigned ephemeral port. The server is
//! a scoped resource: [`SiteServer::start`] binds the listener before it
//! returns (connections queue in the TCP backlog until the accept loop
//! spins up, so no readiness sleep is needed) and [`SiteServer::stop`] /
//! `Drop` guarantee the port is released on every exit path.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Router,
    body::Body,
    extract::{Request, State},
    http::{Method, StatusCode, header},
    middleware::{self, Next},
    response::Response,
};
use camino::{Utf8Path, Utf8PathBuf};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// How long to wait for the accept loop to drain after a shutdown signal.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// A running loopback file server rooted at the repository root.
///
/// Owns its own tokio runtime so the caller can stay synchronous; dropping
/// the value stops the server and frees the port.
pub struct SiteServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    served: Option<(tokio::runtime::Runtime, JoinHandle<()>)>,
}

impl SiteServer {
    /// Bind `127.0.0.1:0` and start serving files under `root`.
    pub fn start(root: &Utf8Path) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("sitecheck-serve")
            .enable_all()
            .build()?;

        // Bind before returning: requests issued right after start() queue
        // in the TCP backlog until the accept loop is running.
        let listener = runtime.block_on(TcpListener::bind((Ipv4Addr::LOCALHOST, 0)))?;
        let addr = listener.local_addr()?;

        let app = build_router(root.to_owned());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = runtime.spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = serve.await {
                tracing::error!("site server error: {e}");
            }
        });

        tracing::debug!(%addr, "site server listening");
        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            served: Some((runtime, task)),
        })
    }

    /// Base URL of the running server, e.g. `http://127.0.0.1:49152`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop the server and wait for the listener to close.
    ///
    /// Idempotent; also invoked from `Drop` so the port never outlives the
    /// value, whatever path the smoke test exits through.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some((runtime, task)) = self.served.take() {
            let drained = runtime.block_on(async {
                tokio::time::timeout(SHUTDOWN_TIMEOUT, task).await.is_ok()
            });
            if !drained {
                tracing::warn!("site server did not drain in {SHUTDOWN_TIMEOUT:?}");
            }
            runtime.shutdown_timeout(Duration::from_secs(1));
        }
    }
}

impl Drop for SiteServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Build the axum router: every path falls through to the file handler.
fn build_router(root: Utf8PathBuf) -> Router {
    Router::new()
        .fallback(serve_path)
        .with_state(Arc::new(root))
        .layer(middleware::from_fn(log_requests))
}

/// Map a request path to a file under the root and serve its bytes.
async fn serve_path(State(root): State<Arc<Utf8PathBuf>>, request: Request) -> Response {
    let method = request.method();
    if method != Method::GET && method != Method::HEAD {
        return plain(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
    }

    let uri_path = request.uri().path();
    let Some(path) = resolve(&root, uri_path).await else {
        return plain(StatusCode::NOT_FOUND, "Not Found");
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, mime_for(&path))
            .body(Body::from(bytes))
            .unwrap(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            plain(StatusCode::NOT_FOUND, "Not Found")
        }
        Err(e) => {
            tracing::error!("failed to read {path}: {e}");
            plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

/// Resolve a URL path to an on-disk file, refusing traversal outside the
/// root. Directory requests resolve to their `index.html`.
async fn resolve(root: &Utf8Path, uri_path: &str) -> Option<Utf8PathBuf> {
    let rel = uri_path.trim_start_matches('/');
    if rel.split('/').any(|seg| seg == "..") {
        return None;
    }

    let mut path = root.join(rel);
    let is_dir = match tokio::fs::metadata(path.as_std_path()).await {
        Ok(meta) => meta.is_dir(),
        Err(_) => false,
    };
    if is_dir || rel.is_empty() {
        path.push("index.html");
    }
    Some(path)
}

fn plain(status: StatusCode, body: &'static str) -> Response {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from(body))
        .unwrap()
}

/// Guess a Content-Type from the file extension. Only the types a static
/// game bundle actually contains get a real mapping.
fn mime_for(path: &Utf8Path) -> &'static str {
    match path.extension() {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Request logging middleware, kept at debug so normal smoke test output is
/// a single OK/FAIL line on stdout.
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    tracing::debug!("{} {} -> {} in {:.1}ms", method, path, status, latency_ms);

    response
}
