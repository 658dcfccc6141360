//! HTTP server: accept loop, request dispatch, graceful shutdown.
//!
//! Shutdown is shaped for orchestrated deployments. Kubernetes delivers
//! **SIGTERM** first and SIGKILLs after `terminationGracePeriodSeconds`
//! (30 s by default); on SIGTERM the server stops accepting, lets every
//! in-flight connection finish, and returns from [`Server::serve`] so `main`
//! can exit on its own terms. Give the grace period more headroom than your
//! slowest request and the SIGKILL never fires.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::error::Error;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::state::AppState;
use crate::status::Status;

/// The HTTP server.
pub struct Server {
    listener: TcpListener,
}

impl Server {
    /// Binds the listener immediately, so `bind("127.0.0.1:0")` followed by
    /// [`local_addr`](Server::local_addr) gives you an ephemeral port — handy
    /// in tests.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # async fn run() -> Result<(), chirpd::Error> {
    /// use chirpd::Server;
    /// let server = Server::bind("0.0.0.0:8080").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn bind(addr: &str) -> Result<Self, Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener })
    }

    /// The address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Starts accepting connections and dispatching them through `router`,
    /// handing each handler a clone of `state`.
    ///
    /// Does not return until shutdown completes: a signal arrives and every
    /// in-flight request has been answered.
    pub async fn serve(self, router: Router, state: Arc<AppState>) -> Result<(), Error> {
        let addr = self.listener.local_addr()?;

        // One routing table, shared by every connection task.
        let router = Arc::new(router);

        info!(addr = %addr, "chirpd listening");

        // Connection tasks land in a JoinSet; shutdown drains it.
        let mut tasks = tokio::task::JoinSet::new();

        // The signal future is polled across loop iterations, so it must be
        // pinned once out here rather than recreated per pass.
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Poll in declaration order. The shutdown arm sits first so a
                // signal wins over any connection already queued on the
                // listener backlog.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = self.listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let state = Arc::clone(&state);
                    // Bridge tokio's stream into the hyper IO traits.
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // The service closure runs once per request on this
                        // connection, so it clones its own handles each time.
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            let state = Arc::clone(&state);
                            async move { dispatch(router, state, req).await }
                        });

                        // auto::Builder speaks HTTP/1.1 or HTTP/2, whichever
                        // the client negotiated.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished tasks as we go; otherwise the JoinSet grows
                // for the lifetime of the process.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        // Accept loop is done; wait out whatever is still in flight.
        while tasks.join_next().await.is_some() {}

        info!("chirpd stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Hot path: one request in, one response and one trace line out.
///
/// Every failure mode is expressed as a response (404, 405, 400), so the
/// error type is [`Infallible`](std::convert::Infallible) and hyper never
/// sees an `Err`.
async fn dispatch(
    router: Arc<Router>,
    state: Arc<AppState>,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let raw_method = req.method().clone();
    let path = req.uri().path().to_owned();

    let response = route(router, state, req, &path).await;

    info!(
        method = %raw_method,
        path = %path,
        status = response.status.code(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );

    Ok(response.into_http())
}

async fn route(
    router: Arc<Router>,
    state: Arc<AppState>,
    req: hyper::Request<hyper::body::Incoming>,
    path: &str,
) -> Response {
    // hyper accepts extension methods (PROPFIND, …) that this router does not
    // route. Treat them like any other method with no registered handler.
    let method = match req.method().as_str().parse::<Method>() {
        Ok(m) => m,
        Err(_) => return Response::status(Status::MethodNotAllowed),
    };

    let (handler, params) = match router.lookup(method, path) {
        Some(hit) => hit,
        None => return Response::status(Status::NotFound),
    };

    // Collect the whole body up front. Handlers deal in bytes, not streams —
    // every payload this API accepts is tiny.
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            warn!("failed to read request body: {e}");
            return Response::status(Status::BadRequest);
        }
    };

    let request = Request::new(method, path.to_owned(), body, params);
    handler.call(state, request).await
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves when the process is asked to stop: **SIGTERM** (what the
/// orchestrator sends) or **SIGINT** (Ctrl-C in a terminal). Off Unix, only
/// Ctrl-C exists.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    // A never-resolving stand-in keeps the select! shape on non-Unix targets.
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
