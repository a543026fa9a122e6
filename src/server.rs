//! HTTP server lifecycle.
//!
//! A [`Server`] owns the listening socket from [`Server::bind`] until
//! shutdown. Shutdown is abrupt by contract:
//! 1. `listener.accept()` stops immediately and the socket is closed.
//! 2. Every open connection task is aborted, closing its connection.
//! 3. [`Server::serve`] returns and `main` exits the process.
//!
//! Signal handling is not baked in: [`Server::serve_with_shutdown`] takes any
//! future, [`Server::serve`] plugs in [`shutdown_signal`], and
//! [`Server::start`] hands back a [`RunningServer`] that stops on demand.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::middleware::trace::{AccessLog, trace};
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;

/// The HTTP server: a bound listening socket waiting for a router.
pub struct Server {
    listener: TcpListener,
    addr: SocketAddr,
}

impl Server {
    /// Binds the listening socket. Failing to bind is the one fatal startup
    /// error; callers are expected to abort on it.
    ///
    /// ```rust,no_run
    /// # async fn run() -> Result<(), pantry::Error> {
    /// let server = pantry::Server::bind("0.0.0.0:3000").await?;
    /// # Ok(()) }
    /// ```
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, Error> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        Ok(Self { listener, addr })
    }

    /// The bound address. Binding port 0 resolves to the port the OS picked.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serves `router` until SIGINT or SIGTERM.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Serves `router` until `signal` resolves, then closes the listener and
    /// every open connection.
    pub async fn serve_with_shutdown<S>(self, router: Router, signal: S) -> Result<(), Error>
    where
        S: Future<Output = ()>,
    {
        let Self { listener, addr } = self;
        let router = Arc::new(router);

        info!(%addr, "pantry listening");

        let mut tasks = JoinSet::new();

        tokio::pin!(signal);

        loop {
            tokio::select! {
                // Check the signal first so shutdown wins over a queue of
                // pending connections.
                biased;

                () = &mut signal => {
                    info!(open = tasks.len(), "shutdown requested, closing connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, peer) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on the connection.
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            async move { dispatch(router, req, peer).await }
                        });

                        // HTTP/1.1 or HTTP/2, whatever the client negotiates.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            debug!(%peer, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet stays small.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        drop(listener);
        // Aborting a task drops its connection, which closes the socket.
        tasks.shutdown().await;

        info!("pantry stopped");
        Ok(())
    }

    /// Serves `router` on a background task and returns a handle to stop it.
    pub fn start(self, router: Router) -> RunningServer {
        let (stop, stopped) = oneshot::channel::<()>();
        let addr = self.addr;
        // A dropped handle closes the channel, which also stops the server.
        let task = tokio::spawn(self.serve_with_shutdown(router, async move {
            let _ = stopped.await;
        }));
        RunningServer { addr, stop, task }
    }
}

/// A server serving on a background task.
pub struct RunningServer {
    addr: SocketAddr,
    stop: oneshot::Sender<()>,
    task: JoinHandle<Result<(), Error>>,
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops accepting, closes every open connection and waits for the
    /// serving task to finish.
    pub async fn stop(self) -> Result<(), Error> {
        let _ = self.stop.send(());
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(Error::Io(std::io::Error::other(e))),
        }
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Collects the body, routes one request through the access log and produces
/// one response. Every failure becomes a response, so hyper never sees an error.
async fn dispatch(
    router: Arc<Router>,
    req: hyper::Request<hyper::body::Incoming>,
    peer: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let entry = AccessLog {
        peer: Some(peer),
        method: parts.method.as_str(),
        path: parts.uri.path(),
        version: parts.version,
    };

    let response = trace(entry, async {
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                warn!(%peer, "failed to read request body: {e}");
                return Response::status(Status::BadRequest);
            }
        };
        let req = Request::new(parts.method.as_str().parse().ok(), parts.uri.path(), body);
        router.dispatch(req).await
    })
    .await;

    Ok(response.into_inner())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first SIGINT (Ctrl-C) or, on Unix, SIGTERM.
///
/// If a handler cannot be installed the failure is logged and that signal
/// simply never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => info!("received SIGINT"),
        () = sigterm => info!("received SIGTERM"),
    }
}
