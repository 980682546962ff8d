//! HTTP server for the audit API
//!
//! Listens on `127.0.0.1:5000` by default (configurable) and serves every
//! connection on its own task until the shutdown token is cancelled.

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::handler::ApiHandler;

/// HTTP server exposing the audit API
pub struct ApiServer {
    handler: Arc<ApiHandler>,
    addr: SocketAddr,
}

impl ApiServer {
    /// Creates a new `ApiServer`.
    ///
    /// # Arguments
    /// * `handler` - The request handler shared by all connections
    /// * `endpoint` - Address to bind, e.g. `"127.0.0.1:5000"`
    pub fn new(handler: Arc<ApiHandler>, endpoint: &str) -> anyhow::Result<Self> {
        let addr: SocketAddr = endpoint.parse()?;
        Ok(Self { handler, addr })
    }

    /// Binds the configured address and serves until `shutdown` is cancelled.
    pub async fn run(&self, shutdown: CancellationToken) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        serve(listener, Arc::clone(&self.handler), shutdown).await
    }
}

/// Serves connections accepted on `listener` until `shutdown` is cancelled.
///
/// Connections already in flight finish on their own tasks.
pub async fn serve(
    listener: TcpListener,
    handler: Arc<ApiHandler>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    info!(addr = %listener.local_addr()?, "Audit API listening");

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer) = result?;
                let io = TokioIo::new(stream);
                let handler = Arc::clone(&handler);

                tokio::spawn(async move {
                    let service = service_fn(move |req| {
                        let handler = Arc::clone(&handler);
                        async move { Ok::<_, hyper::Error>(handler.handle(req).await) }
                    });

                    if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                        error!(error = %e, peer = %peer, "Audit API connection error");
                    }
                });
            }
            _ = shutdown.cancelled() => {
                info!("Audit API shutting down");
                break;
            }
        }
    }

    Ok(())
}
