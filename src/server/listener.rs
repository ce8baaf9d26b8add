//! Metrics server listener.
//!
//! Accepts connections and serves each one on its own task.

use crate::server::handle_request;
use crate::storage::Storage;
use crate::util::RequestId;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info, Instrument};

/// HTTP server exposing a [`Storage`] over the update protocol.
pub struct MetricsServer {
    /// Bound listener.
    listener: TcpListener,
    /// Shared metric store.
    storage: Arc<dyn Storage>,
}

impl MetricsServer {
    /// Bind the server to `address` (`host:port`).
    pub async fn bind(address: &str, storage: Arc<dyn Storage>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(address).await?;

        info!(address = %address, local_addr = ?listener.local_addr().ok(), "metrics server bound");

        Ok(Self { listener, storage })
    }

    /// Address the server is actually listening on.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the server, accepting connections until shutdown.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        info!("metrics server started");

        loop {
            tokio::select! {
                accept_result = self.listener.accept() => {
                    match accept_result {
                        Ok((stream, addr)) => {
                            self.handle_connection(stream, addr);
                        }
                        Err(e) => {
                            error!(error = %e, "failed to accept connection");
                        }
                    }
                }

                _ = shutdown.recv() => {
                    info!("metrics server shutting down");
                    break;
                }
            }
        }
    }

    /// Serve one client connection on a background task.
    fn handle_connection(&self, stream: TcpStream, client_addr: SocketAddr) {
        let storage = Arc::clone(&self.storage);
        let request_id = RequestId::short();
        let span = tracing::debug_span!("connection", id = %request_id, client = %client_addr);

        tokio::spawn(
            async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| {
                    let storage = Arc::clone(&storage);
                    async move { handle_request(req, storage.as_ref()).await }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    debug!(error = %e, "connection error");
                }
            }
            .instrument(span),
        );
    }
}
