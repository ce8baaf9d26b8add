//! Pushes a metric snapshot to the server, one request per metric.
//!
//! Pushes are best-effort: a failure is logged, that metric is skipped,
//! and nothing is retried. One HTTP/1.1 connection is kept across pushes
//! and replaced whenever it turns out to be closed.

use crate::metric::{MetricKind, MetricSet};
use crate::protocol::update_path;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::client::conn::http1::{self, SendRequest};
use hyper::header::{CONNECTION, CONTENT_TYPE, HOST};
use hyper::{Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tracing::{debug, warn};

/// Errors from a single metric push.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("failed to connect to server: {0}")]
    Connect(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(#[from] hyper::http::Error),

    #[error("server responded with {0}")]
    Status(StatusCode),
}

/// Outcome of one report tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Metrics accepted by the server.
    pub sent: usize,
    /// Metrics whose push failed.
    pub failed: usize,
}

/// HTTP client for the update protocol.
pub struct Reporter {
    /// Server address, `host:port`.
    address: String,
    /// Connection kept from the previous push, if any.
    sender: Option<SendRequest<Empty<Bytes>>>,
}

impl Reporter {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            sender: None,
        }
    }

    /// Server address this reporter pushes to.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Push every gauge and counter in `set`.
    ///
    /// A failed push never stops the remaining ones.
    pub async fn report(&mut self, set: &MetricSet) -> ReportSummary {
        let mut summary = ReportSummary::default();

        for (kind, name, value) in set.entries() {
            match self.push(kind, name, &value).await {
                Ok(()) => summary.sent += 1,
                Err(e) => {
                    warn!(
                        server = %self.address,
                        kind = %kind,
                        name = %name,
                        error = %e,
                        "failed to push metric"
                    );
                    summary.failed += 1;
                }
            }
        }

        summary
    }

    /// Push a single metric.
    pub async fn push(&mut self, kind: MetricKind, name: &str, value: &str) -> Result<(), PushError> {
        let req = Request::builder()
            .method(Method::POST)
            .uri(update_path(kind, name, value))
            .header(HOST, self.address.as_str())
            .header(CONTENT_TYPE, "text/plain")
            .body(Empty::<Bytes>::new())?;

        let mut sender = self.take_sender().await?;
        let response = sender.send_request(req).await?;
        let status = response.status();
        let keep_alive = !response
            .headers()
            .get(CONNECTION)
            .is_some_and(|v| v.as_bytes().eq_ignore_ascii_case(b"close"));

        // Drain the body so the connection can carry the next push.
        match response.into_body().collect().await {
            Ok(_) if keep_alive => self.sender = Some(sender),
            Ok(_) => {}
            Err(e) => debug!(error = %e, "failed to read response body"),
        }

        if status.is_success() {
            Ok(())
        } else {
            Err(PushError::Status(status))
        }
    }

    /// Reuse the kept connection if it is still usable, otherwise open a
    /// new one.
    async fn take_sender(&mut self) -> Result<SendRequest<Empty<Bytes>>, PushError> {
        if let Some(mut sender) = self.sender.take() {
            if sender.ready().await.is_ok() {
                return Ok(sender);
            }
        }
        self.connect().await
    }

    async fn connect(&self) -> Result<SendRequest<Empty<Bytes>>, PushError> {
        let stream = TcpStream::connect(self.address.as_str()).await?;
        if let Err(e) = stream.set_nodelay(true) {
            warn!(error = %e, "failed to set TCP_NODELAY on server connection");
        }

        let (sender, conn) = http1::handshake(TokioIo::new(stream)).await?;

        // Spawn connection driver
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                debug!(error = %e, "server connection closed");
            }
        });

        Ok(sender)
    }
}
