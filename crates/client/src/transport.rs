//! Abstract request/response transport to the storage service.
//!
//! The client core never talks HTTP directly; it builds
//! [`TransportRequest`]s and hands them to a [`Transport`]. The
//! reqwest-backed [`HttpTransport`](crate::HttpTransport) is the
//! production implementation; tests substitute scripted mocks so the
//! orchestration logic (preflight gating, error mapping, cleanup) can be
//! exercised without a network.

use std::future::Future;
use std::io;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};

/// Boxed stream of body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + 'static>>;

/// HTTP-style method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

/// Body of an outgoing request.
pub enum RequestBody {
    /// No body (GET, DELETE, the headers-only preflight POST).
    Empty,
    /// Streamed body with its exact length known up front.
    Stream { stream: ByteStream, len: u64 },
}

/// An outgoing request, addressed relative to the service base URL.
pub struct TransportRequest {
    pub method: Method,
    /// Path and query relative to the base URL, e.g. `upload/?force=false`.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

/// A response from the service.
pub struct TransportResponse {
    pub status: u16,
    pub content_length: Option<u64>,
    pub body: ByteStream,
}

impl TransportResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Collects the whole body as text (listings, server diagnostics).
    pub async fn text(self) -> io::Result<String> {
        let mut body = self.body;
        let mut buf = Vec::new();
        while let Some(chunk) = body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Request/response transport to the storage service.
///
/// Connection pooling, TLS and socket-level policy all live behind this
/// seam; the core only sees request/response semantics.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        req: TransportRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + '_>>;
}

/// Transport-level failures (before any protocol status is available).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(String),

    #[error("request body error: {0}")]
    Body(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with(status: u16, body: &[u8]) -> TransportResponse {
        let chunk: io::Result<Bytes> = Ok(Bytes::copy_from_slice(body));
        TransportResponse {
            status,
            content_length: Some(body.len() as u64),
            body: Box::pin(futures_util::stream::iter(vec![chunk])),
        }
    }

    #[tokio::test]
    async fn text_collects_chunks() {
        let resp = TransportResponse {
            status: 200,
            content_length: None,
            body: Box::pin(futures_util::stream::iter(vec![
                Ok(Bytes::from_static(b"hello ")),
                Ok(Bytes::from_static(b"world")),
            ])),
        };
        assert_eq!(resp.text().await.unwrap(), "hello world");
    }

    #[test]
    fn success_range() {
        assert!(response_with(200, b"").is_success());
        assert!(response_with(204, b"").is_success());
        assert!(!response_with(404, b"").is_success());
        assert!(!response_with(500, b"").is_success());
    }
}
