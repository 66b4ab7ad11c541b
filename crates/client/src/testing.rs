//! Scripted transport mock shared by the unit tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use bytes::Bytes;
use futures_util::StreamExt;

use crate::transport::{
    Method, RequestBody, Transport, TransportError, TransportRequest, TransportResponse,
};

/// A request as the mock saw it, body fully drained.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Builds a scripted response with the given status and body.
pub fn scripted(status: u16, body: &[u8]) -> TransportResponse {
    let chunk: std::io::Result<Bytes> = Ok(Bytes::copy_from_slice(body));
    TransportResponse {
        status,
        content_length: Some(body.len() as u64),
        body: Box::pin(futures_util::stream::iter(vec![chunk])),
    }
}

/// Transport that answers from a scripted response queue and records
/// every request it receives, draining request bodies so tests can
/// assert on the exact bytes that would have crossed the wire.
pub struct MockTransport {
    responses: Mutex<Vec<TransportResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new(responses: Vec<TransportResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// All requests seen so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn send(
        &self,
        req: TransportRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + '_>> {
        Box::pin(async move {
            let body = match req.body {
                RequestBody::Empty => Vec::new(),
                RequestBody::Stream { mut stream, .. } => {
                    let mut buf = Vec::new();
                    while let Some(chunk) = stream.next().await {
                        let chunk = chunk.map_err(TransportError::Body)?;
                        buf.extend_from_slice(&chunk);
                    }
                    buf
                }
            };

            self.calls.lock().unwrap().push(RecordedCall {
                method: req.method,
                path: req.path,
                headers: req.headers,
                body,
            });

            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(scripted(500, b"unscripted request"))
            } else {
                Ok(responses.remove(0))
            }
        })
    }
}
