//! Two-phase upload negotiation.
//!
//! An upload is a headers-only preflight followed by the body stream,
//! modeled as an explicit state machine so the invariant "no body after
//! a rejected preflight" is enforced by construction rather than by
//! call-site discipline.

use depot_protocol::{TransferRequest, endpoints, headers};
use tracing::debug;

use crate::error::ClientError;
use crate::transport::{ByteStream, Method, RequestBody, Transport, TransportRequest};

/// Phase of a two-step upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPhase {
    /// Headers-only preflight not yet accepted.
    Negotiating,
    /// Preflight accepted; the body may be streamed.
    Sending,
    /// Body accepted by the server.
    Done,
    /// Either phase was rejected.
    Failed,
}

/// Two-phase upload negotiation against a [`Transport`].
///
/// The preflight carries the declared size, destination name and
/// archive flag, letting the server reject early (quota, conflict
/// without overwrite, invalid name) before any payload bytes move.
pub struct Negotiation<'a> {
    transport: &'a dyn Transport,
    request: &'a TransferRequest,
    phase: SendPhase,
}

impl<'a> Negotiation<'a> {
    pub fn new(transport: &'a dyn Transport, request: &'a TransferRequest) -> Self {
        Self {
            transport,
            request,
            phase: SendPhase::Negotiating,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SendPhase {
        self.phase
    }

    /// Runs the headers-only preflight.
    ///
    /// On rejection the negotiation moves to [`SendPhase::Failed`] and
    /// the body can no longer be sent.
    pub async fn preflight(&mut self) -> Result<(), ClientError> {
        let req = TransportRequest {
            method: Method::Post,
            path: endpoints::upload(self.request.overwrite),
            headers: self.upload_headers(true),
            body: RequestBody::Empty,
        };

        let resp = self.transport.send(req).await?;
        if !resp.is_success() {
            self.phase = SendPhase::Failed;
            let status = resp.status;
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Upload { status, message });
        }

        debug!(
            destination = %self.request.destination_path,
            size = self.request.size_bytes,
            "preflight accepted"
        );
        self.phase = SendPhase::Sending;
        Ok(())
    }

    /// Streams the body. Only legal after a successful preflight.
    pub async fn send_body(&mut self, body: ByteStream) -> Result<(), ClientError> {
        if self.phase != SendPhase::Sending {
            return Err(ClientError::InvalidArgument(
                "upload body requires an accepted preflight".into(),
            ));
        }

        let req = TransportRequest {
            method: Method::Post,
            path: endpoints::upload(self.request.overwrite),
            headers: self.upload_headers(false),
            body: RequestBody::Stream {
                stream: body,
                len: self.request.size_bytes,
            },
        };

        let resp = self.transport.send(req).await?;
        if resp.status != 200 {
            self.phase = SendPhase::Failed;
            let status = resp.status;
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Upload { status, message });
        }

        self.phase = SendPhase::Done;
        Ok(())
    }

    fn upload_headers(&self, preflight: bool) -> Vec<(String, String)> {
        let mut out = vec![
            (
                headers::CONTENT_DISPOSITION.to_string(),
                headers::content_disposition(&self.request.destination_path),
            ),
            (
                headers::X_FILE_SIZE.to_string(),
                self.request.size_bytes.to_string(),
            ),
        ];
        if self.request.is_archive {
            out.push((headers::X_IS_ARCHIVE.to_string(), "true".to_string()));
        }
        if preflight {
            out.push((
                headers::X_EXPECT.to_string(),
                headers::EXPECT_CONTINUE.to_string(),
            ));
        }
        out
    }
}
