//! reqwest-backed [`Transport`] implementation.

use std::future::Future;
use std::io;
use std::pin::Pin;

use futures_util::TryStreamExt;

use crate::transport::{
    Method, RequestBody, Transport, TransportError, TransportRequest, TransportResponse,
};

/// Connection settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service base URL, e.g. `https://storage.example.com/`.
    pub base_url: String,
    /// Bearer token attached to every request. Token acquisition and
    /// refresh are the host's concern.
    pub token: String,
}

/// Production transport over HTTP.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: reqwest::Url,
    token: String,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        // A trailing slash makes relative joins behave like the service
        // expects (`upload/` under the base, not replacing its last
        // segment).
        let base = if config.base_url.ends_with('/') {
            config.base_url
        } else {
            format!("{}/", config.base_url)
        };
        let base_url =
            reqwest::Url::parse(&base).map_err(|e| TransportError::Url(e.to_string()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token: config.token,
        })
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        req: TransportRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + '_>> {
        Box::pin(async move {
            let url = self
                .base_url
                .join(&req.path)
                .map_err(|e| TransportError::Url(e.to_string()))?;

            let mut builder = match req.method {
                Method::Get => self.http.get(url),
                Method::Post => self.http.post(url),
                Method::Delete => self.http.delete(url),
            };
            builder = builder.bearer_auth(&self.token);
            for (name, value) in &req.headers {
                builder = builder.header(name, value);
            }
            match req.body {
                RequestBody::Empty => {}
                RequestBody::Stream { stream, len } => {
                    builder = builder
                        .header(reqwest::header::CONTENT_LENGTH, len)
                        .body(reqwest::Body::wrap_stream(stream));
                }
            }

            let resp = builder.send().await?;
            let status = resp.status().as_u16();
            let content_length = resp.content_length();
            let body = resp.bytes_stream().map_err(io::Error::other);

            Ok(TransportResponse {
                status,
                content_length,
                body: Box::pin(body),
            })
        })
    }
}
