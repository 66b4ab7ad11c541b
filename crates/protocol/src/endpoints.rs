//! Endpoint paths relative to the service base URL.
//!
//! Remote paths are embedded in the URL path, so every segment is
//! percent-encoded; slashes are preserved as separators.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped inside a path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn encode_path(remote: &str) -> String {
    remote
        .split('/')
        .map(|seg| utf8_percent_encode(seg, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// `POST upload/?force={bool}` — both the preflight and the body phase.
pub fn upload(force: bool) -> String {
    format!("upload/?force={force}")
}

/// `GET download/{path}`.
pub fn download(remote: &str) -> String {
    format!("download/{}", encode_path(remote))
}

/// `GET ls/{path}/?verbose={bool}`.
pub fn ls(remote: &str, verbose: bool) -> String {
    format!("ls/{}/?verbose={verbose}", encode_path(remote))
}

/// `DELETE delete/{path}`.
pub fn delete(remote: &str) -> String {
    format!("delete/{}", encode_path(remote))
}
