use serde::{Deserialize, Serialize};

/// Kind of a remote entry as reported by the listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One record in a remote listing.
///
/// `size` is only populated when the listing was requested verbose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Immutable description of one transfer, built before any bytes move.
///
/// `size_bytes` is the exact length of the stream that will cross the
/// wire. It is declared to the server ahead of the body, so it must be
/// computed from the final byte source (the archive artifact for
/// directory transfers, the file itself otherwise).
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    /// Local path the bytes are read from (upload) or remote path they
    /// are fetched from (download).
    pub source_path: String,
    /// Remote destination path (upload) or local destination (download).
    pub destination_path: String,
    /// Whether the payload is a packed directory archive rather than a
    /// literal end-user file.
    pub is_archive: bool,
    /// Exact byte length of the stream.
    pub size_bytes: u64,
    /// Allow the server to replace an existing object.
    pub overwrite: bool,
}
