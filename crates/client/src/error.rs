//! Client error taxonomy.

use depot_archive::ArchiveError;
use depot_transfer::TransferError;

use crate::transport::TransportError;

/// Errors surfaced by [`DepotClient`](crate::DepotClient) operations.
///
/// Every failure is propagated; cleanup of temporary artifacts is
/// best-effort and never replaces the error that triggered it.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Local source missing, or the remote path answered 404.
    #[error("not found: {0}")]
    NotFound(String),

    /// Conflicting inputs, e.g. a destination file name for a directory
    /// upload.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("upload failed: {status} {message}")]
    Upload { status: u16, message: String },

    #[error("download failed: {status} {message}")]
    Download { status: u16, message: String },

    #[error("listing failed: {status} {message}")]
    List { status: u16, message: String },

    #[error("delete failed: {status} {message}")]
    Delete { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid listing response: {0}")]
    ListingFormat(#[from] serde_json::Error),
}
