//! Client for the depot object-storage service.
//!
//! Transfers files and whole directories over an HTTP-style protocol:
//! chunked streaming upload and download with progress reporting,
//! directory archiving (trees travel as a single tar.gz object),
//! listing and deletion.
//!
//! # Pipeline
//!
//! An upload classifies the source path, packs directories into a
//! temporary sibling archive, then runs a two-phase send: a
//! headers-only preflight the server can reject cheaply, followed by
//! the chunked body. A download mirrors it: the remote path is
//! classified from its listing shape, streamed to disk, and unpacked if
//! it was a directory. Temporary archives are removed on every exit
//! path.
//!
//! Transport (HTTP details) and the archive codec are trait seams;
//! [`HttpTransport`] and [`TarGzArchiver`] are the defaults.

mod classify;
mod client;
mod error;
mod http;
mod negotiation;
#[cfg(test)]
mod testing;
mod transport;

pub use classify::{PathKind, basename, classify_local, classify_remote};
pub use client::{DepotClient, DownloadOptions, UploadOptions};
pub use error::ClientError;
pub use http::{ClientConfig, HttpTransport};
pub use negotiation::{Negotiation, SendPhase};
pub use transport::{
    ByteStream, Method, RequestBody, Transport, TransportError, TransportRequest,
    TransportResponse,
};

// Collaborator seams hosts implement or configure.
pub use depot_archive::{ArchiveError, Archiver, TarGzArchiver};
pub use depot_protocol::{EntryKind, RemoteEntry, TransferRequest};
pub use depot_transfer::{
    ByteCounter, CHUNK_SIZE, NullSink, ProgressSink, SpeedCalculator, TransferError,
};
