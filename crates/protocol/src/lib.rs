//! Wire-level types and constants for the depot storage protocol.
//!
//! Everything here is transport-agnostic: listing records as the server
//! serializes them, the header set carried by upload requests, and the
//! endpoint paths relative to the service base URL.

pub mod endpoints;
pub mod headers;
mod types;

pub use types::{EntryKind, RemoteEntry, TransferRequest};
