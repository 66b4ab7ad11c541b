//! Local and remote path classification.
//!
//! Local paths are classified from filesystem metadata. Remote paths
//! carry no explicit directory flag, so they are classified from the
//! shape of their listing: the service answers a file path with a
//! single entry named like the path itself, and anything else is a
//! container.

use std::io;
use std::path::Path;

use depot_protocol::RemoteEntry;

use crate::error::ClientError;

/// Whether a path denotes a single file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}

/// Classifies a local path from metadata, without touching its contents.
///
/// Fails with [`ClientError::NotFound`] if the path does not exist.
pub fn classify_local(path: &Path) -> Result<PathKind, ClientError> {
    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ClientError::NotFound(path.display().to_string()));
        }
        Err(e) => return Err(ClientError::Io(e)),
    };
    Ok(if meta.is_dir() {
        PathKind::Directory
    } else {
        PathKind::File
    })
}

/// Classifies a remote path from the shape of its listing.
///
/// Exactly one entry whose name equals the queried base name means the
/// path is a plain file. Zero entries, several entries, or a single
/// entry under a different name all mean the path is a directory — an
/// empty listing is an empty directory, never not-found (a true missing
/// path already failed the listing call itself with 404).
pub fn classify_remote(listing: &[RemoteEntry], basename: &str) -> PathKind {
    match listing {
        [only] if only.name == basename => PathKind::File,
        _ => PathKind::Directory,
    }
}

/// Final component of a remote path, ignoring a trailing slash.
pub fn basename(remote: &str) -> &str {
    let trimmed = remote.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
