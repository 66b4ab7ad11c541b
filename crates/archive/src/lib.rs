//! Directory archiving for transfer.
//!
//! Directories cross the wire as a single packed stream. This crate
//! provides the [`Archiver`] seam (pack a tree into one file, unpack one
//! file into a tree), the default tar.gz codec, and the scoped
//! [`ArchiveArtifact`] temp file that is guaranteed to be removed when
//! the owning operation ends.

use std::path::Path;

mod artifact;
mod targz;

pub use artifact::ArchiveArtifact;
pub use targz::TarGzArchiver;

/// File-name suffix for directory archives.
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// Errors produced while packing or unpacking directory archives.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to pack directory {dir}: {reason}")]
    Pack { dir: String, reason: String },

    #[error("failed to unpack archive {archive}: {reason}")]
    Unpack { archive: String, reason: String },

    #[error("path has no usable file name: {0}")]
    InvalidPath(String),
}

/// Packs directories into single-file archives and back.
///
/// The transfer core only depends on these two operations, not on the
/// encoding; [`TarGzArchiver`] is the default implementation and tests
/// substitute failing or recording fakes.
pub trait Archiver: Send + Sync {
    /// Packs the full contents of `dir` (recursively, preserving relative
    /// structure) into the file at `dest`.
    fn pack(&self, dir: &Path, dest: &Path) -> Result<(), ArchiveError>;

    /// Unpacks the archive at `archive` into `dest_dir`, creating the
    /// directory if absent.
    fn unpack(&self, archive: &Path, dest_dir: &Path) -> Result<(), ArchiveError>;
}
