use std::path::{Path, PathBuf};

use crate::{ARCHIVE_SUFFIX, ArchiveError};

/// Scoped temporary archive file.
///
/// Derives a hidden sibling name for a directory (`photos` →
/// `.photos.tar.gz` next to it) and removes the file when dropped, so
/// the artifact cannot outlive the operation that created it — success,
/// protocol failure, and archiving failure all pass through the same
/// drop. The dot prefix plus suffix keeps the name from colliding with
/// anything inside the original tree.
///
/// Removal is best-effort: a failure is logged and never surfaced, so it
/// cannot mask an error already being propagated.
pub struct ArchiveArtifact {
    path: PathBuf,
}

impl ArchiveArtifact {
    /// Derives the artifact path for the directory at `dir`.
    ///
    /// The artifact is placed next to `dir` in its parent, which works
    /// for both sides of a transfer: the upload packs the source
    /// directory into its sibling, the download stages the fetched
    /// archive next to the final destination directory.
    pub fn sibling_of(dir: &Path) -> Result<Self, ArchiveError> {
        let name = dir
            .file_name()
            .ok_or_else(|| ArchiveError::InvalidPath(dir.display().to_string()))?;
        let file_name = format!(".{}{}", name.to_string_lossy(), ARCHIVE_SUFFIX);
        let path = match dir.parent() {
            Some(parent) => parent.join(file_name),
            None => PathBuf::from(file_name),
        };
        Ok(Self { path })
    }

    /// Path of the temporary archive file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ArchiveArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            // Nothing was written yet (e.g. packing failed before create).
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to remove archive artifact"
                );
            }
        }
    }
}
