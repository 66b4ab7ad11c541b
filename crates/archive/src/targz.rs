use std::fs::File;
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::debug;

use crate::{ArchiveError, Archiver};

/// Default archive codec: gzip-compressed tar.
///
/// Packs the directory's contents at the archive root (the receiving
/// side unpacks straight into the destination directory, so the tree
/// keeps its relative structure without a wrapping top-level entry).
/// Extended attributes are neither written nor restored.
#[derive(Debug, Clone, Copy, Default)]
pub struct TarGzArchiver;

impl Archiver for TarGzArchiver {
    fn pack(&self, dir: &Path, dest: &Path) -> Result<(), ArchiveError> {
        let pack_err = |reason: String| ArchiveError::Pack {
            dir: dir.display().to_string(),
            reason,
        };

        let file = File::create(dest)?;
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        builder.follow_symlinks(false);

        builder
            .append_dir_all(".", dir)
            .map_err(|e| pack_err(e.to_string()))?;
        let encoder = builder.into_inner().map_err(|e| pack_err(e.to_string()))?;
        encoder.finish().map_err(|e| pack_err(e.to_string()))?;

        debug!(dir = %dir.display(), archive = %dest.display(), "packed directory");
        Ok(())
    }

    fn unpack(&self, archive: &Path, dest_dir: &Path) -> Result<(), ArchiveError> {
        std::fs::create_dir_all(dest_dir)?;

        let file = File::open(archive)?;
        let mut reader = tar::Archive::new(GzDecoder::new(file));
        reader.set_overwrite(true);
        reader.set_unpack_xattrs(false);
        reader.unpack(dest_dir).map_err(|e| ArchiveError::Unpack {
            archive: archive.display().to_string(),
            reason: e.to_string(),
        })?;

        debug!(archive = %archive.display(), dir = %dest_dir.display(), "unpacked archive");
        Ok(())
    }
}
