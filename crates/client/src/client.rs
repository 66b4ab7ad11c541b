//! Client orchestration: upload, download, list, delete.

use std::path::Path;
use std::sync::Arc;

use depot_archive::{ArchiveArtifact, ArchiveError, Archiver, TarGzArchiver};
use depot_protocol::{RemoteEntry, TransferRequest, endpoints, headers};
use depot_transfer::{NullSink, ProgressSink, chunk_stream, write_stream};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::classify::{PathKind, basename, classify_local, classify_remote};
use crate::error::ClientError;
use crate::http::{ClientConfig, HttpTransport};
use crate::negotiation::Negotiation;
use crate::transport::{Method, RequestBody, Transport, TransportError, TransportRequest};

/// Per-call options for [`DepotClient::upload`].
pub struct UploadOptions {
    /// Store a single file under this name instead of its local name.
    /// Rejected for directory sources.
    pub destination_name: Option<String>,
    /// Allow the server to replace an existing object.
    pub overwrite: bool,
    /// Receives byte-count increments while the body streams.
    pub progress: Arc<dyn ProgressSink>,
    /// Aborts the in-flight chunk loop when triggered; temp-artifact
    /// cleanup still runs.
    pub cancel: CancellationToken,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            destination_name: None,
            overwrite: false,
            progress: Arc::new(NullSink),
            cancel: CancellationToken::new(),
        }
    }
}

/// Per-call options for [`DepotClient::download`].
pub struct DownloadOptions {
    pub progress: Arc<dyn ProgressSink>,
    pub cancel: CancellationToken,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            progress: Arc::new(NullSink),
            cancel: CancellationToken::new(),
        }
    }
}

/// Client for the depot object-storage service.
///
/// Every operation runs to completion on the calling task and owns its
/// temporary artifacts, so independent calls can run concurrently
/// without shared state. Failed transfers are not resumable; callers
/// retry from scratch.
pub struct DepotClient {
    transport: Arc<dyn Transport>,
    archiver: Arc<dyn Archiver>,
}

impl DepotClient {
    /// Creates a client over HTTP with the default tar.gz archiver.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        Ok(Self::with_parts(
            Arc::new(HttpTransport::new(config)?),
            Arc::new(TarGzArchiver),
        ))
    }

    /// Builds a client from explicit collaborators (tests, custom
    /// codecs or transports).
    pub fn with_parts(transport: Arc<dyn Transport>, archiver: Arc<dyn Archiver>) -> Self {
        Self {
            transport,
            archiver,
        }
    }

    /// Uploads a file or directory into the remote directory
    /// `destination_dir`.
    ///
    /// Directories are packed into a temporary sibling archive first and
    /// sent with the archive flag; the artifact is removed on every exit
    /// path. The upload itself is two-phase: a headers-only preflight,
    /// then the chunked body.
    pub async fn upload(
        &self,
        source: &Path,
        destination_dir: &str,
        opts: UploadOptions,
    ) -> Result<(), ClientError> {
        match classify_local(source)? {
            PathKind::Directory => {
                if opts.destination_name.is_some() {
                    return Err(ClientError::InvalidArgument(
                        "a destination name cannot be combined with a directory source".into(),
                    ));
                }
                let dir_name = source
                    .file_name()
                    .ok_or_else(|| {
                        ClientError::InvalidArgument(format!(
                            "source path has no directory name: {}",
                            source.display()
                        ))
                    })?
                    .to_string_lossy()
                    .into_owned();
                let remote_path = join_remote(destination_dir, &dir_name);

                // The guard removes the temp archive when this call
                // exits, whether packing, preflight or streaming failed.
                let artifact = ArchiveArtifact::sibling_of(source)?;
                self.pack_directory(source, artifact.path()).await?;
                self.send_file(artifact.path(), &remote_path, true, &opts)
                    .await
            }
            PathKind::File => {
                let file_name = match &opts.destination_name {
                    Some(name) => name.clone(),
                    None => source
                        .file_name()
                        .ok_or_else(|| {
                            ClientError::InvalidArgument(format!(
                                "source path has no file name: {}",
                                source.display()
                            ))
                        })?
                        .to_string_lossy()
                        .into_owned(),
                };
                let remote_path = join_remote(destination_dir, &file_name);
                self.send_file(source, &remote_path, false, &opts).await
            }
        }
    }

    /// Downloads the remote path `source` to the local `destination`.
    ///
    /// The remote path is classified from its listing first, so a 404
    /// surfaces as [`ClientError::NotFound`] before any destination
    /// directory is created. Directory sources arrive as an archive
    /// staged next to the destination and are unpacked into it.
    pub async fn download(
        &self,
        source: &str,
        destination: &Path,
        opts: DownloadOptions,
    ) -> Result<(), ClientError> {
        let listing = self.list(source, false).await?;

        match classify_remote(&listing, basename(source)) {
            PathKind::File => {
                create_parent_dirs(destination).await?;
                self.fetch(source, destination, false, &opts).await?;
                info!(source, destination = %destination.display(), "download complete");
            }
            PathKind::Directory => {
                // Staged next to the final directory; the guard removes
                // it whether the fetch or the unpack fails.
                let artifact = ArchiveArtifact::sibling_of(destination)?;
                create_parent_dirs(destination).await?;
                self.fetch(source, artifact.path(), true, &opts).await?;
                self.unpack_archive(artifact.path(), destination).await?;
                info!(source, destination = %destination.display(), "directory download complete");
            }
        }
        Ok(())
    }

    /// Lists the remote path. With `verbose`, entries carry sizes.
    pub async fn list(
        &self,
        path: &str,
        verbose: bool,
    ) -> Result<Vec<RemoteEntry>, ClientError> {
        let resp = self
            .transport
            .send(TransportRequest {
                method: Method::Get,
                path: endpoints::ls(path, verbose),
                headers: Vec::new(),
                body: RequestBody::Empty,
            })
            .await?;

        match resp.status {
            200 => {
                let text = resp.text().await?;
                Ok(serde_json::from_str(&text)?)
            }
            404 => Err(ClientError::NotFound(path.to_string())),
            status => {
                let message = resp.text().await.unwrap_or_default();
                Err(ClientError::List { status, message })
            }
        }
    }

    /// Deletes the remote path.
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let resp = self
            .transport
            .send(TransportRequest {
                method: Method::Delete,
                path: endpoints::delete(path),
                headers: Vec::new(),
                body: RequestBody::Empty,
            })
            .await?;

        match resp.status {
            204 => {
                info!(path, "deleted remote path");
                Ok(())
            }
            404 => Err(ClientError::NotFound(path.to_string())),
            status => {
                let message = resp.text().await.unwrap_or_default();
                Err(ClientError::Delete { status, message })
            }
        }
    }

    /// Streams one local file to the remote path via the two-phase
    /// negotiation.
    async fn send_file(
        &self,
        path: &Path,
        remote_path: &str,
        is_archive: bool,
        opts: &UploadOptions,
    ) -> Result<(), ClientError> {
        // The declared size must match the stream exactly, so it is read
        // from the final byte source after any packing.
        let size = tokio::fs::metadata(path).await?.len();
        let request = TransferRequest {
            source_path: path.display().to_string(),
            destination_path: remote_path.to_string(),
            is_archive,
            size_bytes: size,
            overwrite: opts.overwrite,
        };
        opts.progress.set_total(size);

        let mut negotiation = Negotiation::new(self.transport.as_ref(), &request);
        negotiation.preflight().await?;

        let file = tokio::fs::File::open(path).await?;
        let stream = chunk_stream(file, Arc::clone(&opts.progress), opts.cancel.clone());
        negotiation.send_body(Box::pin(stream)).await?;

        info!(
            source = %path.display(),
            destination = remote_path,
            bytes = size,
            archive = is_archive,
            "upload complete"
        );
        Ok(())
    }

    /// Fetches one remote object into a local file with progress.
    async fn fetch(
        &self,
        source: &str,
        dest: &Path,
        is_archive: bool,
        opts: &DownloadOptions,
    ) -> Result<(), ClientError> {
        let mut req_headers = Vec::new();
        if is_archive {
            req_headers.push((headers::X_IS_ARCHIVE.to_string(), "true".to_string()));
        }

        let resp = self
            .transport
            .send(TransportRequest {
                method: Method::Get,
                path: endpoints::download(source),
                headers: req_headers,
                body: RequestBody::Empty,
            })
            .await?;

        match resp.status {
            200 => {}
            404 => return Err(ClientError::NotFound(source.to_string())),
            status => {
                let message = resp.text().await.unwrap_or_default();
                return Err(ClientError::Download { status, message });
            }
        }

        if let Some(total) = resp.content_length {
            opts.progress.set_total(total);
        }
        write_stream(resp.body, dest, Arc::clone(&opts.progress), &opts.cancel).await?;
        Ok(())
    }

    async fn pack_directory(&self, dir: &Path, dest: &Path) -> Result<(), ClientError> {
        let archiver = Arc::clone(&self.archiver);
        let dir_display = dir.display().to_string();
        let dir = dir.to_path_buf();
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || archiver.pack(&dir, &dest))
            .await
            .map_err(|e| {
                ClientError::Archive(ArchiveError::Pack {
                    dir: dir_display,
                    reason: format!("task join error: {e}"),
                })
            })??;
        Ok(())
    }

    async fn unpack_archive(&self, archive: &Path, dest_dir: &Path) -> Result<(), ClientError> {
        let archiver = Arc::clone(&self.archiver);
        let archive_display = archive.display().to_string();
        let archive = archive.to_path_buf();
        let dest_dir = dest_dir.to_path_buf();
        tokio::task::spawn_blocking(move || archiver.unpack(&archive, &dest_dir))
            .await
            .map_err(|e| {
                ClientError::Archive(ArchiveError::Unpack {
                    archive: archive_display,
                    reason: format!("task join error: {e}"),
                })
            })??;
        Ok(())
    }
}

/// Joins a remote directory and an entry name with a single separator.
fn join_remote(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

async fn create_parent_dirs(path: &Path) -> Result<(), ClientError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}
