use std::io;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;

use crate::{CHUNK_SIZE, ProgressSink, TransferError};

/// Turns an open file into a chunked byte stream.
///
/// Chunks are bounded at [`CHUNK_SIZE`]; the final chunk may be shorter.
/// Each chunk is reported to `sink` before the next one is produced.
/// When `cancel` fires, the stream terminates with an `Interrupted`
/// error so a transport consuming it aborts the request.
pub fn chunk_stream(
    file: tokio::fs::File,
    sink: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
    ReaderStream::with_capacity(file, CHUNK_SIZE).map(move |item| {
        if cancel.is_cancelled() {
            return Err(io::Error::new(
                io::ErrorKind::Interrupted,
                "transfer cancelled",
            ));
        }
        let chunk = item?;
        sink.add(chunk.len() as u64);
        Ok(chunk)
    })
}

/// Writes a chunked byte stream to `dest`, reporting progress per chunk.
///
/// Creates (or truncates) the destination file. Returns the number of
/// bytes written. On error or cancellation the partially written file is
/// left in place for the caller to deal with.
pub async fn write_stream<S>(
    mut stream: S,
    dest: &Path,
    sink: Arc<dyn ProgressSink>,
    cancel: &CancellationToken,
) -> Result<u64, TransferError>
where
    S: Stream<Item = io::Result<Bytes>> + Unpin,
{
    let mut file = tokio::fs::File::create(dest).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        if cancel.is_cancelled() {
            return Err(TransferError::Cancelled);
        }
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        sink.add(chunk.len() as u64);
        written += chunk.len() as u64;
    }

    file.flush().await?;
    tracing::debug!(bytes = written, dest = %dest.display(), "stream written to disk");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ByteCounter, NullSink};

    async fn temp_file_with(dir: &Path, name: &str, data: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        tokio::fs::write(&path, data).await.unwrap();
        path
    }

    #[tokio::test]
    async fn chunk_stream_reports_exact_total() {
        let dir = tempfile::tempdir().unwrap();
        // Two full chunks plus a short tail.
        let data = vec![0xA5u8; CHUNK_SIZE * 2 + 123];
        let path = temp_file_with(dir.path(), "blob.bin", &data).await;

        let sink = Arc::new(ByteCounter::new());
        let file = tokio::fs::File::open(&path).await.unwrap();
        let mut stream = std::pin::pin!(chunk_stream(
            file,
            sink.clone(),
            CancellationToken::new()
        ));

        let mut sizes = Vec::new();
        let mut total = 0usize;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.unwrap();
            assert!(chunk.len() <= CHUNK_SIZE);
            sizes.push(chunk.len());
            total += chunk.len();
        }

        assert_eq!(total, data.len());
        assert_eq!(sink.transferred(), data.len() as u64);
        // The tail chunk is shorter than the bound.
        assert!(*sizes.last().unwrap() < CHUNK_SIZE);
    }

    #[tokio::test]
    async fn chunk_stream_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file_with(dir.path(), "empty.bin", b"").await;

        let sink = Arc::new(ByteCounter::new());
        let file = tokio::fs::File::open(&path).await.unwrap();
        let mut stream = std::pin::pin!(chunk_stream(
            file,
            sink.clone(),
            CancellationToken::new()
        ));

        assert!(stream.next().await.is_none());
        assert_eq!(sink.transferred(), 0);
    }

    #[tokio::test]
    async fn chunk_stream_cancellation_interrupts() {
        let dir = tempfile::tempdir().unwrap();
        let data = vec![1u8; CHUNK_SIZE * 4];
        let path = temp_file_with(dir.path(), "blob.bin", &data).await;

        let cancel = CancellationToken::new();
        let file = tokio::fs::File::open(&path).await.unwrap();
        let mut stream = std::pin::pin!(chunk_stream(
            file,
            Arc::new(NullSink),
            cancel.clone()
        ));

        let first = stream.next().await.unwrap();
        assert!(first.is_ok());

        cancel.cancel();
        let second = stream.next().await.unwrap();
        let err = second.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Interrupted);
    }

    #[tokio::test]
    async fn write_stream_roundtrip_with_progress() {
        let dir = tempfile::tempdir().unwrap();
        let data = vec![7u8; CHUNK_SIZE + 99];
        let chunks = vec![
            Ok(Bytes::copy_from_slice(&data[..CHUNK_SIZE])),
            Ok(Bytes::copy_from_slice(&data[CHUNK_SIZE..])),
        ];
        let stream = futures_util::stream::iter(chunks);

        let sink = Arc::new(ByteCounter::new());
        let dest = dir.path().join("out.bin");
        let written = write_stream(stream, &dest, sink.clone(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(written, data.len() as u64);
        assert_eq!(sink.transferred(), data.len() as u64);
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), data);
    }

    #[tokio::test]
    async fn write_stream_cancelled_before_first_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let stream = futures_util::stream::iter(vec![Ok(Bytes::from_static(b"data"))]);

        let cancel = CancellationToken::new();
        cancel.cancel();

        let dest = dir.path().join("out.bin");
        let result = write_stream(
            stream,
            &dest,
            Arc::new(NullSink),
            &cancel,
        )
        .await;
        assert!(matches!(result, Err(TransferError::Cancelled)));
    }

    #[tokio::test]
    async fn write_stream_propagates_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let chunks: Vec<io::Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(io::Error::other("connection reset")),
        ];
        let stream = futures_util::stream::iter(chunks);

        let dest = dir.path().join("out.bin");
        let result = write_stream(
            stream,
            &dest,
            Arc::new(NullSink),
            &CancellationToken::new(),
        )
        .await;
        assert!(matches!(result, Err(TransferError::Io(_))));
        // The partial file stays; cleanup policy belongs to the caller.
        assert!(dest.exists());
    }
}
