//! Chunked byte streaming with progress reporting and cancellation.
//!
//! Both transfer directions move bytes in bounded chunks so memory use
//! stays flat and a [`ProgressSink`] can observe every chunk as it
//! crosses. There is no resume support: any error aborts the whole
//! stream and the caller restarts from scratch.

mod progress;
mod stream;

pub use progress::{ByteCounter, NullSink, ProgressSink, SpeedCalculator};
pub use stream::{chunk_stream, write_stream};

/// Chunk size for upload reads and download writes: 64 KiB.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transfer cancelled")]
    Cancelled,
}
