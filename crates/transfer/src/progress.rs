use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Receives byte-count increments as chunks cross the wire.
///
/// A sink handle belongs to exactly one operation; concurrent calls each
/// get their own. Implementations must be cheap — `add` runs once per
/// chunk on the transfer path.
pub trait ProgressSink: Send + Sync {
    /// Announces the expected total before increments begin.
    ///
    /// Called once per operation when the stream length is known (file
    /// size on upload, `Content-Length` on download).
    fn set_total(&self, _total_bytes: u64) {}

    /// Reports `bytes` more transferred.
    fn add(&self, bytes: u64);
}

/// Sink that discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn add(&self, _bytes: u64) {}
}

/// Sink backed by atomic counters.
///
/// Useful as-is for simple displays and for asserting byte totals in
/// tests.
#[derive(Debug, Default)]
pub struct ByteCounter {
    total: AtomicU64,
    transferred: AtomicU64,
}

impl ByteCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total announced via [`ProgressSink::set_total`] (0 if never set).
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Sum of all increments so far.
    pub fn transferred(&self) -> u64 {
        self.transferred.load(Ordering::Relaxed)
    }
}

impl ProgressSink for ByteCounter {
    fn set_total(&self, total_bytes: u64) {
        self.total.store(total_bytes, Ordering::Relaxed);
    }

    fn add(&self, bytes: u64) {
        self.transferred.fetch_add(bytes, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// SpeedCalculator
// ---------------------------------------------------------------------------

struct Sample {
    bytes: u64,
    at: Instant,
}

/// Calculates transfer speed over a sliding window of chunk samples.
pub struct SpeedCalculator {
    inner: Mutex<SpeedInner>,
}

struct SpeedInner {
    samples: VecDeque<Sample>,
    max_samples: usize,
    window: Duration,
}

impl Default for SpeedCalculator {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl SpeedCalculator {
    /// Creates a new calculator.
    ///
    /// - `window`: time window for the average (default 5 s).
    /// - `max_samples`: maximum retained samples (default 100).
    pub fn new(window: Option<Duration>, max_samples: Option<usize>) -> Self {
        Self {
            inner: Mutex::new(SpeedInner {
                samples: VecDeque::new(),
                max_samples: max_samples.unwrap_or(100),
                window: window.unwrap_or(Duration::from_secs(5)),
            }),
        }
    }

    fn locked(&self) -> MutexGuard<'_, SpeedInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records a sample of `bytes` transferred at the current instant.
    pub fn add_sample(&self, bytes: u64) {
        let mut s = self.locked();
        let now = Instant::now();
        s.samples.push_back(Sample { bytes, at: now });

        let cutoff = now - s.window;
        while let Some(front) = s.samples.front() {
            if front.at >= cutoff {
                break;
            }
            s.samples.pop_front();
        }
        while s.samples.len() > s.max_samples {
            s.samples.pop_front();
        }
    }

    /// Average speed in bytes/second within the window.
    ///
    /// Returns 0.0 with fewer than 2 samples.
    pub fn bytes_per_second(&self) -> f64 {
        let s = self.locked();
        let (Some(first), Some(last)) = (s.samples.front(), s.samples.back()) else {
            return 0.0;
        };
        let elapsed = last.at.duration_since(first.at);
        if elapsed.is_zero() {
            return 0.0;
        }
        let total: u64 = s.samples.iter().map(|sample| sample.bytes).sum();
        total as f64 / elapsed.as_secs_f64()
    }

    /// Estimated time to transfer `remaining_bytes`, or `None` if the
    /// speed is unknown.
    pub fn eta(&self, remaining_bytes: u64) -> Option<Duration> {
        let speed = self.bytes_per_second();
        if speed <= 0.0 {
            return None;
        }
        Some(Duration::from_secs_f64(remaining_bytes as f64 / speed))
    }

    /// Clears all recorded samples.
    pub fn reset(&self) {
        self.locked().samples.clear();
    }
}
