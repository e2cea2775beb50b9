//! Upload progress reporting.
//!
//! Progress is tracked per call: the callback travels with the call's
//! [`CallOptions`](crate::CallOptions) and is moved into the streamed request
//! body, so concurrent uploads on one client never share a callback.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use std::sync::Arc;

/// Callback receiving the fraction of the body sent so far, in `0.0..=1.0`.
///
/// It runs on whatever task the transport polls the body from; keep it short
/// and non-blocking.
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Size of the chunks an observed body is streamed in.
pub(crate) const CHUNK_SIZE: usize = 16 * 1024;

/// Running count of bytes handed to the transport.
#[derive(Debug, Clone, Copy)]
pub struct ProgressTracker {
    sent: u64,
    total: u64,
}

impl ProgressTracker {
    /// Creates a tracker for a body of `total` bytes.
    pub fn new(total: u64) -> Self {
        Self { sent: 0, total }
    }

    /// Records `n` more bytes sent and returns the new fraction.
    ///
    /// Returns `None` when the total is zero, in which case no progress is
    /// reported at all.
    ///
    /// ```
    /// use lightnet::ProgressTracker;
    ///
    /// let mut tracker = ProgressTracker::new(4);
    /// assert_eq!(tracker.record(1), Some(0.25));
    /// assert_eq!(tracker.record(3), Some(1.0));
    ///
    /// assert_eq!(ProgressTracker::new(0).record(10), None);
    /// ```
    pub fn record(&mut self, n: u64) -> Option<f64> {
        self.sent = self.sent.saturating_add(n);
        if self.total == 0 {
            return None;
        }
        Some((self.sent as f64 / self.total as f64).min(1.0))
    }

    /// Bytes recorded so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Expected body size in bytes.
    pub fn total(&self) -> u64 {
        self.total
    }
}

/// Splits `body` into chunks that report progress as the transport pulls them.
pub(crate) fn observed_body(
    body: Bytes,
    on_progress: ProgressCallback,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
    let mut tracker = ProgressTracker::new(body.len() as u64);
    stream::iter(chunks(body, CHUNK_SIZE)).map(move |chunk| {
        if let Some(fraction) = tracker.record(chunk.len() as u64) {
            on_progress(fraction);
        }
        Ok(chunk)
    })
}

fn chunks(body: Bytes, size: usize) -> Vec<Bytes> {
    (0..body.len())
        .step_by(size)
        .map(|start| body.slice(start..(start + size).min(body.len())))
        .collect()
}
