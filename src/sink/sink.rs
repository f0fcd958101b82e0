use super::errors::SinkError;

use async_trait::async_trait;

use tokio_util::sync::CancellationToken;

/// Trait for destinations accepting the ordered byte stream produced by an
/// upstream encoder. A `Sink` negotiates capacity up front, accepts chunked
/// writes, flushes once the stream is complete and releases its backing
/// resource through [`release`].
///
/// Sinks are not internally synchronized: callers must serialize all access
/// to one instance. Cancellation is cooperative and observed at chunk
/// boundaries, so a chunk is either fully accepted or not accepted at all.
///
/// [`release`]: Self::release
#[async_trait]
pub trait Sink: Send {
    /// Hint that `bytes` total bytes are expected to be written. May be
    /// called any number of times, before or between writes; it never
    /// reduces readiness to accept writes and never discards bytes that
    /// were already written. Implementations are free to ignore the hint
    /// when it cannot be honored cheaply.
    async fn request_capacity(&mut self, bytes: u64) -> Result<(), SinkError>;

    /// Append `chunk` to the sink, suspending until it is fully accepted
    /// or `cancel` fires.
    ///
    /// Fails with [`SinkError::NotInitialized`] when the implementation
    /// requires a prior capacity request, [`SinkError::EmptyChunk`] when
    /// `chunk` is empty, [`SinkError::Cancelled`] when the token is
    /// cancelled and [`SinkError::Io`] on transport errors.
    async fn write(
        &mut self,
        chunk: &[u8],
        cancel: &CancellationToken,
    ) -> Result<(), SinkError>;

    /// Suspend until every accepted byte has been durably handed to the
    /// backing store. Stream-backed sinks additionally trim any capacity
    /// that was pre-allocated but never written.
    async fn flush(&mut self, cancel: &CancellationToken)
        -> Result<(), SinkError>;

    /// Release the backing resource. Resources owned exclusively by the
    /// sink are always released; a shared resource is released only when
    /// ownership was granted at construction. Never fails and may be
    /// called more than once.
    async fn release(&mut self);
}
