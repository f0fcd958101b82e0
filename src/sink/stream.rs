use super::backing::Backing;
use super::errors::{Cancelled, EmptyChunk, Io, SinkError};
use super::sink::Sink;

use async_trait::async_trait;

use snafu::{ensure, ResultExt};

use std::mem;

use tokio::io::AsyncWriteExt;

use tokio_util::sync::CancellationToken;

use tracing::{debug, warn};

/// A [`Sink`] writing to a caller-supplied stream. Capacity requests are a
/// pure optimization: seekable streams are pre-sized to the hint, anything
/// else ignores it, and writes are accepted either way. Flushing trims any
/// pre-allocated space that was never written so the stream ends at a
/// well-defined length.
///
/// The `owns_stream` flag decides whether [`release`] shuts the stream
/// down; callers keeping ownership can instead hand in a `&mut` borrow or
/// recover the stream with [`into_inner`].
///
/// [`release`]: Sink::release
/// [`into_inner`]: Self::into_inner
pub struct StreamSink<B> {
    stream: B,
    owns_stream: bool,
    released: bool,
}

impl<B: Backing> StreamSink<B> {
    /// Create a `StreamSink` over an already-open stream
    ///
    /// # Arguments
    /// * `stream` - The destination stream, positioned where writing
    /// should begin
    /// * `owns_stream` - Whether releasing this sink shuts `stream` down
    pub fn new(stream: B, owns_stream: bool) -> Self {
        Self {
            stream,
            owns_stream,
            released: false,
        }
    }

    /// Hand the underlying stream back to the caller
    pub fn into_inner(self) -> B {
        self.stream
    }
}

#[async_trait]
impl<B: Backing> Sink for StreamSink<B> {
    async fn request_capacity(&mut self, bytes: u64) -> Result<(), SinkError> {
        if !self.stream.is_seekable() {
            return Ok(());
        }

        let position = self.stream.stream_position().await.context(Io)?;

        // growth only: never cut below bytes that were already written
        if bytes >= position {
            debug!("pre-sizing stream to {} bytes", bytes);
            self.stream.set_len(bytes).await.context(Io)?;
        }

        Ok(())
    }

    async fn write(
        &mut self,
        chunk: &[u8],
        cancel: &CancellationToken,
    ) -> Result<(), SinkError> {
        ensure!(!chunk.is_empty(), EmptyChunk);
        ensure!(!cancel.is_cancelled(), Cancelled);

        self.stream.write_all(chunk).await.context(Io)
    }

    async fn flush(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<(), SinkError> {
        ensure!(!cancel.is_cancelled(), Cancelled);

        if self.stream.is_seekable() {
            let position = self.stream.stream_position().await.context(Io)?;
            let length = self.stream.stream_len().await.context(Io)?;

            if position < length {
                debug!(
                    "trimming {} bytes of unused capacity",
                    length - position
                );
                self.stream.set_len(position).await.context(Io)?;
            }
        }

        self.stream.flush().await.context(Io)
    }

    async fn release(&mut self) {
        if mem::replace(&mut self.released, true) {
            return;
        }

        if self.owns_stream {
            // release runs on every exit path, a close failure here has
            // nowhere to propagate
            if let Err(e) = self.stream.shutdown().await {
                warn!("error shutting down sink stream: {}", e);
            }
        }
    }
}
