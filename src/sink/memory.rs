use super::errors::{Cancelled, EmptyChunk, NotInitialized, SinkError};
use super::sink::Sink;

use async_trait::async_trait;

use snafu::{ensure, OptionExt};

use tokio_util::sync::CancellationToken;

use tracing::trace;

/// A [`Sink`] backed by a growable in-memory buffer. The buffer is
/// allocated lazily by the first capacity request; using the sink before
/// that fails with [`SinkError::NotInitialized`].
///
/// Once a copy has completed the written bytes can be borrowed without
/// copying through [`get_bytes`] or taken out with [`into_bytes`].
///
/// [`get_bytes`]: Self::get_bytes
/// [`into_bytes`]: Self::into_bytes
#[derive(Debug, Default)]
pub struct MemorySink {
    buffer: Option<Vec<u8>>,
}

impl MemorySink {
    /// Create a new `MemorySink` with no backing buffer
    pub fn new() -> Self {
        Self { buffer: None }
    }

    /// Borrow the bytes written so far as a contiguous slice. The view is
    /// only valid while this sink is alive.
    pub fn get_bytes(&self) -> Result<&[u8], SinkError> {
        self.buffer.as_deref().context(NotInitialized)
    }

    /// Consume this sink, returning ownership of the written bytes
    pub fn into_bytes(self) -> Result<Vec<u8>, SinkError> {
        self.buffer.context(NotInitialized)
    }

    /// Capacity of the backing buffer, or `None` before the first
    /// capacity request
    pub fn capacity(&self) -> Option<usize> {
        self.buffer.as_ref().map(Vec::capacity)
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn request_capacity(&mut self, bytes: u64) -> Result<(), SinkError> {
        let bytes = bytes as usize;

        match self.buffer {
            None => {
                trace!("allocating buffer for {} bytes", bytes);
                self.buffer = Some(Vec::with_capacity(bytes));
            }
            // growth only, shrinking requests are ignored
            Some(ref mut buffer) if buffer.capacity() < bytes => {
                buffer.reserve(bytes - buffer.len());
            }
            Some(_) => (),
        }

        Ok(())
    }

    async fn write(
        &mut self,
        chunk: &[u8],
        cancel: &CancellationToken,
    ) -> Result<(), SinkError> {
        let buffer = self.buffer.as_mut().context(NotInitialized)?;

        ensure!(!chunk.is_empty(), EmptyChunk);
        ensure!(!cancel.is_cancelled(), Cancelled);

        buffer.extend_from_slice(chunk);

        Ok(())
    }

    async fn flush(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<(), SinkError> {
        ensure!(self.buffer.is_some(), NotInitialized);
        ensure!(!cancel.is_cancelled(), Cancelled);

        Ok(())
    }

    async fn release(&mut self) {
        self.buffer = None;
    }
}
