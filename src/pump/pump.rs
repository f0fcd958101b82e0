use super::source::Source;

use crate::sink::errors::{Cancelled, Io};
use crate::sink::{Sink, SinkError};

use snafu::ResultExt;

use tokio::io::AsyncReadExt;
use tokio::select;

use tokio_util::sync::CancellationToken;

use tracing::{debug, trace};

/// Size in bytes of the reusable chunk buffer used by [`copy_to_sink`]:
/// large enough to amortize per-call overhead, small enough to bound peak
/// memory
pub const CHUNK_SIZE: usize = 81920;

/// Drain `source` into `sink` in chunks of at most [`CHUNK_SIZE`] bytes,
/// preserving byte order with a single chunk in flight.
///
/// When the source reports a determinable length the sink's capacity is
/// requested once, before the first read; otherwise the copy proceeds with
/// no hint. The sink is flushed after the source is exhausted. Cancellation
/// is observed at every suspension point: it aborts the loop, skips the
/// flush and surfaces as [`SinkError::Cancelled`], leaving the sink with
/// exactly the chunks written so far.
///
/// The pump never releases the sink, since the caller may still inspect it
/// after the copy; releasing on every exit path stays the caller's
/// responsibility.
///
/// # Example
/// ```ignore
/// let mut sink = MemorySink::new();
/// copy_to_sink(&mut source, &mut sink, &cancel).await?;
/// let bytes = sink.get_bytes()?;
/// ```
pub async fn copy_to_sink<S, D>(
    source: &mut S,
    sink: &mut D,
    cancel: &CancellationToken,
) -> Result<(), SinkError>
where
    S: Source + ?Sized,
    D: Sink + ?Sized,
{
    if let Some(length) = source.len_hint().await.context(Io)? {
        debug!("requesting capacity for {} bytes", length);
        sink.request_capacity(length).await?;
    }

    let mut chunk = vec![0u8; CHUNK_SIZE];

    loop {
        let read = select! {
            biased;

            _ = cancel.cancelled() => return Cancelled.fail(),
            read = source.read(&mut chunk) => read.context(Io)?,
        };

        if read == 0 {
            break;
        }

        trace!("copying {} byte chunk", read);

        sink.write(&chunk[..read], cancel).await?;
    }

    sink.flush(cancel).await
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::pump::Opaque;
    use crate::sink::{MemorySink, StreamSink};
    use crate::test::Faulty;

    use async_trait::async_trait;

    use std::io::{self, Cursor};
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use tokio::io::{repeat, AsyncRead, ReadBuf};

    /// Sink recording the size of every accepted chunk
    struct Recording {
        inner: MemorySink,
        writes: Vec<usize>,
    }

    impl Recording {
        fn new() -> Self {
            Self {
                inner: MemorySink::new(),
                writes: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl Sink for Recording {
        async fn request_capacity(
            &mut self,
            bytes: u64,
        ) -> Result<(), SinkError> {
            self.inner.request_capacity(bytes).await
        }

        async fn write(
            &mut self,
            chunk: &[u8],
            cancel: &CancellationToken,
        ) -> Result<(), SinkError> {
            self.writes.push(chunk.len());
            self.inner.write(chunk, cancel).await
        }

        async fn flush(
            &mut self,
            cancel: &CancellationToken,
        ) -> Result<(), SinkError> {
            self.inner.flush(cancel).await
        }

        async fn release(&mut self) {
            self.inner.release().await
        }
    }

    /// Source of known length cancelling the token as its second read is
    /// issued
    struct CancelOnSecondRead {
        inner: Cursor<Vec<u8>>,
        cancel: CancellationToken,
        reads: usize,
    }

    impl AsyncRead for CancelOnSecondRead {
        fn poll_read(
            self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let this = self.get_mut();

            this.reads += 1;

            if this.reads == 2 {
                this.cancel.cancel();
            }

            Pin::new(&mut this.inner).poll_read(cx, buf)
        }
    }

    #[async_trait]
    impl Source for CancelOnSecondRead {
        async fn len_hint(&mut self) -> io::Result<Option<u64>> {
            Ok(Some(self.inner.get_ref().len() as u64))
        }
    }

    #[tokio::test]
    async fn bytes_arrive_in_order_with_capacity_hint() {
        let data: Vec<u8> = (0..50_000u32).map(|i| i as u8).collect();
        let mut source = Cursor::new(data.clone());
        let mut sink = MemorySink::new();
        let cancel = CancellationToken::new();

        copy_to_sink(&mut source, &mut sink, &cancel)
            .await
            .expect("copy failed");

        assert!(sink.capacity().expect("no capacity request") >= 50_000);
        assert_eq!(sink.get_bytes().expect("no bytes"), &data[..]);
    }

    #[tokio::test]
    async fn unknown_length_copies_in_three_chunks() {
        let mut source = Opaque::new(repeat(0).take(200_000));
        let mut sink = Recording::new();
        let cancel = CancellationToken::new();

        // no hint will arrive, make the memory sink ready up front
        sink.request_capacity(0).await.expect("capacity failed");

        copy_to_sink(&mut source, &mut sink, &cancel)
            .await
            .expect("copy failed");

        assert_eq!(sink.writes, vec![81920, 81920, 36160]);
        assert_eq!(sink.inner.get_bytes().expect("no bytes").len(), 200_000);
    }

    #[tokio::test]
    async fn cancellation_mid_copy_keeps_completed_chunks() {
        let data = vec![5u8; 2 * CHUNK_SIZE];
        let cancel = CancellationToken::new();

        let mut source = CancelOnSecondRead {
            inner: Cursor::new(data.clone()),
            cancel: cancel.clone(),
            reads: 0,
        };
        let mut sink = MemorySink::new();

        let err = copy_to_sink(&mut source, &mut sink, &cancel)
            .await
            .expect_err("cancelled copy completed");

        assert!(matches!(err, SinkError::Cancelled));
        assert_eq!(sink.get_bytes().expect("no bytes"), &data[..CHUNK_SIZE]);

        // release still succeeds after a cancelled copy
        sink.release().await;
        sink.release().await;
    }

    #[tokio::test]
    async fn pre_cancelled_token_aborts_before_any_write() {
        let mut source = Cursor::new(vec![1u8; 1024]);
        let mut sink = MemorySink::new();
        let cancel = CancellationToken::new();

        cancel.cancel();

        let err = copy_to_sink(&mut source, &mut sink, &cancel)
            .await
            .expect_err("cancelled copy completed");

        assert!(matches!(err, SinkError::Cancelled));
        assert_eq!(sink.get_bytes().expect("no bytes").len(), 0);
    }

    #[tokio::test]
    async fn sink_errors_abort_the_copy() {
        let mut source = Cursor::new(vec![1u8; 1024]);
        let mut sink = StreamSink::new(Faulty, true);
        let cancel = CancellationToken::new();

        let err = copy_to_sink(&mut source, &mut sink, &cancel)
            .await
            .expect_err("copy into broken stream completed");

        assert!(matches!(err, SinkError::Io { .. }));
    }

    #[tokio::test]
    async fn empty_source_still_flushes() {
        let mut source = Cursor::new(Vec::new());
        let mut sink = MemorySink::new();
        let cancel = CancellationToken::new();

        copy_to_sink(&mut source, &mut sink, &cancel)
            .await
            .expect("copy failed");

        assert_eq!(sink.get_bytes().expect("no bytes").len(), 0);
    }
}
