use async_trait::async_trait;

use std::io::{self, Cursor, SeekFrom};
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncSeekExt, ReadBuf};

/// Trait for readable sources drained by [`copy_to_sink`]. Only
/// requirement is asynchronously reading arrays of bytes; sources whose
/// remaining size can be determined without consuming them report it
/// through [`len_hint`], which lets the pump request sink capacity up
/// front.
///
/// [`copy_to_sink`]: super::copy_to_sink
/// [`len_hint`]: Self::len_hint
#[async_trait]
pub trait Source: AsyncRead + Send + Unpin {
    /// Number of bytes left to read, when determinable without consuming
    /// the source. The default reports an unknown length.
    async fn len_hint(&mut self) -> io::Result<Option<u64>> {
        Ok(None)
    }
}

#[async_trait]
impl<T> Source for Cursor<T>
where
    T: AsRef<[u8]> + Send + Unpin,
{
    async fn len_hint(&mut self) -> io::Result<Option<u64>> {
        let total = self.get_ref().as_ref().len() as u64;

        Ok(Some(total.saturating_sub(self.position())))
    }
}

#[async_trait]
impl Source for File {
    async fn len_hint(&mut self) -> io::Result<Option<u64>> {
        let position = self.seek(SeekFrom::Current(0)).await?;
        let length = self.metadata().await?.len();

        Ok(Some(length.saturating_sub(position)))
    }
}

/// Wrapper treating any readable stream as a source with no determinable
/// length, forcing the pump to skip the capacity hint
pub struct Opaque<R> {
    inner: R,
}

impl<R> Opaque<R> {
    /// Wrap `inner`, hiding its length from the pump
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Return the wrapped reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for Opaque<R> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

#[async_trait]
impl<R: AsyncRead + Send + Unpin> Source for Opaque<R> {}
