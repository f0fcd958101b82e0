use async_trait::async_trait;

use std::io::{self, Cursor, ErrorKind, SeekFrom};
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWrite};

/// Trait for streams able to back a [`StreamSink`]. Only requirement is
/// asynchronously writing arrays of bytes; seekable streams additionally
/// report their position and length and can be resized, which lets the
/// sink honor capacity hints and trim over-reserved space on flush.
///
/// The querying methods are only invoked when [`is_seekable`] returns
/// `true`; the defaults report a non-seekable stream.
///
/// [`StreamSink`]: super::StreamSink
/// [`is_seekable`]: Self::is_seekable
#[async_trait]
pub trait Backing: AsyncWrite + Send + Unpin {
    /// Whether this stream supports repositioning and resizing
    fn is_seekable(&self) -> bool {
        false
    }

    /// Current write position of this stream
    async fn stream_position(&mut self) -> io::Result<u64> {
        Err(ErrorKind::Unsupported.into())
    }

    /// Current total length of this stream
    async fn stream_len(&mut self) -> io::Result<u64> {
        Err(ErrorKind::Unsupported.into())
    }

    /// Resize this stream to exactly `len` bytes, extending or truncating
    /// as needed
    async fn set_len(&mut self, len: u64) -> io::Result<()> {
        let _ = len;

        Err(ErrorKind::Unsupported.into())
    }
}

#[async_trait]
impl Backing for File {
    fn is_seekable(&self) -> bool {
        true
    }

    async fn stream_position(&mut self) -> io::Result<u64> {
        self.seek(SeekFrom::Current(0)).await
    }

    async fn stream_len(&mut self) -> io::Result<u64> {
        Ok(self.metadata().await?.len())
    }

    async fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len).await
    }
}

#[async_trait]
impl Backing for Cursor<Vec<u8>> {
    fn is_seekable(&self) -> bool {
        true
    }

    async fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position())
    }

    async fn stream_len(&mut self) -> io::Result<u64> {
        Ok(self.get_ref().len() as u64)
    }

    async fn set_len(&mut self, len: u64) -> io::Result<()> {
        self.get_mut().resize(len as usize, 0);

        Ok(())
    }
}

#[async_trait]
impl<B: Backing + ?Sized> Backing for &mut B {
    fn is_seekable(&self) -> bool {
        (**self).is_seekable()
    }

    async fn stream_position(&mut self) -> io::Result<u64> {
        (**self).stream_position().await
    }

    async fn stream_len(&mut self) -> io::Result<u64> {
        (**self).stream_len().await
    }

    async fn set_len(&mut self, len: u64) -> io::Result<()> {
        (**self).set_len(len).await
    }
}

/// Wrapper opting any writable stream out of the seekable fast paths,
/// for destinations such as pipes or sockets where capacity hints and
/// flush-time truncation do not apply
pub struct Unseekable<W> {
    inner: W,
}

impl<W> Unseekable<W> {
    /// Wrap `inner`, treating it as a purely sequential destination
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Return the wrapped stream
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for Unseekable<W> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}

#[async_trait]
impl<W: AsyncWrite + Send + Unpin> Backing for Unseekable<W> {}
