use snafu::Snafu;

use std::io::Error;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
/// Error encountered when writing to a [`Sink`]
///
/// [`Sink`]: super::Sink
pub enum SinkError {
    #[snafu(display("sink used before any capacity request"))]
    /// A write, flush or terminal read was attempted before the first
    /// capacity request was made
    NotInitialized,

    #[snafu(display("empty chunk passed to write"))]
    /// An empty byte slice was passed to a write
    EmptyChunk,

    #[snafu(display("operation cancelled"))]
    /// The cancellation signal fired before the operation completed
    Cancelled,

    #[snafu(display("i/o error: {}", source))]
    /// The underlying transport reported an error
    Io {
        /// Underlying error cause
        source: Error,
    },
}
