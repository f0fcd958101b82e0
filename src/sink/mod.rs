mod backing;
pub(crate) mod errors;
mod memory;
mod sink;
mod stream;

pub use backing::Backing;
pub use backing::Unseekable;

pub use errors::SinkError;

pub use memory::MemorySink;

pub use sink::Sink;

pub use stream::StreamSink;
