mod pump;
mod source;

pub use pump::copy_to_sink;
pub use pump::CHUNK_SIZE;

pub use source::Opaque;
pub use source::Source;
