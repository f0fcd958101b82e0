#![deny(missing_docs)]

//! Outflow is a small transport layer for the byte stream produced by an
//! upstream encoding pipeline.
//!
//! The [`sink`] module defines the destination abstraction: a polymorphic
//! [`Sink`] contract with capacity negotiation, chunked writes, flushing and
//! scoped release, together with an in-memory implementation and one backed
//! by an externally supplied stream.
//!
//! The [`pump`] module drains any readable source into a [`Sink`] in
//! fixed-size chunks, honouring a cancellation token at every suspension
//! point.
//!
//! The [`perf`] module parses the timing report an encoder emits alongside
//! its output; the core sink and pump layers do not depend on it.
//!
//! [`sink`]: self::sink
//! [`Sink`]: self::sink::Sink
//! [`pump`]: self::pump
//! [`perf`]: self::perf

/// Timing information reported by the upstream encoder
pub mod perf;

/// Generic source-to-sink copy algorithm
pub mod pump;

/// Destination abstractions for encoded byte output
pub mod sink;

#[cfg(any(test, feature = "test"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test")))]
/// Test utilities that are used all across the crate
pub mod test;

/// Re-export `async_trait` to use in implementing custom sinks and sources
pub use async_trait::async_trait;
