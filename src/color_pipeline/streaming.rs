//! Streaming boundary module
//!
//! Bounded input and output queues around a worker thread that clocks a
//! staged pipeline.

mod stream_converter;

pub use stream_converter::{StreamConverter, StreamReader, StreamWorker, StreamWriter};
