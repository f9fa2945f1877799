//! Pixel sample types
//!
//! Input and output pixel triples plus the sample widths they are validated against.

pub mod types;

pub use types::{Channel, PixelRgb, PixelYCbCr, SampleWidth};
