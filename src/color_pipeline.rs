//! RGB to YCbCr color pipeline
//!
//! This module provides a fixed-point RGB to YCbCr transform, the real-valued
//! reference model it is checked against, a streaming wrapper around the staged
//! datapath, and the sweep harness that compares the two.

pub mod common;
pub mod pixel;
pub mod coefficients;
pub mod converter;
pub mod quantized;
pub mod reference;
pub mod streaming;
pub mod verification;

pub use common::{
    ConversionError,
    Result,
};

pub use pixel::{
    Channel,
    PixelRgb,
    PixelYCbCr,
    SampleWidth,
};

pub use coefficients::{
    Convention,
    FixedCoefficientSet,
    RealCoefficientSet,
};

pub use converter::ColorConverter;

pub use quantized::{
    FixedPointConverter,
    StagedPipeline,
};

pub use reference::ReferenceModel;

pub use streaming::StreamConverter;

pub use verification::{
    ChannelRange,
    ExecutionModel,
    Mismatch,
    SweepConfig,
    SweepConfigBuilder,
    SweepReport,
    Verifier,
};
