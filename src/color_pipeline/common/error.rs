use thiserror::Error;

use crate::color_pipeline::coefficients::Convention;
use crate::color_pipeline::pixel::Channel;
use crate::color_pipeline::verification::ExecutionModel;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Sample {value} on channel {channel} exceeds the {bits}-bit range")]
    SampleOutOfRange { channel: Channel, value: u16, bits: u32 },

    #[error("Unsupported sample width: {0} bits (expected 8 or 10)")]
    UnsupportedBitWidth(u32),

    #[error("Invalid error margin: {0} (must be greater than zero)")]
    InvalidMargin(i32),

    #[error("Range for channel {channel} ends at {max}, beyond the {bits}-bit input width")]
    RangeExceedsWidth { channel: Channel, max: u16, bits: u32 },

    #[error("Range for channel {channel} is empty: {min}..={max}")]
    EmptyRange { channel: Channel, min: u16, max: u16 },

    #[error("Unknown coefficient convention: {0}")]
    UnknownConvention(String),

    #[error("Invalid range expression: {0}")]
    InvalidRange(String),

    #[error("Invalid queue depth: {0} (must be at least 1)")]
    InvalidQueueDepth(usize),

    #[error("Converters disagree on coefficient convention: actual={actual}, expected={expected}")]
    ConventionMismatch { actual: Convention, expected: Convention },

    #[error("Converter has no staged form for the {0} execution model")]
    UnsupportedExecution(ExecutionModel),

    #[error("Stream queue disconnected")]
    QueueDisconnected,

    #[error("Failed to read config file: {0}")]
    ConfigReadError(String),

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;
