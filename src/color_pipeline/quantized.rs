//! Fixed-point conversion module
//!
//! Integer-only RGB to YCbCr datapath, usable as a single combinational call or
//! as a clocked three-stage pipeline.

mod stages;
mod fixed_point_converter;
mod staged_pipeline;

pub use stages::{Accumulators, Datapath, PartialProducts};
pub use fixed_point_converter::FixedPointConverter;
pub use staged_pipeline::{StagedPipeline, LATENCY};
