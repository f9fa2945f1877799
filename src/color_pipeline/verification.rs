//! Verification harness module
//!
//! Sweeps an input domain through the fixed-point converter and the reference
//! model and reports every channel that drifts beyond the allowed margin.

mod harness;
mod margin;
mod report;
pub mod types;


pub use harness::Verifier;
pub use margin::{analytic_margin, quantization_error_bound};
pub use report::{Mismatch, SweepReport};
pub use types::{ChannelRange, ExecutionModel, SweepConfig, SweepConfigBuilder};
