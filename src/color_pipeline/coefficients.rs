//! Conversion coefficients
//!
//! The canonical real-valued weights of both coefficient conventions and the
//! integer tables quantized from them.

mod tables;
pub mod types;

pub use tables::{
    DIFFERENCE_FIXED, DIFFERENCE_REAL, OFFSET_CENTERED_FIXED, OFFSET_CENTERED_REAL,
};
pub use types::{
    Bias, ChannelWeights, Convention, FixedCoefficientSet, RealCoefficientSet, RealWeights,
};
