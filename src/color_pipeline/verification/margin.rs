//! Analytic error margin between the fixed-point and reference outputs
//!
//! Both sides truncate toward zero after clamping, and clamping never widens a
//! gap, so the integer outputs differ by at most `ceil(d)` where `d` bounds the
//! gap between the two unrounded values. With non-negative inputs that gap is
//! at most `sum(|q_i / 2^S - c_i|) * max_input` per channel.

use crate::color_pipeline::coefficients::{ChannelWeights, Convention, RealWeights};
use crate::color_pipeline::pixel::SampleWidth;

/// Covers `f64` evaluation error in the reference model.
const EVALUATION_SLACK: f64 = 1e-6;

fn channel_error(fixed: &ChannelWeights, real: &RealWeights, scale: u32) -> f64 {
    let factor = f64::from(1u32 << scale);
    [(fixed.r, real.r), (fixed.g, real.g), (fixed.b, real.b)]
        .iter()
        .map(|&(q, c)| (f64::from(q) / factor - c).abs())
        .sum()
}

/// Worst-case gap, over all output channels, between the unrounded fixed-point
/// and real-valued results for inputs of `input_width`.
pub fn quantization_error_bound(convention: Convention, input_width: SampleWidth) -> f64 {
    let fixed = convention.fixed();
    let real = convention.real();
    let max_input = f64::from(input_width.max_value());

    [(&fixed.y, &real.y), (&fixed.cb, &real.cb), (&fixed.cr, &real.cr)]
        .iter()
        .map(|(q, c)| channel_error(q, c, fixed.scale) * max_input)
        .fold(0.0, f64::max)
}

/// Smallest margin the sweep can use without false mismatches.
pub fn analytic_margin(convention: Convention, input_width: SampleWidth) -> i32 {
    let bound = quantization_error_bound(convention, input_width) + EVALUATION_SLACK;
    (bound.ceil() as i32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margins_per_convention_and_width() {
        assert_eq!(analytic_margin(Convention::Difference, SampleWidth::Bits8), 1);
        assert_eq!(analytic_margin(Convention::Difference, SampleWidth::Bits10), 1);
        assert_eq!(analytic_margin(Convention::OffsetCentered, SampleWidth::Bits8), 1);
        assert_eq!(analytic_margin(Convention::OffsetCentered, SampleWidth::Bits10), 4);
    }

    #[test]
    fn test_bound_grows_with_input_width() {
        for convention in [Convention::Difference, Convention::OffsetCentered] {
            let narrow = quantization_error_bound(convention, SampleWidth::Bits8);
            let wide = quantization_error_bound(convention, SampleWidth::Bits10);
            assert!(wide > narrow);
        }
    }
}
