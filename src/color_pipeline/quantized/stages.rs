//! Pure stage functions of the fixed-point datapath
//!
//! Stage A forms the nine partial products, stage B reduces them to one wide
//! accumulator per output channel, stage C shifts the scale back out and
//! saturates to the output width.

use crate::color_pipeline::coefficients::{ChannelWeights, Convention, FixedCoefficientSet};
use crate::color_pipeline::pixel::{PixelRgb, PixelYCbCr, SampleWidth};

/// Output of stage A: `[w_r * R, w_g * G, w_b * B]` per output channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialProducts {
    pub y: [i32; 3],
    pub cb: [i32; 3],
    pub cr: [i32; 3],
}

/// Output of stage B: unshifted weighted sums, still carrying the `2^S` scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accumulators {
    pub y: i32,
    pub cb: i32,
    pub cr: i32,
}

/// One fixed-point datapath: a coefficient table bound to an output width
#[derive(Debug, Clone, Copy)]
pub struct Datapath {
    coefficients: &'static FixedCoefficientSet,
    output_width: SampleWidth,
    // bias already shifted left by the scale, one per output channel
    bias: [i32; 3],
}

impl Datapath {
    pub fn new(coefficients: &'static FixedCoefficientSet, output_width: SampleWidth) -> Self {
        let scaled = |w: &ChannelWeights| w.bias.value(output_width) << coefficients.scale;
        Self {
            coefficients,
            output_width,
            bias: [
                scaled(&coefficients.y),
                scaled(&coefficients.cb),
                scaled(&coefficients.cr),
            ],
        }
    }

    pub fn convention(&self) -> Convention {
        self.coefficients.convention
    }

    pub fn output_width(&self) -> SampleWidth {
        self.output_width
    }

    pub fn coefficients(&self) -> &'static FixedCoefficientSet {
        self.coefficients
    }

    pub fn stage_a(&self, pixel: PixelRgb) -> PartialProducts {
        let (r, g, b) = (
            i32::from(pixel.r()),
            i32::from(pixel.g()),
            i32::from(pixel.b()),
        );
        let products = |w: &ChannelWeights| [w.r * r, w.g * g, w.b * b];
        PartialProducts {
            y: products(&self.coefficients.y),
            cb: products(&self.coefficients.cb),
            cr: products(&self.coefficients.cr),
        }
    }

    pub fn stage_b(&self, products: &PartialProducts) -> Accumulators {
        let [y_bias, cb_bias, cr_bias] = self.bias;
        Accumulators {
            y: products.y.iter().sum::<i32>() + y_bias,
            cb: products.cb.iter().sum::<i32>() + cb_bias,
            cr: products.cr.iter().sum::<i32>() + cr_bias,
        }
    }

    pub fn stage_c(&self, sums: &Accumulators) -> PixelYCbCr {
        let scale = self.coefficients.scale;
        let max = self.output_width.max_value();
        PixelYCbCr::new(
            saturate(sums.y, scale, max),
            saturate(sums.cb, scale, max),
            saturate(sums.cr, scale, max),
        )
    }
}

/// Shifts `acc` down by `scale` bits and saturates it into `[0, max]`.
///
/// Both range checks look at the wide accumulator, never at a narrowed value.
pub fn saturate(acc: i32, scale: u32, max: u16) -> u16 {
    if acc < 0 {
        return 0;
    }
    let shifted = acc >> scale;
    if shifted > i32::from(max) {
        max
    } else {
        shifted as u16
    }
}
