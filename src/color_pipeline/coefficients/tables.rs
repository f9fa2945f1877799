use crate::color_pipeline::coefficients::types::{
    Bias, ChannelWeights, Convention, FixedCoefficientSet, RealCoefficientSet, RealWeights,
};

const KR: f64 = 0.299;
const KG: f64 = 0.587;
const KB: f64 = 0.114;

const CR_SCALE: f64 = 0.713;
const CB_SCALE: f64 = 0.565;

/// `Cr = 0.713(R - Y)` and `Cb = 0.565(B - Y)` expanded over R, G, B.
pub const DIFFERENCE_REAL: RealCoefficientSet = RealCoefficientSet {
    convention: Convention::Difference,
    y: RealWeights { r: KR, g: KG, b: KB, bias: Bias::Zero },
    cb: RealWeights {
        r: -CB_SCALE * KR,
        g: -CB_SCALE * KG,
        b: CB_SCALE * (1.0 - KB),
        bias: Bias::Zero,
    },
    cr: RealWeights {
        r: CR_SCALE * (1.0 - KR),
        g: -CR_SCALE * KG,
        b: -CR_SCALE * KB,
        bias: Bias::Zero,
    },
};

//  channel |    R |    G |    B
//  --------+------+------+-----
//  Y       |  306 |  601 |  117
//  Cb      | -173 | -340 |  513
//  Cr      |  512 | -429 |  -83
pub const DIFFERENCE_FIXED: FixedCoefficientSet = FixedCoefficientSet {
    convention: Convention::Difference,
    scale: 10,
    y: ChannelWeights { r: 306, g: 601, b: 117, bias: Bias::Zero },
    cb: ChannelWeights { r: -173, g: -340, b: 513, bias: Bias::Zero },
    cr: ChannelWeights { r: 512, g: -429, b: -83, bias: Bias::Zero },
};

pub const OFFSET_CENTERED_REAL: RealCoefficientSet = RealCoefficientSet {
    convention: Convention::OffsetCentered,
    y: RealWeights { r: KR, g: KG, b: KB, bias: Bias::Zero },
    cb: RealWeights { r: -0.169, g: -0.332, b: 0.5, bias: Bias::Midpoint },
    cr: RealWeights { r: 0.5, g: -0.419, b: -0.0813, bias: Bias::Midpoint },
};

//  channel |    R |    G |    B | bias
//  --------+------+------+------+-----
//  Y       |   77 |  150 |   29 |    0
//  Cb      |  -43 |  -85 |  128 |  128
//  Cr      |  128 | -107 |  -21 |  128
pub const OFFSET_CENTERED_FIXED: FixedCoefficientSet = FixedCoefficientSet {
    convention: Convention::OffsetCentered,
    scale: 8,
    y: ChannelWeights { r: 77, g: 150, b: 29, bias: Bias::Zero },
    cb: ChannelWeights { r: -43, g: -85, b: 128, bias: Bias::Midpoint },
    cr: ChannelWeights { r: 128, g: -107, b: -21, bias: Bias::Midpoint },
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_pipeline::pixel::Channel;

    fn assert_quantized_from(real: &RealCoefficientSet, fixed: &FixedCoefficientSet) {
        assert_eq!(real.convention, fixed.convention);
        for channel in Channel::OUTPUTS {
            let expected = real.channel(channel).unwrap().quantize(fixed.scale);
            assert_eq!(
                fixed.channel(channel).unwrap(),
                &expected,
                "{channel} weights of {} table",
                fixed.convention
            );
        }
    }

    #[test]
    fn test_difference_table_matches_rounded_weights() {
        assert_quantized_from(&DIFFERENCE_REAL, &DIFFERENCE_FIXED);
    }

    #[test]
    fn test_offset_centered_table_matches_rounded_weights() {
        assert_quantized_from(&OFFSET_CENTERED_REAL, &OFFSET_CENTERED_FIXED);
    }

    #[test]
    fn test_luma_weights_sum_to_unity() {
        for fixed in [&DIFFERENCE_FIXED, &OFFSET_CENTERED_FIXED] {
            let y = fixed.y;
            assert_eq!(y.r + y.g + y.b, 1 << fixed.scale);
        }
    }
}
