//! Coefficient set types

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::color_pipeline::coefficients::tables;
use crate::color_pipeline::common::error::ConversionError;
use crate::color_pipeline::pixel::{Channel, SampleWidth};

/// Coefficient convention shared by a converter pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Convention {
    /// `Cr = 0.713(R - Y)`, `Cb = 0.565(B - Y)`, no chroma offset, scale `2^10`
    Difference,
    /// `Cb`/`Cr` centered on the chroma midpoint, scale `2^8`
    #[default]
    OffsetCentered,
}

impl Convention {
    pub fn fixed(self) -> &'static FixedCoefficientSet {
        match self {
            Convention::Difference => &tables::DIFFERENCE_FIXED,
            Convention::OffsetCentered => &tables::OFFSET_CENTERED_FIXED,
        }
    }

    pub fn real(self) -> &'static RealCoefficientSet {
        match self {
            Convention::Difference => &tables::DIFFERENCE_REAL,
            Convention::OffsetCentered => &tables::OFFSET_CENTERED_REAL,
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::Difference => f.write_str("difference"),
            Convention::OffsetCentered => f.write_str("offset-centered"),
        }
    }
}

impl FromStr for Convention {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "difference" => Ok(Convention::Difference),
            "offset-centered" | "offset" => Ok(Convention::OffsetCentered),
            other => Err(ConversionError::UnknownConvention(other.to_string())),
        }
    }
}

/// Additive term applied to a channel after weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Zero,
    /// `2^(Wout - 1)`, i.e. 128 for 8-bit output
    Midpoint,
}

impl Bias {
    pub const fn value(self, output_width: SampleWidth) -> i32 {
        match self {
            Bias::Zero => 0,
            Bias::Midpoint => output_width.midpoint() as i32,
        }
    }
}

/// Integer weights for one output channel, already scaled by `2^S`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelWeights {
    pub r: i32,
    pub g: i32,
    pub b: i32,
    pub bias: Bias,
}

/// Quantized coefficients for all three output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCoefficientSet {
    pub convention: Convention,
    /// Fixed-point scale `S`; every weight is `round(c * 2^S)`
    pub scale: u32,
    pub y: ChannelWeights,
    pub cb: ChannelWeights,
    pub cr: ChannelWeights,
}

impl FixedCoefficientSet {
    pub const fn channel(&self, channel: Channel) -> Option<&ChannelWeights> {
        match channel {
            Channel::Y => Some(&self.y),
            Channel::Cb => Some(&self.cb),
            Channel::Cr => Some(&self.cr),
            Channel::R | Channel::G | Channel::B => None,
        }
    }
}

/// Real-valued weights for one output channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealWeights {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub bias: Bias,
}

impl RealWeights {
    /// Rounds each weight to the nearest multiple of `2^-scale`.
    pub fn quantize(&self, scale: u32) -> ChannelWeights {
        let factor = f64::from(1u32 << scale);
        ChannelWeights {
            r: (self.r * factor).round() as i32,
            g: (self.g * factor).round() as i32,
            b: (self.b * factor).round() as i32,
            bias: self.bias,
        }
    }
}

/// Canonical weights the fixed tables are derived from, as direct combinations of R, G, B
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealCoefficientSet {
    pub convention: Convention,
    pub y: RealWeights,
    pub cb: RealWeights,
    pub cr: RealWeights,
}

impl RealCoefficientSet {
    pub const fn channel(&self, channel: Channel) -> Option<&RealWeights> {
        match channel {
            Channel::Y => Some(&self.y),
            Channel::Cb => Some(&self.cb),
            Channel::Cr => Some(&self.cr),
            Channel::R | Channel::G | Channel::B => None,
        }
    }
}
