//! Types for pixel samples

use std::fmt;

use serde::Deserialize;

use crate::color_pipeline::common::error::{ConversionError, Result};

/// Width of one channel sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u32")]
pub enum SampleWidth {
    /// 8 bits per sample, `0..=255`
    Bits8,
    /// 10 bits per sample, `0..=1023`
    Bits10,
}

impl SampleWidth {
    pub const fn bits(self) -> u32 {
        match self {
            SampleWidth::Bits8 => 8,
            SampleWidth::Bits10 => 10,
        }
    }

    /// Largest representable sample, `2^W - 1`
    pub const fn max_value(self) -> u16 {
        (1u16 << self.bits()) - 1
    }

    /// Neutral chroma level, `2^(W-1)`
    pub const fn midpoint(self) -> u16 {
        1u16 << (self.bits() - 1)
    }
}

impl TryFrom<u32> for SampleWidth {
    type Error = ConversionError;

    fn try_from(bits: u32) -> Result<Self> {
        match bits {
            8 => Ok(SampleWidth::Bits8),
            10 => Ok(SampleWidth::Bits10),
            other => Err(ConversionError::UnsupportedBitWidth(other)),
        }
    }
}

impl fmt::Display for SampleWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// Names a single input or output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    R,
    G,
    B,
    Y,
    Cb,
    Cr,
}

impl Channel {
    pub const OUTPUTS: [Channel; 3] = [Channel::Y, Channel::Cb, Channel::Cr];
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::R => "R",
            Channel::G => "G",
            Channel::B => "B",
            Channel::Y => "Y",
            Channel::Cb => "Cb",
            Channel::Cr => "Cr",
        };
        f.write_str(name)
    }
}

/// One RGB input sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRgb {
    r: u16,
    g: u16,
    b: u16,
}

impl PixelRgb {
    /// Builds a pixel, rejecting any channel outside `[0, 2^W - 1]`.
    pub fn new(r: u16, g: u16, b: u16, width: SampleWidth) -> Result<Self> {
        let max = width.max_value();
        for (channel, value) in [(Channel::R, r), (Channel::G, g), (Channel::B, b)] {
            if value > max {
                return Err(ConversionError::SampleOutOfRange {
                    channel,
                    value,
                    bits: width.bits(),
                });
            }
        }
        Ok(Self { r, g, b })
    }

    /// 8-bit samples always fit either supported width.
    pub const fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as u16,
            g: g as u16,
            b: b as u16,
        }
    }

    /// Caller guarantees every channel already fits the input width.
    pub(crate) const fn new_unchecked(r: u16, g: u16, b: u16) -> Self {
        Self { r, g, b }
    }

    pub const fn r(&self) -> u16 {
        self.r
    }

    pub const fn g(&self) -> u16 {
        self.g
    }

    pub const fn b(&self) -> u16 {
        self.b
    }
}

impl fmt::Display for PixelRgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(R={}, G={}, B={})", self.r, self.g, self.b)
    }
}

/// One YCbCr output sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelYCbCr {
    y: u16,
    cb: u16,
    cr: u16,
}

impl PixelYCbCr {
    pub const fn new(y: u16, cb: u16, cr: u16) -> Self {
        Self { y, cb, cr }
    }

    pub const fn y(&self) -> u16 {
        self.y
    }

    pub const fn cb(&self) -> u16 {
        self.cb
    }

    pub const fn cr(&self) -> u16 {
        self.cr
    }

    /// Returns the value of an output channel, `None` for input channels.
    pub const fn get(&self, channel: Channel) -> Option<u16> {
        match channel {
            Channel::Y => Some(self.y),
            Channel::Cb => Some(self.cb),
            Channel::Cr => Some(self.cr),
            Channel::R | Channel::G | Channel::B => None,
        }
    }

    pub const fn channels(&self) -> [(Channel, u16); 3] {
        [(Channel::Y, self.y), (Channel::Cb, self.cb), (Channel::Cr, self.cr)]
    }
}

impl fmt::Display for PixelYCbCr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(Y={}, Cb={}, Cr={})", self.y, self.cb, self.cr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_width_bounds() {
        assert_eq!(SampleWidth::Bits8.max_value(), 255);
        assert_eq!(SampleWidth::Bits10.max_value(), 1023);
        assert_eq!(SampleWidth::Bits8.midpoint(), 128);
        assert_eq!(SampleWidth::Bits10.midpoint(), 512);
    }

    #[test]
    fn test_sample_width_from_bits() {
        assert_eq!(SampleWidth::try_from(8).unwrap(), SampleWidth::Bits8);
        assert_eq!(SampleWidth::try_from(10).unwrap(), SampleWidth::Bits10);
        assert!(matches!(
            SampleWidth::try_from(12),
            Err(ConversionError::UnsupportedBitWidth(12))
        ));
    }

    #[test]
    fn test_pixel_rejects_out_of_range_sample() {
        let result = PixelRgb::new(10, 256, 0, SampleWidth::Bits8);
        assert!(matches!(
            result,
            Err(ConversionError::SampleOutOfRange { channel: Channel::G, value: 256, bits: 8 })
        ));
        assert!(PixelRgb::new(1023, 1023, 1023, SampleWidth::Bits10).is_ok());
    }

    #[test]
    fn test_output_channel_lookup() {
        let px = PixelYCbCr::new(1, 2, 3);
        assert_eq!(px.get(Channel::Cb), Some(2));
        assert_eq!(px.get(Channel::R), None);
        assert_eq!(px.channels()[2], (Channel::Cr, 3));
    }
}
