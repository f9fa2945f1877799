use rayon::prelude::*;
use tracing::debug;

use crate::color_pipeline::coefficients::Convention;
use crate::color_pipeline::converter::ColorConverter;
use crate::color_pipeline::pixel::{PixelRgb, PixelYCbCr, SampleWidth};
use crate::color_pipeline::quantized::stages::Datapath;
use crate::color_pipeline::quantized::staged_pipeline::StagedPipeline;

/// Combinational form of the fixed-point transform: all three stages in one call.
#[derive(Debug, Clone, Copy)]
pub struct FixedPointConverter {
    datapath: Datapath,
}

impl FixedPointConverter {
    pub fn new(convention: Convention, output_width: SampleWidth) -> Self {
        Self {
            datapath: Datapath::new(convention.fixed(), output_width),
        }
    }

    pub fn datapath(&self) -> &Datapath {
        &self.datapath
    }

    /// A clocked pipeline over the same datapath, with every register cleared.
    pub fn staged(&self) -> StagedPipeline {
        StagedPipeline::new(self.datapath)
    }

    pub fn convert_slice(&self, pixels: &[PixelRgb]) -> Vec<PixelYCbCr> {
        pixels.iter().map(|&px| self.convert(px)).collect()
    }

    /// Converts a batch across rayon lanes; output order matches input order.
    pub fn convert_slice_parallel(&self, pixels: &[PixelRgb]) -> Vec<PixelYCbCr> {
        debug!(pixels = pixels.len(), "Converting batch in parallel");
        pixels.par_iter().map(|&px| self.convert(px)).collect()
    }
}

impl ColorConverter for FixedPointConverter {
    fn convention(&self) -> Convention {
        self.datapath.convention()
    }

    fn output_width(&self) -> SampleWidth {
        self.datapath.output_width()
    }

    fn convert(&self, pixel: PixelRgb) -> PixelYCbCr {
        let products = self.datapath.stage_a(pixel);
        let sums = self.datapath.stage_b(&products);
        self.datapath.stage_c(&sums)
    }

    fn pipeline(&self) -> Option<StagedPipeline> {
        Some(self.staged())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn difference_10bit() -> FixedPointConverter {
        FixedPointConverter::new(Convention::Difference, SampleWidth::Bits10)
    }

    fn offset_8bit() -> FixedPointConverter {
        FixedPointConverter::new(Convention::OffsetCentered, SampleWidth::Bits8)
    }

    #[test]
    fn test_zero_input_difference_convention() {
        let out = difference_10bit().convert(PixelRgb::from_u8(0, 0, 0));
        assert_eq!(out, PixelYCbCr::new(0, 0, 0));
    }

    #[test]
    fn test_zero_input_offset_centered_convention() {
        let out = offset_8bit().convert(PixelRgb::from_u8(0, 0, 0));
        assert_eq!(out, PixelYCbCr::new(0, 128, 128));
    }

    #[test]
    fn test_pure_red_luma() {
        let out = difference_10bit().convert(PixelRgb::from_u8(63, 0, 0));
        assert_eq!(out.y(), 18);
    }

    #[test]
    fn test_max_input_saturates_luma() {
        let converter = FixedPointConverter::new(Convention::Difference, SampleWidth::Bits8);
        let out = converter.convert(PixelRgb::from_u8(255, 255, 255));
        assert_eq!(out.y(), 255);

        let converter = difference_10bit();
        let white = PixelRgb::new(1023, 1023, 1023, SampleWidth::Bits10).unwrap();
        assert_eq!(converter.convert(white).y(), 1023);
    }

    #[test]
    fn test_difference_chroma_saturates_below_zero() {
        // B - Y is negative for pure red
        let out = difference_10bit().convert(PixelRgb::from_u8(255, 0, 0));
        assert_eq!(out.cb(), 0);
        assert!(out.cr() > 0);
    }

    #[test]
    fn test_parallel_batch_matches_sequential() {
        let converter = offset_8bit();
        let pixels: Vec<PixelRgb> = (0..=255u8)
            .map(|v| PixelRgb::from_u8(v, 255 - v, v / 2))
            .collect();
        assert_eq!(
            converter.convert_slice(&pixels),
            converter.convert_slice_parallel(&pixels)
        );
    }

    proptest! {
        #[test]
        fn prop_outputs_stay_in_range(r in 0u16..=1023, g in 0u16..=1023, b in 0u16..=1023) {
            let pixel = PixelRgb::new(r, g, b, SampleWidth::Bits10).unwrap();
            for convention in [Convention::Difference, Convention::OffsetCentered] {
                for width in [SampleWidth::Bits8, SampleWidth::Bits10] {
                    let out = FixedPointConverter::new(convention, width).convert(pixel);
                    for (_, value) in out.channels() {
                        prop_assert!(value <= width.max_value());
                    }
                }
            }
        }

        #[test]
        fn prop_luma_is_monotonic(r in 0u8..255, g in 0u8..255, b in 0u8..255) {
            let converter = offset_8bit();
            let base = converter.convert(PixelRgb::from_u8(r, g, b)).y();
            prop_assert!(converter.convert(PixelRgb::from_u8(r + 1, g, b)).y() >= base);
            prop_assert!(converter.convert(PixelRgb::from_u8(r, g + 1, b)).y() >= base);
            prop_assert!(converter.convert(PixelRgb::from_u8(r, g, b + 1)).y() >= base);
        }
    }
}
