use crate::color_pipeline::coefficients::Convention;
use crate::color_pipeline::pixel::{PixelRgb, PixelYCbCr, SampleWidth};
use crate::color_pipeline::quantized::StagedPipeline;

/// A pure per-pixel RGB to YCbCr transform.
///
/// Implementations hold no state between calls, so a converter can be shared
/// across threads and evaluated on independent lanes.
pub trait ColorConverter: Sync {
    fn convention(&self) -> Convention;
    fn output_width(&self) -> SampleWidth;
    fn convert(&self, pixel: PixelRgb) -> PixelYCbCr;

    /// Clocked form of the same transform, for converters that have one.
    fn pipeline(&self) -> Option<StagedPipeline> {
        None
    }
}
