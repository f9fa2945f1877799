use crate::color_pipeline::coefficients::Convention;
use crate::color_pipeline::converter::ColorConverter;
use crate::color_pipeline::pixel::{PixelRgb, PixelYCbCr, SampleWidth};

/// Golden model evaluating the canonical equations in `f64`.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceModel {
    convention: Convention,
    output_width: SampleWidth,
}

impl ReferenceModel {
    pub fn new(convention: Convention, output_width: SampleWidth) -> Self {
        Self {
            convention,
            output_width,
        }
    }

    /// Unclamped `(Y, Cb, Cr)` for one pixel.
    pub fn evaluate(&self, pixel: PixelRgb) -> (f64, f64, f64) {
        let r = f64::from(pixel.r());
        let g = f64::from(pixel.g());
        let b = f64::from(pixel.b());

        let y = 0.299 * r + 0.587 * g + 0.114 * b;
        match self.convention {
            Convention::Difference => {
                let cr = 0.713 * (r - y);
                let cb = 0.565 * (b - y);
                (y, cb, cr)
            }
            Convention::OffsetCentered => {
                let bias = f64::from(self.output_width.midpoint());
                let cb = -0.169 * r - 0.332 * g + 0.5 * b + bias;
                let cr = 0.5 * r - 0.419 * g - 0.0813 * b + bias;
                (y, cb, cr)
            }
        }
    }

    fn clamp(&self, value: f64) -> u16 {
        let max = f64::from(self.output_width.max_value());
        value.clamp(0.0, max) as u16
    }
}

impl ColorConverter for ReferenceModel {
    fn convention(&self) -> Convention {
        self.convention
    }

    fn output_width(&self) -> SampleWidth {
        self.output_width
    }

    fn convert(&self, pixel: PixelRgb) -> PixelYCbCr {
        let (y, cb, cr) = self.evaluate(pixel);
        PixelYCbCr::new(self.clamp(y), self.clamp(cb), self.clamp(cr))
    }
}
