//! Clocked form of the fixed-point datapath
//!
//! Every register is written from the previous tick's register contents only,
//! so no stage ever observes a value produced in the same tick.

use crate::color_pipeline::coefficients::Convention;
use crate::color_pipeline::pixel::{PixelRgb, PixelYCbCr, SampleWidth};
use crate::color_pipeline::quantized::stages::{Accumulators, Datapath, PartialProducts};

/// Ticks between accepting a pixel and presenting its result.
pub const LATENCY: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Register<T> {
    valid: bool,
    value: T,
}

impl<T: Copy + Default> Register<T> {
    fn load(value: Option<T>) -> Self {
        match value {
            Some(value) => Self { valid: true, value },
            None => Self::default(),
        }
    }

    fn map<U: Default>(&self, f: impl FnOnce(&T) -> U) -> Register<U> {
        if self.valid {
            Register { valid: true, value: f(&self.value) }
        } else {
            Register::default()
        }
    }

    fn get(&self) -> Option<T> {
        self.valid.then_some(self.value)
    }
}

/// Three-stage pipeline with an input latch.
///
/// A pixel passed to tick `n` is latched, turned into partial products on
/// tick `n + 1`, accumulated on tick `n + 2` and presented, saturated, as the
/// return value of tick `n + 3`. One pixel may be accepted on every tick.
#[derive(Debug, Clone)]
pub struct StagedPipeline {
    datapath: Datapath,
    accepted: Register<PixelRgb>,
    products: Register<PartialProducts>,
    sums: Register<Accumulators>,
    output: Register<PixelYCbCr>,
    reset_pending: bool,
    ticks: u64,
}

impl StagedPipeline {
    pub fn new(datapath: Datapath) -> Self {
        Self {
            datapath,
            accepted: Register::default(),
            products: Register::default(),
            sums: Register::default(),
            output: Register::default(),
            reset_pending: false,
            ticks: 0,
        }
    }

    pub fn convention(&self) -> Convention {
        self.datapath.convention()
    }

    pub fn output_width(&self) -> SampleWidth {
        self.datapath.output_width()
    }

    /// Advances every stage by one tick and returns the output register.
    pub fn tick(&mut self, input: Option<PixelRgb>) -> Option<PixelYCbCr> {
        self.ticks += 1;

        if self.reset_pending {
            // synchronous reset: the input presented on this tick is dropped
            self.clear();
            self.reset_pending = false;
            return None;
        }

        let output = self.sums.map(|sums| self.datapath.stage_c(sums));
        let sums = self.products.map(|products| self.datapath.stage_b(products));
        let products = self.accepted.map(|&pixel| self.datapath.stage_a(pixel));

        self.output = output;
        self.sums = sums;
        self.products = products;
        self.accepted = Register::load(input);

        self.output.get()
    }

    /// Asserts reset; the next tick zeroes every register instead of advancing.
    pub fn reset(&mut self) {
        self.reset_pending = true;
    }

    /// Pixels accepted but not yet presented.
    pub fn in_flight(&self) -> usize {
        [self.accepted.valid, self.products.valid, self.sums.valid]
            .iter()
            .filter(|&&valid| valid)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight() == 0
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks bubbles until every in-flight pixel has been presented.
    pub fn drain(&mut self) -> Vec<PixelYCbCr> {
        let mut results = Vec::with_capacity(self.in_flight());
        while !self.is_empty() {
            if let Some(out) = self.tick(None) {
                results.push(out);
            }
        }
        results
    }

    fn clear(&mut self) {
        self.accepted = Register::default();
        self.products = Register::default();
        self.sums = Register::default();
        self.output = Register::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_pipeline::converter::ColorConverter;
    use crate::color_pipeline::quantized::FixedPointConverter;

    fn converter() -> FixedPointConverter {
        FixedPointConverter::new(Convention::OffsetCentered, SampleWidth::Bits8)
    }

    #[test]
    fn test_single_pulse_emerges_after_latency() {
        let converter = converter();
        let mut pipeline = converter.staged();
        let pulse = PixelRgb::from_u8(200, 10, 60);

        let mut outputs = Vec::new();
        outputs.push(pipeline.tick(Some(pulse)));
        for _ in 0..6 {
            outputs.push(pipeline.tick(None));
        }

        for (tick, out) in outputs.iter().enumerate() {
            if tick == LATENCY {
                assert_eq!(*out, Some(converter.convert(pulse)));
            } else {
                assert_eq!(*out, None, "unexpected output on tick {tick}");
            }
        }
    }

    #[test]
    fn test_one_result_per_tick_when_full() {
        let converter = converter();
        let mut pipeline = converter.staged();
        let pixels: Vec<PixelRgb> = (0..10u8)
            .map(|v| PixelRgb::from_u8(v * 20, v, 255 - v))
            .collect();

        let mut results = Vec::new();
        for (tick, &px) in pixels.iter().enumerate() {
            let out = pipeline.tick(Some(px));
            if tick >= LATENCY {
                let out = out.expect("pipeline full");
                assert_eq!(out, converter.convert(pixels[tick - LATENCY]));
            }
            results.extend(out);
        }
        results.extend(pipeline.drain());

        assert_eq!(results, converter.convert_slice(&pixels));
    }

    #[test]
    fn test_zero_pixel_is_distinguished_from_bubble() {
        let mut pipeline = converter().staged();
        pipeline.tick(Some(PixelRgb::from_u8(0, 0, 0)));
        pipeline.tick(None);
        pipeline.tick(None);
        assert_eq!(pipeline.tick(None), Some(PixelYCbCr::new(0, 128, 128)));
    }

    #[test]
    fn test_reset_clears_registers_on_next_tick() {
        let mut pipeline = converter().staged();
        pipeline.tick(Some(PixelRgb::from_u8(1, 2, 3)));
        pipeline.tick(Some(PixelRgb::from_u8(4, 5, 6)));
        assert_eq!(pipeline.in_flight(), 2);

        pipeline.reset();
        assert_eq!(pipeline.in_flight(), 2);

        assert_eq!(pipeline.tick(Some(PixelRgb::from_u8(7, 8, 9))), None);
        assert!(pipeline.is_empty());
        for _ in 0..LATENCY {
            assert_eq!(pipeline.tick(None), None);
        }
    }

    #[test]
    fn test_drain_counts_ticks() {
        let mut pipeline = converter().staged();
        pipeline.tick(Some(PixelRgb::from_u8(9, 9, 9)));
        let drained = pipeline.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(pipeline.ticks(), 1 + LATENCY as u64);
    }
}
