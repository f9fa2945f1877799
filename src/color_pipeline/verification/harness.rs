use std::collections::VecDeque;
use std::thread;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::color_pipeline::common::error::{ConversionError, Result};
use crate::color_pipeline::converter::ColorConverter;
use crate::color_pipeline::pixel::PixelRgb;
use crate::color_pipeline::quantized::{FixedPointConverter, StagedPipeline};
use crate::color_pipeline::reference::ReferenceModel;
use crate::color_pipeline::streaming::StreamConverter;
use crate::color_pipeline::verification::report::{SweepReport, Tally};
use crate::color_pipeline::verification::types::{ChannelRange, ExecutionModel, SweepConfig};

/// Every `(R, G, B)` triple of the three ranges, R outermost.
fn sweep_inputs(
    r_range: ChannelRange,
    g_range: ChannelRange,
    b_range: ChannelRange,
) -> impl Iterator<Item = PixelRgb> + Send {
    r_range.values().flat_map(move |r| {
        g_range.values().flat_map(move |g| {
            b_range
                .values()
                .map(move |b| PixelRgb::new_unchecked(r, g, b))
        })
    })
}

/// Compares an `actual` converter against an `expected` one over a sweep.
pub struct Verifier<A: ColorConverter, E: ColorConverter> {
    actual: A,
    expected: E,
    config: SweepConfig,
}

impl Verifier<FixedPointConverter, ReferenceModel> {
    /// Fixed-point converter against the reference model, both on the configured convention.
    pub fn new(config: SweepConfig) -> Result<Self> {
        let actual = FixedPointConverter::new(config.convention, config.output_width);
        let expected = ReferenceModel::new(config.convention, config.output_width);
        Self::with_custom(actual, expected, config)
    }
}

impl<A: ColorConverter, E: ColorConverter> Verifier<A, E> {
    pub fn with_custom(actual: A, expected: E, config: SweepConfig) -> Result<Self> {
        config.validate()?;
        if actual.convention() != expected.convention() {
            return Err(ConversionError::ConventionMismatch {
                actual: actual.convention(),
                expected: expected.convention(),
            });
        }
        Ok(Self {
            actual,
            expected,
            config,
        })
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    fn inputs(&self) -> impl Iterator<Item = PixelRgb> + Send {
        sweep_inputs(self.config.r_range, self.config.g_range, self.config.b_range)
    }

    fn tally(&self) -> Tally {
        Tally::new(self.config.effective_margin(), self.config.max_recorded)
    }

    /// Runs the full sweep; mismatches are counted, never fatal.
    #[instrument(skip(self), fields(
        convention = %self.config.convention,
        execution = %self.config.execution,
        vectors = self.config.vector_count(),
    ))]
    pub fn run(&self) -> Result<SweepReport> {
        info!(
            margin = self.config.effective_margin(),
            r = %self.config.r_range,
            g = %self.config.g_range,
            b = %self.config.b_range,
            "Starting sweep"
        );
        let started = Instant::now();

        let tally = match self.config.execution {
            ExecutionModel::Combinational if self.config.parallel => self.run_parallel(),
            ExecutionModel::Combinational => self.run_combinational(),
            ExecutionModel::Staged => self.run_staged(self.staged_pipeline()?),
            ExecutionModel::Streaming => self.run_streaming(self.staged_pipeline()?)?,
        };

        let report = tally.into_report(
            self.config.convention,
            self.config.execution,
            started.elapsed(),
        );
        info!(
            vectors = report.vectors,
            mismatches = report.mismatches,
            max_error = report.max_error,
            passed = report.passed(),
            "Sweep complete"
        );
        Ok(report)
    }

    fn staged_pipeline(&self) -> Result<StagedPipeline> {
        self.actual
            .pipeline()
            .ok_or(ConversionError::UnsupportedExecution(self.config.execution))
    }

    fn run_combinational(&self) -> Tally {
        let mut tally = self.tally();
        for input in self.inputs() {
            tally.compare(input, self.actual.convert(input), self.expected.convert(input));
        }
        tally
    }

    fn run_parallel(&self) -> Tally {
        let (g_range, b_range) = (self.config.g_range, self.config.b_range);
        let lanes: Vec<Tally> = self
            .config
            .r_range
            .values()
            .collect::<Vec<u16>>()
            .into_par_iter()
            .map(|r| {
                let mut tally = self.tally();
                for input in sweep_inputs(ChannelRange::new(r, r), g_range, b_range) {
                    tally.compare(input, self.actual.convert(input), self.expected.convert(input));
                }
                tally
            })
            .collect();

        debug!(lanes = lanes.len(), "Merging parallel lanes");
        let mut tally = self.tally();
        for lane in lanes {
            tally.merge(lane);
        }
        tally
    }

    /// One tick per input; the reference runs on the input each delayed output belongs to.
    fn run_staged(&self, mut pipeline: StagedPipeline) -> Tally {
        let mut tally = self.tally();
        let mut in_flight: VecDeque<PixelRgb> = VecDeque::new();

        let retire = |tally: &mut Tally, in_flight: &mut VecDeque<PixelRgb>, actual| {
            if let Some(input) = in_flight.pop_front() {
                tally.compare(input, actual, self.expected.convert(input));
            }
        };

        for input in self.inputs() {
            in_flight.push_back(input);
            if let Some(actual) = pipeline.tick(Some(input)) {
                retire(&mut tally, &mut in_flight, actual);
            }
        }
        for actual in pipeline.drain() {
            retire(&mut tally, &mut in_flight, actual);
        }

        debug!(ticks = pipeline.ticks(), "Staged sweep finished");
        tally
    }

    fn run_streaming(&self, pipeline: StagedPipeline) -> Result<Tally> {
        let stream = StreamConverter::spawn(pipeline, self.config.queue_depth)?;
        let (writer, reader, worker) = stream.into_parts();
        let producer_inputs =
            sweep_inputs(self.config.r_range, self.config.g_range, self.config.b_range);

        let tally = thread::scope(|scope| {
            scope.spawn(move || {
                for input in producer_inputs {
                    if writer.write(input).is_err() {
                        break;
                    }
                }
            });

            let mut tally = self.tally();
            for (input, actual) in self.inputs().zip(reader.iter()) {
                tally.compare(input, actual, self.expected.convert(input));
            }
            tally
        });

        let ticks = worker.join()?;
        debug!(ticks, "Streaming sweep finished");

        if tally.vectors() != self.config.vector_count() {
            return Err(ConversionError::QueueDisconnected);
        }
        Ok(tally)
    }
}
