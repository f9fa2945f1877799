use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::color_pipeline::coefficients::Convention;
use crate::color_pipeline::pixel::{Channel, PixelRgb, PixelYCbCr};
use crate::color_pipeline::verification::types::ExecutionModel;

/// One output channel that drifted beyond the margin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub channel: Channel,
    pub actual: u16,
    pub expected: u16,
    pub input: PixelRgb,
}

impl Mismatch {
    pub fn diff(&self) -> u16 {
        self.actual.abs_diff(self.expected)
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mismatch: actual = {}, expected = {}, diff = {}, input = {}",
            self.channel,
            self.actual,
            self.expected,
            self.diff(),
            self.input
        )
    }
}

/// Running comparison state of a sweep, or of one lane of it
#[derive(Debug, Clone)]
pub(crate) struct Tally {
    margin: u16,
    max_recorded: usize,
    vectors: u64,
    mismatches: u64,
    per_channel: [u64; 3],
    max_error: u16,
    records: Vec<Mismatch>,
}

impl Tally {
    pub(crate) fn new(margin: i32, max_recorded: usize) -> Self {
        Self {
            margin: u16::try_from(margin.max(0)).unwrap_or(u16::MAX),
            max_recorded,
            vectors: 0,
            mismatches: 0,
            per_channel: [0; 3],
            max_error: 0,
            records: Vec::new(),
        }
    }

    /// Compares every output channel of one vector independently.
    pub(crate) fn compare(&mut self, input: PixelRgb, actual: PixelYCbCr, expected: PixelYCbCr) {
        self.vectors += 1;
        let pairs = actual.channels().into_iter().zip(expected.channels());
        for (slot, ((channel, actual), (_, expected))) in pairs.enumerate() {
            let diff = actual.abs_diff(expected);
            self.max_error = self.max_error.max(diff);
            if diff <= self.margin {
                continue;
            }
            let mismatch = Mismatch { channel, actual, expected, input };
            warn!("{}", mismatch);
            self.mismatches += 1;
            self.per_channel[slot] += 1;
            if self.records.len() < self.max_recorded {
                self.records.push(mismatch);
            }
        }
    }

    /// Folds a later lane into this one, keeping records in input order.
    pub(crate) fn merge(&mut self, other: Tally) {
        self.vectors += other.vectors;
        self.mismatches += other.mismatches;
        for (mine, theirs) in self.per_channel.iter_mut().zip(other.per_channel) {
            *mine += theirs;
        }
        self.max_error = self.max_error.max(other.max_error);
        let room = self.max_recorded.saturating_sub(self.records.len());
        self.records.extend(other.records.into_iter().take(room));
    }

    pub(crate) fn vectors(&self) -> u64 {
        self.vectors
    }

    pub(crate) fn into_report(
        self,
        convention: Convention,
        execution: ExecutionModel,
        elapsed: Duration,
    ) -> SweepReport {
        SweepReport {
            convention,
            execution,
            margin: self.margin,
            vectors: self.vectors,
            mismatches: self.mismatches,
            per_channel: self.per_channel,
            max_error: self.max_error,
            records: self.records,
            elapsed,
        }
    }
}

/// Outcome of a completed sweep
#[derive(Debug, Clone)]
pub struct SweepReport {
    pub convention: Convention,
    pub execution: ExecutionModel,
    pub margin: u16,
    /// Input triples compared
    pub vectors: u64,
    /// Channel comparisons beyond the margin
    pub mismatches: u64,
    /// Mismatch counts for Y, Cb, Cr
    pub per_channel: [u64; 3],
    /// Largest `|actual - expected|` seen on any channel
    pub max_error: u16,
    /// The first mismatches, in input order
    pub records: Vec<Mismatch>,
    pub elapsed: Duration,
}

impl SweepReport {
    pub fn passed(&self) -> bool {
        self.mismatches == 0
    }

    pub fn channel_mismatches(&self, channel: Channel) -> u64 {
        Channel::OUTPUTS
            .iter()
            .position(|&c| c == channel)
            .map_or(0, |slot| self.per_channel[slot])
    }

    pub fn print_summary(&self) {
        println!("\nSweep Summary ({}, {}):", self.convention, self.execution);
        println!("{:-<60}", "");
        println!("{:<30} {:>12}", "Vectors", self.vectors);
        println!("{:<30} {:>12}", "Margin", self.margin);
        println!("{:<30} {:>12}", "Max error", self.max_error);
        for (channel, count) in Channel::OUTPUTS.iter().zip(self.per_channel) {
            println!("{:<30} {:>12}", format!("{channel} mismatches"), count);
        }
        println!(
            "{:<30} {:>12.3}ms",
            "Elapsed",
            self.elapsed.as_secs_f64() * 1000.0
        );
        println!("{:-<60}", "");
        println!("Summary: {} mismatches", self.mismatches);
        println!("{}", if self.passed() { "PASS" } else { "FAIL" });
    }
}
