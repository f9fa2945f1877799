//! Sweep configuration types

use std::fmt;
use std::ops::RangeInclusive;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::color_pipeline::coefficients::Convention;
use crate::color_pipeline::common::error::{ConversionError, Result};
use crate::color_pipeline::pixel::{Channel, SampleWidth};
use crate::color_pipeline::verification::margin::analytic_margin;

/// How the fixed-point side of a sweep is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionModel {
    /// One atomic call per pixel
    #[default]
    Combinational,
    /// Clocked pipeline, one tick per pixel, results compared after the delay
    Staged,
    /// Staged pipeline behind bounded FIFO queues on a worker thread
    Streaming,
}

impl fmt::Display for ExecutionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionModel::Combinational => f.write_str("combinational"),
            ExecutionModel::Staged => f.write_str("staged"),
            ExecutionModel::Streaming => f.write_str("streaming"),
        }
    }
}

impl FromStr for ExecutionModel {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "combinational" => Ok(ExecutionModel::Combinational),
            "staged" => Ok(ExecutionModel::Staged),
            "streaming" => Ok(ExecutionModel::Streaming),
            other => Err(ConversionError::ConfigParseError(format!(
                "unknown execution model '{other}'"
            ))),
        }
    }
}

/// Inclusive sweep bounds for one input channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RangeRepr")]
pub struct ChannelRange {
    min: u16,
    max: u16,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RangeRepr {
    Text(String),
    Bounds { min: u16, max: u16 },
}

impl TryFrom<RangeRepr> for ChannelRange {
    type Error = ConversionError;

    fn try_from(repr: RangeRepr) -> Result<Self> {
        match repr {
            RangeRepr::Text(text) => text.parse(),
            RangeRepr::Bounds { min, max } => Ok(ChannelRange::new(min, max)),
        }
    }
}

impl ChannelRange {
    /// Bounds are checked by [`SweepConfig::validate`], not here.
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    pub const fn min(&self) -> u16 {
        self.min
    }

    pub const fn max(&self) -> u16 {
        self.max
    }

    /// Every value of the input domain at `width`.
    pub const fn full(width: SampleWidth) -> Self {
        Self::new(0, width.max_value())
    }

    pub fn len(&self) -> u64 {
        if self.min > self.max {
            0
        } else {
            u64::from(self.max - self.min) + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> RangeInclusive<u16> {
        self.min..=self.max
    }

    fn validate(&self, channel: Channel, width: SampleWidth) -> Result<()> {
        if self.min > self.max {
            return Err(ConversionError::EmptyRange {
                channel,
                min: self.min,
                max: self.max,
            });
        }
        if self.max > width.max_value() {
            return Err(ConversionError::RangeExceedsWidth {
                channel,
                max: self.max,
                bits: width.bits(),
            });
        }
        Ok(())
    }
}

impl Default for ChannelRange {
    fn default() -> Self {
        Self::new(0, 63)
    }
}

impl fmt::Display for ChannelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

impl FromStr for ChannelRange {
    type Err = ConversionError;

    /// Accepts `MIN..=MAX` or a single value `N`.
    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u16>()
                .map_err(|e| ConversionError::InvalidRange(format!("'{s}': {e}")))
        };
        match s.split_once("..=") {
            Some((min, max)) => Ok(ChannelRange::new(parse(min)?, parse(max)?)),
            None => {
                let value = parse(s)?;
                Ok(ChannelRange::new(value, value))
            }
        }
    }
}

/// Configuration for one verification sweep
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Coefficient convention shared by both converters
    pub convention: Convention,
    /// Width of the R, G, B samples
    pub input_width: SampleWidth,
    /// Width of the Y, Cb, Cr samples
    pub output_width: SampleWidth,
    pub r_range: ChannelRange,
    pub g_range: ChannelRange,
    pub b_range: ChannelRange,
    /// Allowed `|actual - expected|` per channel; `None` derives it analytically
    pub margin: Option<i32>,
    pub execution: ExecutionModel,
    /// Slots in each streaming queue
    pub queue_depth: usize,
    /// Spread the combinational sweep over rayon lanes
    pub parallel: bool,
    /// Mismatch records kept in the report (all of them are still counted and logged)
    pub max_recorded: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            convention: Convention::OffsetCentered,
            input_width: SampleWidth::Bits8,
            output_width: SampleWidth::Bits8,
            r_range: ChannelRange::default(),
            g_range: ChannelRange::default(),
            b_range: ChannelRange::default(),
            margin: None,
            execution: ExecutionModel::Combinational,
            queue_depth: 5,
            parallel: false,
            max_recorded: 64,
        }
    }
}

impl SweepConfig {
    pub fn builder() -> SweepConfigBuilder {
        SweepConfigBuilder::default()
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ConversionError::ConfigParseError(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ConversionError::ConfigReadError(format!("{}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Rejects settings that would make the sweep meaningless.
    pub fn validate(&self) -> Result<()> {
        if let Some(margin) = self.margin {
            if margin <= 0 {
                return Err(ConversionError::InvalidMargin(margin));
            }
        }
        self.r_range.validate(Channel::R, self.input_width)?;
        self.g_range.validate(Channel::G, self.input_width)?;
        self.b_range.validate(Channel::B, self.input_width)?;
        if self.queue_depth == 0 {
            return Err(ConversionError::InvalidQueueDepth(self.queue_depth));
        }
        Ok(())
    }

    pub fn effective_margin(&self) -> i32 {
        self.margin
            .unwrap_or_else(|| analytic_margin(self.convention, self.input_width))
    }

    pub fn vector_count(&self) -> u64 {
        self.r_range.len() * self.g_range.len() * self.b_range.len()
    }
}

/// Builder for SweepConfig
#[derive(Default)]
pub struct SweepConfigBuilder {
    convention: Option<Convention>,
    input_width: Option<SampleWidth>,
    output_width: Option<SampleWidth>,
    r_range: Option<ChannelRange>,
    g_range: Option<ChannelRange>,
    b_range: Option<ChannelRange>,
    margin: Option<Option<i32>>,
    execution: Option<ExecutionModel>,
    queue_depth: Option<usize>,
    parallel: Option<bool>,
    max_recorded: Option<usize>,
}

impl SweepConfigBuilder {
    pub fn convention(mut self, convention: Convention) -> Self {
        self.convention = Some(convention);
        self
    }

    pub fn input_width(mut self, width: SampleWidth) -> Self {
        self.input_width = Some(width);
        self
    }

    pub fn output_width(mut self, width: SampleWidth) -> Self {
        self.output_width = Some(width);
        self
    }

    /// Same bounds on all three input channels.
    pub fn range(self, range: ChannelRange) -> Self {
        self.r_range(range).g_range(range).b_range(range)
    }

    pub fn r_range(mut self, range: ChannelRange) -> Self {
        self.r_range = Some(range);
        self
    }

    pub fn g_range(mut self, range: ChannelRange) -> Self {
        self.g_range = Some(range);
        self
    }

    pub fn b_range(mut self, range: ChannelRange) -> Self {
        self.b_range = Some(range);
        self
    }

    pub fn margin(mut self, margin: Option<i32>) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn execution(mut self, execution: ExecutionModel) -> Self {
        self.execution = Some(execution);
        self
    }

    pub fn queue_depth(mut self, depth: usize) -> Self {
        self.queue_depth = Some(depth);
        self
    }

    pub fn parallel(mut self, enable: bool) -> Self {
        self.parallel = Some(enable);
        self
    }

    pub fn max_recorded(mut self, count: usize) -> Self {
        self.max_recorded = Some(count);
        self
    }

    pub fn build(self) -> SweepConfig {
        self.build_on(SweepConfig::default())
    }

    /// Applies only the fields that were set on top of `base`.
    pub fn build_on(self, base: SweepConfig) -> SweepConfig {
        SweepConfig {
            convention: self.convention.unwrap_or(base.convention),
            input_width: self.input_width.unwrap_or(base.input_width),
            output_width: self.output_width.unwrap_or(base.output_width),
            r_range: self.r_range.unwrap_or(base.r_range),
            g_range: self.g_range.unwrap_or(base.g_range),
            b_range: self.b_range.unwrap_or(base.b_range),
            margin: self.margin.unwrap_or(base.margin),
            execution: self.execution.unwrap_or(base.execution),
            queue_depth: self.queue_depth.unwrap_or(base.queue_depth),
            parallel: self.parallel.unwrap_or(base.parallel),
            max_recorded: self.max_recorded.unwrap_or(base.max_recorded),
        }
    }
}
