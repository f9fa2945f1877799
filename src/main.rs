use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use rgb2ycbcr_rs::color_pipeline::{
    ChannelRange, Convention, ExecutionModel, SampleWidth, SweepConfig, Verifier,
};
use rgb2ycbcr_rs::logger;

/// Sweeps RGB inputs through the fixed-point YCbCr converter and checks every
/// result against the reference model.
#[derive(Parser, Debug)]
#[command(name = "rgb2ycbcr")]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML sweep configuration; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Coefficient convention (difference|offset-centered)
    #[arg(long)]
    convention: Option<Convention>,

    /// Input sample width in bits (8 or 10)
    #[arg(long)]
    input_width: Option<u32>,

    /// Output sample width in bits (8 or 10)
    #[arg(long)]
    output_width: Option<u32>,

    /// Range applied to R, G and B, as MIN..=MAX or N
    #[arg(long)]
    range: Option<ChannelRange>,

    #[arg(long)]
    r_range: Option<ChannelRange>,

    #[arg(long)]
    g_range: Option<ChannelRange>,

    #[arg(long)]
    b_range: Option<ChannelRange>,

    /// Allowed per-channel error; derived from the coefficient tables when omitted
    #[arg(long, allow_negative_numbers = true)]
    margin: Option<i32>,

    /// Execution model (combinational|staged|streaming)
    #[arg(long)]
    model: Option<ExecutionModel>,

    /// Slots in each streaming queue
    #[arg(long)]
    queue_depth: Option<usize>,

    /// Spread the combinational sweep over all cores
    #[arg(long)]
    parallel: bool,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn sweep_config(&self) -> anyhow::Result<SweepConfig> {
        let base = match &self.config {
            Some(path) => SweepConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SweepConfig::default(),
        };

        let mut builder = SweepConfig::builder();
        if let Some(convention) = self.convention {
            builder = builder.convention(convention);
        }
        if let Some(bits) = self.input_width {
            builder = builder.input_width(SampleWidth::try_from(bits)?);
        }
        if let Some(bits) = self.output_width {
            builder = builder.output_width(SampleWidth::try_from(bits)?);
        }
        if let Some(range) = self.range {
            builder = builder.range(range);
        }
        if let Some(range) = self.r_range {
            builder = builder.r_range(range);
        }
        if let Some(range) = self.g_range {
            builder = builder.g_range(range);
        }
        if let Some(range) = self.b_range {
            builder = builder.b_range(range);
        }
        if let Some(margin) = self.margin {
            builder = builder.margin(Some(margin));
        }
        if let Some(model) = self.model {
            builder = builder.execution(model);
        }
        if let Some(depth) = self.queue_depth {
            builder = builder.queue_depth(depth);
        }
        if self.parallel {
            builder = builder.parallel(true);
        }

        Ok(builder.build_on(base))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(args.verbose);

    info!("Starting rgb2ycbcr v{}", env!("CARGO_PKG_VERSION"));

    let verifier = match args
        .sweep_config()
        .and_then(|config| Verifier::new(config).map_err(anyhow::Error::from))
    {
        Ok(verifier) => verifier,
        Err(e) => {
            error!("Invalid sweep configuration: {:#}", e);
            return ExitCode::from(2);
        }
    };

    match verifier.run() {
        Ok(report) => {
            report.print_summary();
            if report.passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!("Sweep failed: {}", e);
            ExitCode::from(2)
        }
    }
}
