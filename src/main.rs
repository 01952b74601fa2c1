use anyhow::Context;
use chromasplit::errors::SplitError;
use chromasplit::export::export_split;
use chromasplit::image_loader::load_image;
use chromasplit::logging::init_tracing;
use chromasplit::settings::Settings;
use chromasplit::{split_channels, BgraImage, SplitMode};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "chromasplit")]
#[command(version, about = "Split an image into red, green and blue channel images with histograms", long_about = None)]
struct Cli {
    /// Input image (png, jpg, jpeg or bmp)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory (defaults to the configured one, else next to the input)
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Process the three channels one after another
    #[arg(long)]
    sequential: bool,

    /// Also write one CSV histogram per channel
    #[arg(long)]
    csv: bool,

    /// Verbose logging
    #[arg(long)]
    debug: bool,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load();

    let decoded = load_image(&cli.input, settings.load_limits())
        .with_context(|| format!("loading {}", cli.input.display()))?;
    let source = BgraImage::from_dynamic(&decoded)
        .with_context(|| format!("converting {}", cli.input.display()))?;
    drop(decoded);

    let mode = if cli.sequential || !settings.parallel {
        SplitMode::Sequential
    } else {
        SplitMode::Parallel
    };
    let split = split_channels(&source, mode).context("splitting channels")?;

    for (channel, output) in split.iter() {
        tracing::debug!(
            %channel,
            peak = output.histogram.peak(),
            total = output.histogram.total(),
            "histogram"
        );
    }

    let out_dir = cli
        .out
        .or(settings.output_dir)
        .or_else(|| cli.input.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    let written = export_split(&split, &cli.input, &out_dir, cli.csv || settings.write_csv)
        .with_context(|| format!("writing results to {}", out_dir.display()))?;

    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<SplitError>() {
                Some(split_error) => {
                    tracing::error!(code = split_error.error_code(), "{:#}", e);
                    eprintln!("{}", split_error.user_message());
                }
                None => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}
