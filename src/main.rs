use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rawdev_rs::image_pipeline::{
    ConversionPipeline, DevelopConfig, Developer, ExportConfig, TiffCompression,
};
use rawdev_rs::logger;

use tracing::{debug, info};

/// Develops camera RAW files and converts between image formats.
#[derive(Parser, Debug)]
#[command(name = "rawdev", version, about, long_about = None)]
struct Args {
    /// Input image (DNG or other camera RAW, PFM, TIFF, EXR, HDR, PNG, JPEG, ...)
    input: PathBuf,

    /// Output image; the extension picks the container
    output: PathBuf,

    /// Exposure multiplier applied before encoding
    #[arg(long, default_value_t = 1.0)]
    gain: f32,

    /// Display gamma for 8-bit outputs when --no-srgb is given
    #[arg(long, default_value_t = 2.2)]
    gamma: f32,

    /// Use a plain gamma curve instead of sRGB for 8-bit outputs
    #[arg(long)]
    no_srgb: bool,

    /// Disable ordered dithering for 8-bit outputs
    #[arg(long)]
    no_dither: bool,

    /// TIFF compression: none, lzw, deflate-fast, deflate, deflate-best
    #[arg(long, default_value = "none")]
    compression: TiffCompression,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.verbose);

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to size the worker pool")?;
    }
    debug!("Using {} worker threads", rayon::current_num_threads());

    let export = ExportConfig::builder()
        .gain(args.gain)
        .gamma(args.gamma)
        .srgb(!args.no_srgb)
        .dither(!args.no_dither)
        .compression(args.compression)
        .build();
    let pipeline = ConversionPipeline::new(Developer::new(DevelopConfig::default()), export);

    info!("Compression: {:?}", pipeline.config().compression);

    pipeline
        .convert_file(&args.input, &args.output)
        .with_context(|| {
            format!(
                "converting {} to {}",
                args.input.display(),
                args.output.display()
            )
        })?;

    info!("Conversion successful!");
    Ok(())
}
