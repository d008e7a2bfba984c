use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use beadmachine::assets::PaletteSource;
use beadmachine::models::{FilterOptions, ProcessOptions, ResizeOptions};
use beadmachine::services::PatternService;

#[derive(Parser)]
#[command(name = "beadmachine")]
#[command(about = "Bead pattern creator - match images against craft bead palettes")]
struct Cli {
    /// Image to process (PNG, JPEG or GIF)
    #[arg(short, long)]
    input: PathBuf,

    /// Output filename for the converted PNG image
    #[arg(short, long, value_name = "OUTPUT.png")]
    output: PathBuf,

    /// Output filename for a HTML bead instruction sheet
    #[arg(short = 'l', long)]
    html: Option<PathBuf>,

    /// Output filename for a JSON bead usage report
    #[arg(short, long, value_name = "REPORT.json")]
    report: Option<PathBuf>,

    /// Bead palette JSON file (built-in Hama palette if not set)
    #[arg(short, long, env = "BEADMACHINE_PALETTE")]
    palette: Option<PathBuf>,

    /// Resize image to width in pixels
    #[arg(short, long)]
    width: Option<u32>,

    /// Resize image to height in pixels
    #[arg(short = 'e', long)]
    height: Option<u32>,

    /// Resize image to width in amount of boards
    #[arg(short = 'x', long)]
    boards_width: Option<u32>,

    /// Resize image to height in amount of boards
    #[arg(short = 'y', long)]
    boards_height: Option<u32>,

    /// Beads along one edge of a board
    #[arg(short = 'd', long, default_value_t = 29,
          value_parser = clap::value_parser!(u32).range(1..))]
    board_dimension: u32,

    /// Make the output image look like a bead board
    #[arg(short, long)]
    bead: bool,

    /// Convert the image to greyscale and use grey beads only
    #[arg(short, long)]
    grey: bool,

    /// Include translucent beads
    #[arg(short, long)]
    translucent: bool,

    /// Include fluorescent beads
    #[arg(short, long)]
    fluorescent: bool,

    /// Skip bead color matching and write the prepared image
    #[arg(short, long)]
    no_color_matching: bool,

    /// Blur sigma (0 = off)
    #[arg(long, default_value_t = 0.0)]
    blur: f32,

    /// Sharpen sigma (0 = off)
    #[arg(long, default_value_t = 0.0)]
    sharpen: f32,

    /// Gamma correction (0 = off)
    #[arg(long, default_value_t = 0.0)]
    gamma: f32,

    /// Contrast adjustment in percent, -100 to 100
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    contrast: f32,

    /// Brightness adjustment in percent, -100 to 100
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    brightness: f32,

    /// Worker threads (defaults to available parallelism)
    #[arg(long)]
    workers: Option<NonZeroUsize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl From<Cli> for ProcessOptions {
    fn from(cli: Cli) -> Self {
        Self {
            input: cli.input,
            output: cli.output,
            html: cli.html,
            report: cli.report,
            palette: PaletteSource::from_path(cli.palette),
            resize: ResizeOptions {
                width: cli.width,
                height: cli.height,
                boards_width: cli.boards_width,
                boards_height: cli.boards_height,
            },
            filters: FilterOptions {
                greyscale: cli.grey,
                blur: cli.blur,
                sharpen: cli.sharpen,
                gamma: cli.gamma,
                contrast: cli.contrast,
                brightness: cli.brightness,
            },
            board_dimension: cli.board_dimension,
            bead_style: cli.bead,
            translucent: cli.translucent,
            fluorescent: cli.fluorescent,
            no_color_matching: cli.no_color_matching,
            workers: cli.workers,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "beadmachine=debug,bead_pattern=debug"
    } else {
        "beadmachine=info,bead_pattern=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let service = PatternService::new(cli.into());
    let report = service.run()?;

    tracing::debug!(
        width = report.width,
        height = report.height,
        output_width = report.output_width,
        output_height = report.output_height,
        "Done"
    );
    Ok(())
}
