//! Command-line shell around the layerscape core.
//!
//! Generates one randomized composition and exports it, printing the paths
//! of the written files.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use layerscape::{
    BackgroundMode, Canvas, CanvasConfig, CanvasMode, ExportJob, Exporter, FillKind, GlyphSource,
    LayerStack, Palette, Pcg32, SizePx,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Icon,
    Wallpaper,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FillArg {
    Gradient,
    Solid,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackgroundArg {
    Primary,
    White,
    Black,
    Gradient,
}

#[derive(Debug, Parser)]
#[command(name = "layerscape", about = "Procedural layered icon and wallpaper generator")]
struct Args {
    /// What to generate.
    #[arg(value_enum, default_value_t = ModeArg::Icon)]
    mode: ModeArg,

    /// Number of randomized layers.
    #[arg(short, long, default_value_t = 12)]
    layers: usize,

    /// Layer fill kind.
    #[arg(short, long, value_enum, default_value_t = FillArg::Gradient)]
    fill: FillArg,

    /// Background paint.
    #[arg(short, long, value_enum, default_value_t = BackgroundArg::Primary)]
    background: BackgroundArg,

    /// Corner roundness of the icon clip, in pixels.
    #[arg(long, default_value_t = layerscape::DEFAULT_CORNER_RADIUS)]
    roundness: f32,

    /// Foreground glyph name (icon mode only), e.g. "star" or "bolt".
    #[arg(short, long)]
    glyph: Option<String>,

    /// Flip the glyph's dark/light contrast choice.
    #[arg(long, default_value_t = false)]
    invert_glyph: bool,

    /// Wallpaper width in pixels.
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Wallpaper height in pixels.
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Seed for reproducible output; omit for a fresh composition.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory exports are placed under.
    #[arg(short, long, default_value = "out")]
    out: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => Pcg32::new(seed),
        None => Pcg32::from_entropy(),
    };

    let palette = Palette::random(&mut rng);
    let fill_kind = match args.fill {
        FillArg::Gradient => FillKind::Gradient,
        FillArg::Solid => FillKind::Solid,
    };

    let mut config = match args.mode {
        ModeArg::Icon => CanvasConfig::icon(palette.clone()),
        ModeArg::Wallpaper => {
            CanvasConfig::wallpaper(palette.clone(), SizePx::new(args.width, args.height))
        }
    };
    config.fill_kind = fill_kind;
    config.background = match args.background {
        BackgroundArg::Primary => BackgroundMode::Primary,
        BackgroundArg::White => BackgroundMode::White,
        BackgroundArg::Black => BackgroundMode::Black,
        BackgroundArg::Gradient => BackgroundMode::PaletteGradient,
    };
    config.corner_radius = args.roundness;
    config.glyph = args.glyph.map(GlyphSource::named);
    config.invert_glyph = args.invert_glyph;
    config.layer_count = args.layers.min(fill_kind.max_layers());

    let mut stack = LayerStack::new();
    stack.regenerate(&palette, fill_kind, config.layer_count, config.bounds, &mut rng);

    let surface = match Canvas::render(&config, &stack) {
        Ok(surface) => surface,
        Err(err) => {
            eprintln!("render failed: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let job = match config.mode {
        CanvasMode::Icon => ExportJob::icon(&args.out, &mut rng),
        CanvasMode::Wallpaper => ExportJob::wallpaper(&args.out, config.bounds, &mut rng),
    };

    match Exporter::export(&surface, &job) {
        Ok(written) => {
            for path in &written {
                println!("{} saved", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("export failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
