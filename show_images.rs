/// Render a 3×3 labeled image grid to PNG
/// Usage: cargo run --bin show_images -- --input batch.json --output figures/grid.png
///        cargo run --bin show_images -- --demo 9 --predictions
use clap::Parser;
use labelgrid::{
    batch_file::BatchFile, grid, synthetic, telemetry, FigureCanvas, GridConfig, RenderOutcome,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "show_images")]
#[command(about = "Render up to nine labeled images in a 3x3 grid")]
struct Args {
    /// JSON batch file with class_names, images, labels and optional predictions
    #[arg(long, conflicts_with = "demo")]
    input: Option<PathBuf>,

    /// Render a synthetic batch of this many images instead of reading a file
    #[arg(long)]
    demo: Option<usize>,

    /// Attach synthetic predictions to the demo batch
    #[arg(long, requires = "demo")]
    predictions: bool,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output PNG (overrides LABELGRID_OUTPUT)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();
    let args = Args::parse();

    let mut config = GridConfig::from_env()?;
    if let Some(output) = args.output {
        config.output_path = output;
    }

    let batch = match (args.input, args.demo) {
        (Some(path), _) => {
            println!("📂 Loading batch from: {}", path.display());
            BatchFile::load_json(&path)?.into_batch()?
        }
        (None, Some(count)) => {
            println!("🎲 Generating synthetic batch of {} images (seed {})", count, args.seed);
            synthetic::synthetic_batch(count, &["cat", "dog"], args.seed, args.predictions)?
        }
        (None, None) => return Err("pass --input <batch.json> or --demo <count>".into()),
    };

    println!("🎨 Rendering {} images...", batch.images.len());
    let mut canvas = FigureCanvas::new(&config);
    match grid::render_batch(&mut canvas, &batch, config.spacing())? {
        RenderOutcome::Rendered { populated } => {
            println!("📊 Image grid saved to: {}", config.output_path.display());
            println!("   {} of {} cells populated", populated, grid::CELLS);
        }
        RenderOutcome::TooManyImages { count } => {
            eprintln!(
                "⚠️  Got {} images; use {} or fewer for the grid. Nothing rendered.",
                count,
                grid::CELLS
            );
        }
    }

    Ok(())
}
