use anyhow::{Context, Result};
use clap::Parser;
use image::ImageReader;
use tracing_subscriber::EnvFilter;

use true_square::{crop_to_content, optimize_rotation, rescale_to_u8, to_sample_grid, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load input image
    let img = ImageReader::open(&cli.input)
        .with_context(|| format!("Failed to open input file: {:?}", cli.input))?
        .decode()
        .with_context(|| format!("Failed to decode image: {:?}", cli.input))?;

    let grid = to_sample_grid(&img);
    let (width, height) = grid.dimensions();
    tracing::info!(width, height, input = ?cli.input, "Loaded image");

    // Remove the empty border before searching
    let grid = crop_to_content(&grid)
        .with_context(|| format!("Input has no content to align: {:?}", cli.input))?;

    let config = cli.optimizer_config();
    let alignment = optimize_rotation(&grid, &config).with_context(|| {
        format!(
            "Failed to find rotation (max_angle {}, step {}, jump threshold {})",
            config.max_angle, config.step, config.jump_threshold
        )
    })?;

    eprintln!(
        "Found optimum angle: {:.2}° ({} candidates)",
        alignment.angle, alignment.candidates_evaluated
    );

    let output_path = cli.output_path();
    let (out_width, out_height) = alignment.image.dimensions();

    if cli.raw {
        alignment
            .image
            .save(&output_path)
            .with_context(|| format!("Failed to save output: {:?}", output_path))?;
    } else {
        let rescaled = rescale_to_u8(&alignment.image, cli.zero_replacement)
            .context("Failed to rescale aligned image")?;
        rescaled
            .save(&output_path)
            .with_context(|| format!("Failed to save output: {:?}", output_path))?;
    }

    eprintln!("Saved aligned image: {:?}", output_path);
    eprintln!(
        "Dimensions: {}x{} -> {}x{}",
        width, height, out_width, out_height
    );

    Ok(())
}
