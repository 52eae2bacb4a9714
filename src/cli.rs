use clap::Parser;
use std::path::PathBuf;

use crate::optimize::OptimizerConfig;

#[derive(Parser, Debug)]
#[command(name = "true-square")]
#[command(version, about = "Rotate a scanned rectangular object into axis alignment and crop it")]
pub struct Cli {
    /// Input image path (converted to a single 16-bit channel)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output path [default: input_aligned.png]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Value substituted for zero samples before rescaling to 8 bits
    #[arg(short, long, default_value = "9999")]
    pub zero_replacement: u16,

    /// Upper bound of the rotation sweep (degrees, counter-clockwise)
    #[arg(long, default_value = "30", value_parser = parse_angle)]
    pub max_angle: f64,

    /// Angle increment between candidates (degrees)
    #[arg(long, default_value = "0.01", value_parser = parse_step)]
    pub step: f64,

    /// Background-sample increase over the best candidate that ends the sweep
    #[arg(long, default_value = "4000")]
    pub jump_threshold: u64,

    /// Write the aligned 16-bit samples without rescaling
    #[arg(long)]
    pub raw: bool,

    /// Show search details
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let stem = self.input.file_stem().unwrap_or_default().to_string_lossy();
            let parent = self.input.parent().unwrap_or(std::path::Path::new("."));
            parent.join(format!("{}_aligned.png", stem))
        })
    }

    pub fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig::new(self.max_angle, self.step).with_jump_threshold(self.jump_threshold)
    }
}

fn parse_angle(s: &str) -> Result<f64, String> {
    let angle: f64 = s
        .parse()
        .map_err(|_| format!("Invalid angle: {}", s))?;
    if !angle.is_finite() {
        return Err("Angle must be finite".to_string());
    }
    Ok(angle)
}

fn parse_step(s: &str) -> Result<f64, String> {
    let step = parse_angle(s)?;
    if step <= 0.0 {
        return Err("Step must be positive".to_string());
    }
    Ok(step)
}
