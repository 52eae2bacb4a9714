pub mod cli;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod optimize;
pub mod transform;

pub use cli::Cli;
pub use error::{DeskewError, Result};
pub use geometry::AffineTransform;
pub use grid::{count_zeros, to_sample_grid, SampleGrid};
pub use optimize::{
    optimize_rotation, score_candidate, Alignment, OptimizerConfig, SweepState, SweepStep,
};
pub use transform::{apply_affine_transform, crop_to_content, find_content_bounds, rescale_to_u8};
