use thiserror::Error;

/// Errors raised by the alignment pipeline.
///
/// Every variant is terminal for the operation that produced it; nothing is
/// retried internally.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeskewError {
    #[error("invalid scale factors ({scale_x}, {scale_y}): both must be non-zero")]
    InvalidScale { scale_x: f64, scale_y: f64 },

    #[error("image of {width}x{height} samples has no non-zero content")]
    EmptyImage { width: u32, height: u32 },

    #[error(
        "max_angle ({max_angle}) too low: no optimum angle found for {width}x{height} image"
    )]
    NoOptimumFound {
        max_angle: f64,
        width: u32,
        height: u32,
    },

    #[error("invalid angle step {step}: must be finite and positive")]
    InvalidStep { step: f64 },
}

pub type Result<T> = std::result::Result<T, DeskewError>;
