use tracing::{debug, info, instrument, trace};

use crate::error::{DeskewError, Result};
use crate::geometry::AffineTransform;
use crate::grid::{count_zeros, SampleGrid};
use crate::transform::{apply_affine_transform, crop_to_content};

/// Parameters of the rotation sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerConfig {
    /// Exclusive upper bound of the sweep, in degrees counter-clockwise
    pub max_angle: f64,
    /// Distance between candidate angles, in degrees
    pub step: f64,
    /// Stop once a candidate scores this many background samples worse than
    /// the best seen so far
    pub jump_threshold: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_angle: 30.0,
            step: 0.01,
            jump_threshold: 4000,
        }
    }
}

impl OptimizerConfig {
    pub fn new(max_angle: f64, step: f64) -> Self {
        Self {
            max_angle,
            step,
            ..Self::default()
        }
    }

    pub fn with_max_angle(mut self, max_angle: f64) -> Self {
        self.max_angle = max_angle;
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn with_jump_threshold(mut self, jump_threshold: u64) -> Self {
        self.jump_threshold = jump_threshold;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(DeskewError::InvalidStep { step: self.step });
        }
        Ok(())
    }

    /// Candidate angles `0, step, 2*step, ...` strictly below `max_angle`.
    ///
    /// Angles are computed from the index so rounding error does not build up
    /// over long sweeps.
    pub fn candidate_angles(&self) -> impl Iterator<Item = f64> {
        let (step, max_angle) = (self.step, self.max_angle);
        (0u64..)
            .map(move |i| i as f64 * step)
            .take_while(move |&angle| angle < max_angle)
    }
}

/// Outcome of a converged sweep
#[derive(Debug, Clone)]
pub struct Alignment {
    /// Counter-clockwise rotation in degrees that best axis-aligns the content
    pub angle: f64,
    /// The input rotated by `angle` and cropped to content
    pub image: SampleGrid,
    /// Background samples remaining in `image`
    pub zero_count: u64,
    /// Number of candidate angles scored before the sweep stopped
    pub candidates_evaluated: usize,
}

/// What the sweep should do after observing a candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepStep {
    Continue,
    Converged { angle: f64 },
}

/// Running best-score accumulator, fed candidates in ascending angle order.
#[derive(Debug, Clone)]
pub struct SweepState {
    jump_threshold: u64,
    best_zero_count: u64,
    best_angle: Option<f64>,
    previous_zero_count: Option<u64>,
    evaluated: usize,
}

impl SweepState {
    pub fn new(jump_threshold: u64) -> Self {
        Self {
            jump_threshold,
            best_zero_count: u64::MAX,
            best_angle: None,
            previous_zero_count: None,
            evaluated: 0,
        }
    }

    /// Fold one candidate score into the state.
    ///
    /// Converges on the best angle so far when `zero_count` exceeds the best
    /// score by more than the jump threshold; otherwise keeps the lower score.
    pub fn observe(&mut self, angle: f64, zero_count: u64) -> SweepStep {
        self.evaluated += 1;

        if let Some(previous) = self.previous_zero_count {
            trace!(
                angle,
                zero_count,
                change = zero_count as i64 - previous as i64,
                "Scored candidate"
            );
        }
        self.previous_zero_count = Some(zero_count);

        if let Some(best_angle) = self.best_angle {
            let delta = zero_count.saturating_sub(self.best_zero_count);
            if delta > self.jump_threshold {
                debug!(angle, delta, best_angle, "Score jumped past threshold");
                return SweepStep::Converged { angle: best_angle };
            }
        }

        if zero_count < self.best_zero_count {
            self.best_zero_count = zero_count;
            self.best_angle = Some(angle);
            debug!(angle, zero_count, "New best candidate");
        }

        SweepStep::Continue
    }

    pub fn best_angle(&self) -> Option<f64> {
        self.best_angle
    }

    pub fn best_zero_count(&self) -> Option<u64> {
        self.best_angle.map(|_| self.best_zero_count)
    }

    pub fn evaluated(&self) -> usize {
        self.evaluated
    }
}

/// Rotate `grid` by `angle_degrees_ccw`, crop to content, and count the
/// background samples left inside the crop.
pub fn score_candidate(grid: &SampleGrid, angle_degrees_ccw: f64) -> Result<(SampleGrid, u64)> {
    let transform =
        AffineTransform::build(grid.width(), grid.height(), 1.0, 1.0, angle_degrees_ccw)?;
    let rotated = apply_affine_transform(grid, &transform);
    let cropped = crop_to_content(&rotated)?;
    let zero_count = count_zeros(&cropped);
    Ok((cropped, zero_count))
}

/// Find the rotation that minimises background inside the content bounding
/// box.
///
/// Candidates are scored in ascending order. The sweep stops as soon as a
/// score jumps more than `config.jump_threshold` above the best so far, and
/// returns the best angle's rotated, cropped grid. Running out of candidates
/// before that happens is an error.
#[instrument(
    skip(grid, config),
    fields(
        width = grid.width(),
        height = grid.height(),
        max_angle = config.max_angle,
        step = config.step
    )
)]
pub fn optimize_rotation(grid: &SampleGrid, config: &OptimizerConfig) -> Result<Alignment> {
    config.validate()?;
    info!("Searching for optimum rotation");

    let mut state = SweepState::new(config.jump_threshold);

    for angle in config.candidate_angles() {
        let (_, zero_count) = score_candidate(grid, angle)?;

        if let SweepStep::Converged { angle: best } = state.observe(angle, zero_count) {
            let (image, zero_count) = score_candidate(grid, best)?;
            info!(
                angle = best,
                zero_count,
                candidates = state.evaluated(),
                "Found optimum angle"
            );
            return Ok(Alignment {
                angle: best,
                image,
                zero_count,
                candidates_evaluated: state.evaluated(),
            });
        }
    }

    Err(DeskewError::NoOptimumFound {
        max_angle: config.max_angle,
        width: grid.width(),
        height: grid.height(),
    })
}
