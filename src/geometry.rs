use nalgebra::{Matrix3, Vector3};

use crate::error::{DeskewError, Result};

/// Inverse affine mapping from an output canvas back into the source image.
///
/// A point `(x, y)` on the output canvas samples the source at
/// `(a*x + b*y + c, d*x + e*y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub new_width: u32,
    pub new_height: u32,
    /// Coefficients `(a, b, c, d, e, f)`
    pub coeffs: [f64; 6],
}

impl AffineTransform {
    /// Build the transform that scales by `(scale_x, scale_y)` and rotates by
    /// `angle_degrees_ccw` around the image center.
    ///
    /// The canvas grows to the bounding box of the rotated, scaled source so no
    /// content is clipped. Angles are counter-clockwise as seen on screen; with
    /// the y-axis pointing down this means the trig below runs on the negated
    /// angle.
    pub fn build(
        width: u32,
        height: u32,
        scale_x: f64,
        scale_y: f64,
        angle_degrees_ccw: f64,
    ) -> Result<Self> {
        if scale_x == 0.0 || scale_y == 0.0 {
            return Err(DeskewError::InvalidScale { scale_x, scale_y });
        }

        let angle = (-angle_degrees_ccw).to_radians();
        let cos_theta = angle.cos();
        let sin_theta = angle.sin();

        let scaled_w = width as f64 * scale_x;
        let scaled_h = height as f64 * scale_y;

        let new_width = ((cos_theta * scaled_w).abs() + (sin_theta * scaled_h).abs()).ceil();
        let new_height = ((sin_theta * scaled_w).abs() + (cos_theta * scaled_h).abs()).ceil();
        let new_width = (new_width as u32).max(1);
        let new_height = (new_height as u32).max(1);

        // Source and canvas centers
        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;
        let tx = new_width as f64 / 2.0;
        let ty = new_height as f64 / 2.0;

        let a = cos_theta / scale_x;
        let b = sin_theta / scale_x;
        let c = cx - tx * a - ty * b;
        let d = -sin_theta / scale_y;
        let e = cos_theta / scale_y;
        let f = cy - tx * d - ty * e;

        Ok(Self {
            new_width,
            new_height,
            coeffs: [a, b, c, d, e, f],
        })
    }

    /// Homogeneous 3x3 form of the output-to-source mapping
    pub fn matrix(&self) -> Matrix3<f64> {
        let [a, b, c, d, e, f] = self.coeffs;
        Matrix3::new(
            a, b, c,
            d, e, f,
            0.0, 0.0, 1.0,
        )
    }

    /// Map an output canvas point to source coordinates
    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        transform_point(&self.matrix(), x, y)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.new_width, self.new_height)
    }
}

/// Transform a point using a homogeneous affine matrix
pub fn transform_point(matrix: &Matrix3<f64>, x: f64, y: f64) -> (f64, f64) {
    let p = Vector3::new(x, y, 1.0);
    let result = matrix * p;
    (result.x / result.z, result.y / result.z)
}
