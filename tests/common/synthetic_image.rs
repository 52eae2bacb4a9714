use image::Luma;
use true_square::SampleGrid;

/// Rasterizes a `rect_w` x `rect_h` rectangle centered in a zero background,
/// tilted clockwise on screen by `tilt_degrees`.
///
/// A sample is set to `value` when its center lies inside the rectangle, so a
/// counter-clockwise rotation by `tilt_degrees` brings the rectangle back into
/// axis alignment.
pub fn tilted_rectangle(
    width: u32,
    height: u32,
    rect_w: f64,
    rect_h: f64,
    tilt_degrees: f64,
    value: u16,
) -> SampleGrid {
    assert!(width > 0 && height > 0, "image dimensions must be positive");

    let (sin, cos) = tilt_degrees.to_radians().sin_cos();
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;

    SampleGrid::from_fn(width, height, |x, y| {
        let dx = x as f64 + 0.5 - cx;
        let dy = y as f64 + 0.5 - cy;
        let u = cos * dx + sin * dy;
        let v = -sin * dx + cos * dy;
        if u.abs() <= rect_w / 2.0 && v.abs() <= rect_h / 2.0 {
            Luma([value])
        } else {
            Luma([0])
        }
    })
}
