use image::{imageops, GrayImage, Luma};

use crate::error::{DeskewError, Result};
use crate::geometry::AffineTransform;
use crate::grid::{max_sample, SampleGrid};

/// Apply an affine transformation using inverse mapping with nearest-neighbour
/// sampling.
///
/// Each output sample is copied verbatim from the source sample under its
/// mapped center, so background zeros stay exactly zero. Canvas points that
/// map outside the source are filled with zero.
pub fn apply_affine_transform(grid: &SampleGrid, transform: &AffineTransform) -> SampleGrid {
    let (src_width, src_height) = grid.dimensions();
    let (new_width, new_height) = transform.dimensions();
    let [a, b, c, d, e, f] = transform.coeffs;

    let mut output = SampleGrid::new(new_width, new_height);

    for out_y in 0..new_height {
        let py = out_y as f64 + 0.5;
        for out_x in 0..new_width {
            let px = out_x as f64 + 0.5;
            let src_x = (a * px + b * py + c).floor();
            let src_y = (d * px + e * py + f).floor();

            if src_x >= 0.0
                && src_x < src_width as f64
                && src_y >= 0.0
                && src_y < src_height as f64
            {
                let pixel = grid.get_pixel(src_x as u32, src_y as u32);
                output.put_pixel(out_x, out_y, *pixel);
            }
        }
    }

    output
}

/// Bounding box `(x, y, width, height)` of all non-zero samples, inclusive.
///
/// A column counts as occupied when its maximum over all rows exceeds zero;
/// rows likewise. Returns `None` for an all-zero grid.
pub fn find_content_bounds(grid: &SampleGrid) -> Option<(u32, u32, u32, u32)> {
    let (width, height) = grid.dimensions();
    let mut column_max = vec![0u16; width as usize];
    let mut row_max = vec![0u16; height as usize];

    for (x, y, pixel) in grid.enumerate_pixels() {
        let v = pixel[0];
        column_max[x as usize] = column_max[x as usize].max(v);
        row_max[y as usize] = row_max[y as usize].max(v);
    }

    let occupied = |maxima: &[u16]| -> Option<(u32, u32)> {
        let first = maxima.iter().position(|&m| m > 0)?;
        let last = maxima.iter().rposition(|&m| m > 0)?;
        Some((first as u32, last as u32))
    };

    let (min_x, max_x) = occupied(&column_max)?;
    let (min_y, max_y) = occupied(&row_max)?;

    Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// Crop a grid to the bounding box of its non-zero samples
pub fn crop_to_content(grid: &SampleGrid) -> Result<SampleGrid> {
    let (min_x, min_y, width, height) =
        find_content_bounds(grid).ok_or_else(|| DeskewError::EmptyImage {
            width: grid.width(),
            height: grid.height(),
        })?;

    Ok(imageops::crop_imm(grid, min_x, min_y, width, height).to_image())
}

/// Linearly rescale samples into 0..=255.
///
/// Zero samples are first replaced by `zero_replacement` so that empty area and
/// true black stay distinguishable; every sample is then divided by the grid
/// maximum and multiplied by 255.
pub fn rescale_to_u8(grid: &SampleGrid, zero_replacement: u16) -> Result<GrayImage> {
    let mut replaced = grid.clone();
    for pixel in replaced.pixels_mut() {
        if pixel[0] == 0 {
            pixel[0] = zero_replacement;
        }
    }

    let max = max_sample(&replaced);
    if max == 0 {
        return Err(DeskewError::EmptyImage {
            width: grid.width(),
            height: grid.height(),
        });
    }

    let scale = 255.0 / max as f64;
    let (width, height) = replaced.dimensions();
    Ok(GrayImage::from_fn(width, height, |x, y| {
        let v = replaced.get_pixel(x, y)[0] as f64 * scale;
        Luma([v.round().clamp(0.0, 255.0) as u8])
    }))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Sparse grids: roughly one sample in four is non-zero.
    fn grid_strategy() -> impl Strategy<Value = SampleGrid> {
        (1u32..=24, 1u32..=24).prop_flat_map(|(width, height)| {
            prop::collection::vec(
                prop_oneof![3 => Just(0u16), 1 => 1u16..=u16::MAX],
                (width * height) as usize,
            )
            .prop_map(move |data| SampleGrid::from_raw(width, height, data).unwrap())
        })
    }

    proptest! {
        /// Property: cropping a cropped grid changes nothing.
        #[test]
        fn prop_crop_idempotent(grid in grid_strategy()) {
            if let Ok(once) = crop_to_content(&grid) {
                let twice = crop_to_content(&once).unwrap();
                prop_assert_eq!(once, twice);
            } else {
                prop_assert!(grid.pixels().all(|p| p[0] == 0));
            }
        }

        /// Property: every edge of the crop touches content.
        #[test]
        fn prop_crop_edges_non_empty(grid in grid_strategy()) {
            prop_assume!(grid.pixels().any(|p| p[0] > 0));
            let cropped = crop_to_content(&grid).unwrap();
            let (w, h) = cropped.dimensions();

            prop_assert!((0..w).any(|x| cropped.get_pixel(x, 0)[0] > 0), "top edge empty");
            prop_assert!((0..w).any(|x| cropped.get_pixel(x, h - 1)[0] > 0), "bottom edge empty");
            prop_assert!((0..h).any(|y| cropped.get_pixel(0, y)[0] > 0), "left edge empty");
            prop_assert!((0..h).any(|y| cropped.get_pixel(w - 1, y)[0] > 0), "right edge empty");
        }

        /// Property: the brightest sample after zero replacement maps to 255.
        #[test]
        fn prop_rescale_peak_is_white(grid in grid_strategy(), zero_replacement in 1u16..=u16::MAX) {
            let out = rescale_to_u8(&grid, zero_replacement).unwrap();
            prop_assert_eq!(out.dimensions(), grid.dimensions());
            prop_assert_eq!(out.pixels().map(|p| p[0]).max(), Some(255));
        }
    }
}
