use image::{DynamicImage, ImageBuffer, Luma};

/// Single-channel 16-bit sample grid. Zero marks background.
pub type SampleGrid = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Collapse any decoded image to one 16-bit channel
pub fn to_sample_grid(img: &DynamicImage) -> SampleGrid {
    img.to_luma16()
}

/// Number of background (zero) samples in the grid
pub fn count_zeros(grid: &SampleGrid) -> u64 {
    grid.as_raw().iter().filter(|&&v| v == 0).count() as u64
}

/// Largest sample value, or 0 for an empty buffer
pub fn max_sample(grid: &SampleGrid) -> u16 {
    grid.as_raw().iter().copied().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgb, RgbImage};

    #[test]
    fn test_count_zeros() {
        let grid = SampleGrid::from_raw(3, 2, vec![0, 1, 0, 5, 0, 7]).unwrap();
        assert_eq!(count_zeros(&grid), 3);
        assert_eq!(max_sample(&grid), 7);
    }

    #[test]
    fn test_gray8_keeps_zero_background() {
        let mut img = GrayImage::new(4, 4);
        img.put_pixel(1, 2, Luma([200]));
        let grid = to_sample_grid(&DynamicImage::ImageLuma8(img));

        assert_eq!(grid.dimensions(), (4, 4));
        assert_eq!(count_zeros(&grid), 15);
        assert!(grid.get_pixel(1, 2)[0] > 0);
    }

    #[test]
    fn test_rgb_black_is_background() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([255, 255, 255]));
        let grid = to_sample_grid(&DynamicImage::ImageRgb8(img));
        assert_eq!(count_zeros(&grid), 3);
    }
}
