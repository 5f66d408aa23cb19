//! Raster drawing analysis
//!
//! Scans an RGBA8 sample buffer, finds the drawn pixels, summarizes their
//! bounding box and turns that summary into a weapon.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::classify;
use super::{Weapon, WeaponSource};

/// Bytes per RGBA8 sample
const BYTES_PER_PIXEL: usize = 4;

/// One RGBA8 color sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Errors constructing a [`PixelBuffer`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("row stride {stride} is smaller than one row of {width} pixels")]
    StrideTooSmall { stride: usize, width: u32 },
    #[error("buffer holds {actual} bytes but {expected} are needed")]
    TooShort { expected: usize, actual: usize },
}

/// Borrowed, read-only view over RGBA8 samples.
///
/// `stride` is the distance in bytes between the starts of two rows and may
/// include padding.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> PixelBuffer<'a> {
    pub fn new(data: &'a [u8], width: u32, height: u32, stride: usize) -> Result<Self, BufferError> {
        let row_bytes = width as usize * BYTES_PER_PIXEL;
        if stride < row_bytes {
            return Err(BufferError::StrideTooSmall { stride, width });
        }
        // Last row doesn't need its padding
        let expected = if height == 0 {
            0
        } else {
            stride * (height as usize - 1) + row_bytes
        };
        if data.len() < expected {
            return Err(BufferError::TooShort {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// View over tightly packed rows (stride = width * 4)
    pub fn packed(data: &'a [u8], width: u32, height: u32) -> Result<Self, BufferError> {
        Self::new(data, width, height, width as usize * BYTES_PER_PIXEL)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sample at (x, y). Caller guarantees bounds.
    #[inline]
    fn sample(&self, x: u32, y: u32) -> Rgba {
        let i = y as usize * self.stride + x as usize * BYTES_PER_PIXEL;
        Rgba::new(self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3])
    }
}

/// Geometry of the drawn pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingSummary {
    /// Inclusive bounding box (min_x, min_y, max_x, max_y)
    pub bounding_box: (u32, u32, u32, u32),
    pub pixel_count: u32,
    /// Box width / box height
    pub aspect_ratio: f32,
    /// Box width * box height
    pub area: u32,
}

impl DrawingSummary {
    pub fn width(&self) -> u32 {
        self.bounding_box.2 - self.bounding_box.0 + 1
    }

    pub fn height(&self) -> u32 {
        self.bounding_box.3 - self.bounding_box.1 + 1
    }
}

/// A pixel is drawn iff it is not fully transparent and differs from the
/// background in any channel, alpha included
#[inline]
fn is_drawn(pixel: &Rgba, background: &Rgba) -> bool {
    pixel.a > 0 && pixel != background
}

/// Summarize the drawn pixels, or `None` if nothing is drawn
pub fn summarize(buffer: &PixelBuffer<'_>, background: Rgba) -> Option<DrawingSummary> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut pixel_count = 0u32;

    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            if is_drawn(&buffer.sample(x, y), &background) {
                pixel_count += 1;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
    }

    if pixel_count == 0 {
        return None;
    }

    let width = max_x - min_x + 1;
    let height = max_y - min_y + 1;
    Some(DrawingSummary {
        bounding_box: (min_x, min_y, max_x, max_y),
        pixel_count,
        aspect_ratio: width as f32 / height as f32,
        area: width * height,
    })
}

/// Turn a drawing summary into a weapon
pub fn weapon_from_summary(summary: DrawingSummary) -> Weapon {
    let archetype = classify(summary.aspect_ratio, summary.pixel_count, summary.area);
    let base = archetype.base_stats();

    let size_modifier = (summary.area as f32 / 10_000.0).clamp(0.5, 2.0);
    let complexity_modifier = (summary.pixel_count as f32 / 1000.0).clamp(0.7, 1.5);
    let range_modifier = if summary.aspect_ratio > 2.0 { 1.3 } else { 1.0 };

    let damage = base.damage as f32 * size_modifier * complexity_modifier;
    let speed = base.speed as f32 * (2.0 - size_modifier) * complexity_modifier;
    let range = base.range as f32 * range_modifier;

    Weapon::from_raw(archetype, damage, speed, range, WeaponSource::Drawing(summary))
}

/// Analyze a drawing. A blank canvas yields the fallback weapon.
pub fn analyze(buffer: &PixelBuffer<'_>, background: Rgba) -> Weapon {
    match summarize(buffer, background) {
        Some(summary) => {
            let weapon = weapon_from_summary(summary);
            log::debug!(
                "Drawing {}x{} ({} px, aspect {:.2}) -> {}",
                summary.width(),
                summary.height(),
                summary.pixel_count,
                summary.aspect_ratio,
                weapon
            );
            weapon
        }
        None => {
            log::debug!("Blank drawing, using fallback weapon");
            Weapon::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapon::WeaponArchetype;
    use proptest::prelude::*;

    /// Solid white canvas
    fn canvas(width: u32, height: u32) -> Vec<u8> {
        vec![255; (width * height * 4) as usize]
    }

    fn paint(data: &mut [u8], width: u32, x: u32, y: u32, color: Rgba) {
        let i = ((y * width + x) * 4) as usize;
        data[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }

    fn paint_rect(data: &mut [u8], width: u32, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                paint(data, width, x, y, Rgba::BLACK);
            }
        }
    }

    #[test]
    fn test_empty_canvas_fallback() {
        let data = canvas(400, 300);
        let buffer = PixelBuffer::packed(&data, 400, 300).unwrap();
        let weapon = analyze(&buffer, Rgba::WHITE);
        assert_eq!(weapon.archetype, WeaponArchetype::Sword);
        assert_eq!((weapon.damage, weapon.speed, weapon.range), (50, 50, 50));
    }

    #[test]
    fn test_transparent_pixels_ignored() {
        let mut data = canvas(50, 50);
        paint(&mut data, 50, 10, 10, Rgba::new(0, 0, 0, 0));
        let buffer = PixelBuffer::packed(&data, 50, 50).unwrap();
        assert!(summarize(&buffer, Rgba::WHITE).is_none());
    }

    #[test]
    fn test_black_on_transparent_canvas() {
        // A cleared canvas is all zeros
        let mut data = vec![0u8; 400 * 300 * 4];
        paint_rect(&mut data, 400, 100, 150, 200, 10);
        let buffer = PixelBuffer::packed(&data, 400, 300).unwrap();

        let summary = summarize(&buffer, Rgba::TRANSPARENT).unwrap();
        assert_eq!(summary.pixel_count, 2000);
        assert_eq!(summary.bounding_box, (100, 150, 299, 159));

        let weapon = analyze(&buffer, Rgba::TRANSPARENT);
        assert_ne!(weapon.source, WeaponSource::Fallback);
        assert_eq!(weapon.archetype, WeaponArchetype::Spear);
    }

    #[test]
    fn test_background_alpha_difference_counts() {
        let mut data = canvas(20, 20);
        // White but half transparent on an opaque white background
        paint(&mut data, 20, 5, 5, Rgba::new(255, 255, 255, 128));
        let buffer = PixelBuffer::packed(&data, 20, 20).unwrap();
        assert_eq!(summarize(&buffer, Rgba::WHITE).unwrap().pixel_count, 1);
    }

    #[test]
    fn test_summary_bounding_box() {
        let mut data = canvas(100, 100);
        paint(&mut data, 100, 10, 20, Rgba::BLACK);
        paint(&mut data, 100, 49, 29, Rgba::BLACK);
        let buffer = PixelBuffer::packed(&data, 100, 100).unwrap();
        let summary = summarize(&buffer, Rgba::WHITE).unwrap();
        assert_eq!(summary.bounding_box, (10, 20, 49, 29));
        assert_eq!(summary.pixel_count, 2);
        assert_eq!(summary.area, 400);
        assert!((summary.aspect_ratio - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_long_thin_line_is_spear() {
        let mut data = canvas(400, 300);
        // 250 x 5 block: aspect 50, 1250 px, area 1250
        paint_rect(&mut data, 400, 50, 100, 250, 5);
        let buffer = PixelBuffer::packed(&data, 400, 300).unwrap();
        let weapon = analyze(&buffer, Rgba::WHITE);
        assert_eq!(weapon.archetype, WeaponArchetype::Spear);
        // base range 80 * 1.3 = 104 -> clamped
        assert_eq!(weapon.range, 100);
    }

    #[test]
    fn test_stat_formula() {
        // Square 100x100 outline-ish summary: aspect 1, 2000 px, area 10000 -> axe
        let summary = DrawingSummary {
            bounding_box: (0, 0, 99, 99),
            pixel_count: 2000,
            aspect_ratio: 1.0,
            area: 10_000,
        };
        let weapon = weapon_from_summary(summary);
        assert_eq!(weapon.archetype, WeaponArchetype::Axe);
        // size 1.0, complexity 1.5: damage 75*1.5=112.5 -> 100, speed 40*1*1.5=60, range 40
        assert_eq!(weapon.damage, 100);
        assert_eq!(weapon.speed, 60);
        assert_eq!(weapon.range, 40);
    }

    #[test]
    fn test_strided_buffer() {
        // 2x2 image with 4 bytes of row padding
        let stride = 12;
        let mut data = vec![255u8; stride * 2];
        data[stride + 4..stride + 8].copy_from_slice(&[0, 0, 0, 255]);
        let buffer = PixelBuffer::new(&data, 2, 2, stride).unwrap();
        let summary = summarize(&buffer, Rgba::WHITE).unwrap();
        assert_eq!(summary.bounding_box, (1, 1, 1, 1));
    }

    #[test]
    fn test_buffer_errors() {
        let data = vec![0u8; 10];
        assert_eq!(
            PixelBuffer::packed(&data, 2, 2).unwrap_err(),
            BufferError::TooShort {
                expected: 16,
                actual: 10
            }
        );
        assert!(matches!(
            PixelBuffer::new(&data, 4, 1, 8),
            Err(BufferError::StrideTooSmall { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_stats_always_clamped(
            x0 in 0u32..60, y0 in 0u32..60, w in 1u32..40, h in 1u32..40,
        ) {
            let mut data = canvas(100, 100);
            paint_rect(&mut data, 100, x0, y0, w, h);
            let buffer = PixelBuffer::packed(&data, 100, 100).unwrap();
            let weapon = analyze(&buffer, Rgba::WHITE);
            for stat in [weapon.damage, weapon.speed, weapon.range] {
                prop_assert!((10..=100).contains(&stat));
            }
        }

        #[test]
        fn prop_summary_stats_clamped(
            aspect in 0.01f32..100.0, pixels in 1u32..1_000_000, area in 1u32..1_000_000,
        ) {
            let weapon = weapon_from_summary(DrawingSummary {
                bounding_box: (0, 0, 0, 0),
                pixel_count: pixels,
                aspect_ratio: aspect,
                area,
            });
            for stat in [weapon.damage, weapon.speed, weapon.range] {
                prop_assert!((10..=100).contains(&stat));
            }
        }
    }
}
