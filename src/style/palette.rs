use image::DynamicImage;
use log::{debug, trace};

use super::color::{ColorPalette, Gradient, Rgb};
use super::source::ImageSource;
use crate::common::error::{QRError, QRResult};

// Palette from image
//------------------------------------------------------------------------------

/// Three most dominant colors, most dominant first. Sources with fewer distinct colors
/// fill the gaps from [`ColorPalette::from_colors`].
pub fn extract_palette(img: &DynamicImage) -> QRResult<ColorPalette> {
    let colors = dominant_colors(img, PALETTE_SIZE, DEFAULT_QUALITY)?;
    debug!(
        "Extracted {} dominant colors: {}",
        colors.len(),
        colors.iter().map(|c| c.to_hex()).collect::<Vec<_>>().join(", ")
    );
    ColorPalette::from_colors(&colors)
        .ok_or_else(|| QRError::ColorExtraction("No colors found".to_string()))
}

pub fn extract_palette_from(source: &ImageSource) -> QRResult<ColorPalette> {
    let img = source.load().map_err(|e| QRError::ColorExtraction(e.to_string()))?;
    extract_palette(&img)
}

/// Median cut quantization over every `quality`-th pixel, ignoring translucent pixels.
pub fn dominant_colors(
    img: &DynamicImage,
    max_colors: usize,
    quality: usize,
) -> QRResult<Vec<Rgb>> {
    let rgba = img.to_rgba8();
    let mut hist = Histogram::new();
    rgba.pixels()
        .step_by(quality.max(1))
        .filter(|p| p.0[3] >= MIN_ALPHA)
        .for_each(|p| hist.add([p.0[0], p.0[1], p.0[2]]));

    if hist.total == 0 {
        return Err(QRError::ColorExtraction("No opaque pixels to sample".to_string()));
    }
    trace!("Sampled {} pixels from {}x{} image", hist.total, rgba.width(), rgba.height());

    let mut boxes = vec![hist.bounding_box()];
    // Split by population first, then by population weighted with volume
    let by_count = (max_colors * 3).div_ceil(4);
    split_boxes(&hist, &mut boxes, by_count, |b| b.count as u64);
    split_boxes(&hist, &mut boxes, max_colors, |b| b.count as u64 * b.volume());

    boxes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.avg.cmp(&b.avg)));
    Ok(boxes.into_iter().map(|b| b.avg).collect())
}

fn split_boxes(
    hist: &Histogram,
    boxes: &mut Vec<ColorBox>,
    target: usize,
    key: impl Fn(&ColorBox) -> u64,
) {
    while boxes.len() < target {
        let Some(idx) = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_splittable())
            .max_by_key(|(i, b)| (key(*b), std::cmp::Reverse(*i)))
            .map(|(i, _)| i)
        else {
            break;
        };
        let b = boxes.swap_remove(idx);
        let (left, right) = hist.median_cut(&b);
        boxes.push(left);
        boxes.push(right);
    }
}

// Palette from gradient
//------------------------------------------------------------------------------

/// First stop, second stop and last stop.
pub fn palette_from_gradient(gradient: &Gradient) -> ColorPalette {
    let colors = gradient.colors();
    let primary = colors[0];
    let secondary = colors.get(1).copied().unwrap_or(primary);
    let background = colors.last().copied().unwrap_or(primary);
    ColorPalette { primary, secondary, background }
}

// Histogram & color boxes
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    count: u32,
    sum: [u64; 3],
}

struct Histogram {
    buckets: Vec<Bucket>,
    total: u32,
}

// Bounds are inclusive, in bucket units
#[derive(Debug, Clone)]
struct ColorBox {
    lo: [usize; 3],
    hi: [usize; 3],
    count: u32,
    avg: Rgb,
}

impl ColorBox {
    fn volume(&self) -> u64 {
        (0..3).map(|i| (self.hi[i] - self.lo[i] + 1) as u64).product()
    }

    fn is_splittable(&self) -> bool {
        self.count > 1 && (0..3).any(|i| self.hi[i] > self.lo[i])
    }
}

impl Histogram {
    fn new() -> Self {
        Self { buckets: vec![Bucket::default(); 1 << (3 * SIG_BITS)], total: 0 }
    }

    fn index(q: [usize; 3]) -> usize {
        (q[0] << (2 * SIG_BITS)) | (q[1] << SIG_BITS) | q[2]
    }

    fn add(&mut self, px: [u8; 3]) {
        let q = px.map(|c| (c >> R_SHIFT) as usize);
        let bucket = &mut self.buckets[Self::index(q)];
        bucket.count += 1;
        for (s, c) in bucket.sum.iter_mut().zip(px) {
            *s += c as u64;
        }
        self.total += 1;
    }

    fn bounding_box(&self) -> ColorBox {
        let side = (1 << SIG_BITS) - 1;
        self.shrink([0; 3], [side; 3])
    }

    // Tightens the bounds to the occupied buckets & computes population and mean color
    fn shrink(&self, lo: [usize; 3], hi: [usize; 3]) -> ColorBox {
        let mut min = hi;
        let mut max = lo;
        let mut count = 0u32;
        let mut sum = [0u64; 3];
        for r in lo[0]..=hi[0] {
            for g in lo[1]..=hi[1] {
                for b in lo[2]..=hi[2] {
                    let bucket = &self.buckets[Self::index([r, g, b])];
                    if bucket.count == 0 {
                        continue;
                    }
                    for (i, v) in [r, g, b].into_iter().enumerate() {
                        min[i] = min[i].min(v);
                        max[i] = max[i].max(v);
                        sum[i] += bucket.sum[i];
                    }
                    count += bucket.count;
                }
            }
        }
        if count == 0 {
            return ColorBox { lo, hi, count, avg: Rgb::BLACK };
        }
        let n = count as u64;
        let avg = Rgb(sum.map(|s| ((s + n / 2) / n) as u8));
        ColorBox { lo: min, hi: max, count, avg }
    }

    // Splits along the widest axis where the running population first passes half
    fn median_cut(&self, b: &ColorBox) -> (ColorBox, ColorBox) {
        let axis = (0..3).max_by_key(|&i| (b.hi[i] - b.lo[i], std::cmp::Reverse(i))).unwrap_or(0);

        let mut acc = 0u32;
        let mut cut = b.hi[axis] - 1;
        for v in b.lo[axis]..b.hi[axis] {
            let mut lo = b.lo;
            let mut hi = b.hi;
            lo[axis] = v;
            hi[axis] = v;
            acc += self.count_in(lo, hi);
            if acc * 2 >= b.count {
                cut = v;
                break;
            }
        }

        let mut left_hi = b.hi;
        left_hi[axis] = cut;
        let mut right_lo = b.lo;
        right_lo[axis] = cut + 1;
        (self.shrink(b.lo, left_hi), self.shrink(right_lo, b.hi))
    }

    fn count_in(&self, lo: [usize; 3], hi: [usize; 3]) -> u32 {
        let mut count = 0;
        for r in lo[0]..=hi[0] {
            for g in lo[1]..=hi[1] {
                for b in lo[2]..=hi[2] {
                    count += self.buckets[Self::index([r, g, b])].count;
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod palette_tests {
    use image::{DynamicImage, Rgba, RgbaImage};

    use super::{dominant_colors, extract_palette, extract_palette_from, palette_from_gradient};
    use crate::common::QRError;
    use crate::style::{ColorPalette, Gradient, ImageSource, Rgb};

    fn stripes(colors: &[([u8; 3], u32)]) -> DynamicImage {
        let h = colors.iter().map(|(_, rows)| rows).sum();
        let mut img = RgbaImage::new(10, h);
        let mut y = 0;
        for &(c, rows) in colors {
            for _ in 0..rows {
                for x in 0..10 {
                    img.put_pixel(x, y, Rgba([c[0], c[1], c[2], 255]));
                }
                y += 1;
            }
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_solid_gray_pixel() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([128, 128, 128, 255])));
        let palette = extract_palette(&img).unwrap();
        let gray = Rgb([128, 128, 128]);
        assert_eq!(palette, ColorPalette::new(gray, gray, Rgb::WHITE));
    }

    #[test]
    fn test_three_colors_by_dominance() {
        // Every 10th pixel is the first pixel of a row
        let img = stripes(&[([20, 40, 200], 5), ([230, 30, 30], 30), ([40, 200, 60], 15)]);
        let palette = extract_palette(&img).unwrap();
        assert_eq!(palette.primary, Rgb([230, 30, 30]));
        assert_eq!(palette.secondary, Rgb([40, 200, 60]));
        assert_eq!(palette.background, Rgb([20, 40, 200]));
    }

    #[test]
    fn test_deterministic() {
        let img =
            stripes(&[([1, 2, 3], 7), ([200, 100, 50], 9), ([90, 90, 250], 4), ([0, 255, 0], 3)]);
        assert_eq!(dominant_colors(&img, 3, 1).unwrap(), dominant_colors(&img, 3, 1).unwrap());
        assert_eq!(dominant_colors(&img, 3, 1).unwrap().len(), 3);
    }

    #[test]
    fn test_exact_average_within_bucket() {
        // Both colors land in one 5 bit bucket
        let img = stripes(&[([100, 100, 100], 1), ([102, 102, 102], 1)]);
        assert_eq!(dominant_colors(&img, 3, 1).unwrap(), [Rgb([101, 101, 101])]);
    }

    #[test]
    fn test_transparent_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 10])));
        assert!(matches!(extract_palette(&img), Err(QRError::ColorExtraction(_))));
    }

    #[test]
    fn test_undecodable_source() {
        let res = extract_palette_from(&ImageSource::Bytes(vec![0, 1, 2, 3]));
        assert!(matches!(res, Err(QRError::ColorExtraction(_))));
    }

    #[test]
    fn test_palette_from_gradient() {
        let one = Gradient::from_hex("one", &["#abcdef"]).unwrap();
        let c = Rgb([0xab, 0xcd, 0xef]);
        assert_eq!(palette_from_gradient(&one), ColorPalette::new(c, c, c));

        let two = Gradient::from_hex("two", &["#ff0000", "#0000ff"]).unwrap();
        let p = palette_from_gradient(&two);
        assert_eq!(p.secondary, Rgb([0, 0, 255]));
        assert_eq!(p.background, Rgb([0, 0, 255]));

        let three = Gradient::from_hex("three", &["#111", "#222", "#333"]).unwrap();
        assert_eq!(palette_from_gradient(&three).background, Rgb([0x33, 0x33, 0x33]));
    }
}

// Global constants
//------------------------------------------------------------------------------

const PALETTE_SIZE: usize = 3;

const DEFAULT_QUALITY: usize = 10;

const MIN_ALPHA: u8 = 125;

const SIG_BITS: usize = 5;

const R_SHIFT: usize = 8 - SIG_BITS;
