use image::{Rgba, RgbaImage};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};
use log::trace;

use super::color::{Gradient, Rgb};
use crate::matrix::{QRMatrix, QUIET_ZONE};

/// Pixel buffer a code is rendered into, RGBA at 8 bits per channel.
pub type RasterCanvas = RgbaImage;

#[derive(Debug, Clone, PartialEq)]
pub enum Coloring {
    Solid(Rgb),
    Gradient(Gradient),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    /// Side of the square canvas in pixels.
    pub size: u32,
    /// Light margin around the symbol, in modules. `0` spreads the symbol over the whole canvas,
    /// one module per `size / width` pixels.
    pub quiet_zone: u32,
    /// Pixels with all of R, G and B below this are treated as dark when recoloring.
    pub darkness_threshold: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { size: DEFAULT_SIZE, quiet_zone: QUIET_ZONE, darkness_threshold: DARKNESS_THRESHOLD }
    }
}

impl RasterOptions {
    /// Whole pixels per module, never below one.
    pub fn module_size(&self, width: usize) -> u32 {
        (self.size / (width as u32 + 2 * self.quiet_zone)).max(1)
    }

    // Top left pixel of the symbol, centering it on the canvas
    fn offset(&self, width: usize) -> u32 {
        let symbol = width as u32 * self.module_size(width);
        self.size.saturating_sub(symbol) / 2
    }
}

pub fn colorize(
    matrix: &QRMatrix,
    coloring: &Coloring,
    background: Rgb,
    opts: &RasterOptions,
) -> RasterCanvas {
    match coloring {
        Coloring::Solid(fg) => draw_modules(matrix, *fg, background, opts),
        Coloring::Gradient(g) => {
            let mono = draw_modules(matrix, Rgb::BLACK, Rgb::WHITE, opts);
            recolor_dark_pixels(&mono, g, background, opts.darkness_threshold)
        }
    }
}

// Nearest neighbour upscale of every dark module onto a background filled canvas
fn draw_modules(matrix: &QRMatrix, fg: Rgb, bg: Rgb, opts: &RasterOptions) -> RasterCanvas {
    let w = matrix.width();
    let px = opts.module_size(w);
    let off = opts.offset(w);
    trace!("Rasterizing {w}x{w} modules at {px}px per module, offset {off}px");

    let mut canvas = RgbaImage::from_pixel(opts.size, opts.size, bg.to_rgba());
    for (y, row) in matrix.rows().enumerate() {
        for (x, _) in row.iter().enumerate().filter(|&(_, &dark)| dark) {
            let rect = Rect::at((off + x as u32 * px) as i32, (off + y as u32 * px) as i32)
                .of_size(px, px);
            draw_filled_rect_mut(&mut canvas, rect, fg.to_rgba());
        }
    }
    canvas
}

// Second pass over a black & white render. Everything is refilled with the background
// and only the pixels dark enough to have been modules get the gradient color.
fn recolor_dark_pixels(
    mono: &RasterCanvas,
    gradient: &Gradient,
    bg: Rgb,
    threshold: u8,
) -> RasterCanvas {
    let (w, h) = mono.dimensions();
    let mut canvas = RgbaImage::from_pixel(w, h, bg.to_rgba());
    for (x, y, p) in mono.enumerate_pixels() {
        if is_dark(p, threshold) {
            let t = diagonal_position(x, y, w, h);
            canvas.put_pixel(x, y, gradient.sample(t).to_rgba());
        }
    }
    canvas
}

pub fn is_dark(p: &Rgba<u8>, threshold: u8) -> bool {
    let [r, g, b, _] = p.0;
    r < threshold && g < threshold && b < threshold
}

/// Projection of the pixel center onto the top left to bottom right diagonal, in `0..=1`.
pub fn diagonal_position(x: u32, y: u32, w: u32, h: u32) -> f32 {
    let (w, h) = (w as f32, h as f32);
    let (cx, cy) = (x as f32 + 0.5, y as f32 + 0.5);
    ((cx * w + cy * h) / (w * w + h * h)).clamp(0.0, 1.0)
}


// Global constants
//------------------------------------------------------------------------------

pub const DEFAULT_SIZE: u32 = 400;

pub const DARKNESS_THRESHOLD: u8 = 128;
