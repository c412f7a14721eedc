use std::f32::consts::{PI, SQRT_2};

use image::{imageops, imageops::FilterType, DynamicImage, GrayImage, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use log::{debug, warn};

use super::color::Rgb;
use super::colorize::RasterCanvas;
use super::source::ImageSource;
use crate::common::error::{QRError, QRResult};

// Overlay content
//------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    LinkedIn,
    Instagram,
    Snapchat,
}

impl Platform {
    /// Foreground a glyph for this platform is tinted with.
    pub fn color(self) -> Rgb {
        match self {
            Self::LinkedIn => Rgb([0x0a, 0x66, 0xc2]),
            Self::Instagram => Rgb([0xe4, 0x40, 0x5f]),
            // Drawn on the brand's yellow, so black reads best
            Self::Snapchat => Rgb::BLACK,
        }
    }
}

/// Icon shape as 8 bit coverage, tinted with its platform color when drawn.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub platform: Platform,
    pub coverage: GrayImage,
}

impl Glyph {
    pub fn new(platform: Platform, coverage: GrayImage) -> Self {
        Self { platform, coverage }
    }

    /// Coverage from the alpha channel when there is one, otherwise from inverted luminance.
    pub fn from_image(platform: Platform, img: &DynamicImage) -> Self {
        let coverage = if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
                image::Luma([rgba.get_pixel(x, y).0[3]])
            })
        } else {
            let mut luma = img.to_luma8();
            imageops::invert(&mut luma);
            luma
        };
        Self { platform, coverage }
    }

    fn rasterize(&self) -> RgbaImage {
        let [r, g, b] = self.platform.color().0;
        RgbaImage::from_fn(self.coverage.width(), self.coverage.height(), |x, y| {
            Rgba([r, g, b, self.coverage.get_pixel(x, y).0[0]])
        })
    }
}

#[derive(Debug, Clone, Default)]
pub enum OverlayContent {
    #[default]
    None,
    Image(ImageSource),
    Glyph(Glyph),
}

impl OverlayContent {
    // Decoded & tinted content, loaded before anything is drawn
    fn load(&self) -> QRResult<Option<RgbaImage>> {
        let img = match self {
            Self::None => return Ok(None),
            Self::Image(src) => {
                src.load().map_err(|e| QRError::Overlay(e.to_string()))?.to_rgba8()
            }
            Self::Glyph(g) => g.rasterize(),
        };
        if img.width() == 0 || img.height() == 0 {
            return Err(QRError::Overlay("Overlay content is empty".to_string()));
        }
        Ok(Some(img))
    }
}

// Center overlay
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CenterOverlaySpec {
    /// Disc radius as a fraction of canvas width, before padding.
    pub radius_fraction: f32,
    /// Extra pixels of disc around the content.
    pub padding: u32,
    pub border_width: u32,
    /// Falls back to a neutral gray.
    pub border_color: Option<Rgb>,
    /// Falls back to white.
    pub fill_color: Option<Rgb>,
    pub content: OverlayContent,
}

impl Default for CenterOverlaySpec {
    fn default() -> Self {
        Self {
            radius_fraction: RADIUS_FRACTION,
            padding: PADDING,
            border_width: BORDER_WIDTH,
            border_color: None,
            fill_color: None,
            content: OverlayContent::None,
        }
    }
}

impl CenterOverlaySpec {
    pub fn new(content: OverlayContent) -> Self {
        Self { content, ..Default::default() }
    }

    pub fn image(src: impl Into<ImageSource>) -> Self {
        Self::new(OverlayContent::Image(src.into()))
    }

    pub fn glyph(glyph: Glyph) -> Self {
        Self::new(OverlayContent::Glyph(glyph))
    }

    pub fn colors(mut self, fill: Rgb, border: Rgb) -> Self {
        self.fill_color = Some(fill);
        self.border_color = Some(border);
        self
    }

    /// Radius of the cleared disc, border included.
    pub fn outer_radius(&self, canvas_width: u32) -> u32 {
        (canvas_width as f32 * self.radius_fraction).round() as u32 + self.padding
    }

    /// Side of the square inscribed in the disc inside the border.
    pub fn content_side(&self, canvas_width: u32) -> u32 {
        let inner = self.outer_radius(canvas_width).saturating_sub(self.border_width);
        (inner as f32 * SQRT_2).floor() as u32
    }

    /// Share of a centered `symbol_side` pixel symbol hidden under the disc, in `0..=1`.
    pub fn coverage(&self, canvas_width: u32, symbol_side: u32) -> f32 {
        let r = self.outer_radius(canvas_width) as f32;
        let side = symbol_side.max(1) as f32;
        (PI * r * r / (side * side)).min(1.0)
    }
}

// Compositor
//------------------------------------------------------------------------------

/// Clears a disc in the middle of the canvas and draws the content into it. On error the
/// canvas is left untouched, so the plain code can still be used.
pub fn overlay(canvas: &mut RasterCanvas, spec: &CenterOverlaySpec) -> QRResult<()> {
    let content = spec.content.load().inspect_err(|e| warn!("Skipping center overlay: {e}"))?;

    let (w, h) = canvas.dimensions();
    let center = ((w / 2) as i32, (h / 2) as i32);
    let outer = spec.outer_radius(w) as i32;
    let fill = spec.fill_color.unwrap_or(Rgb::WHITE).to_rgba();
    let border = spec.border_color.unwrap_or(Rgb::GRAY).to_rgba();

    let Some(content) = content else {
        draw_filled_circle_mut(canvas, center, outer, fill);
        return Ok(());
    };

    // Border is stroked inside the disc edge
    let inner = outer - spec.border_width as i32;
    draw_filled_circle_mut(canvas, center, outer, border);
    if inner > 0 {
        draw_filled_circle_mut(canvas, center, inner, fill);
    }

    let side = spec.content_side(w);
    if side == 0 || inner <= 0 {
        return Ok(());
    }
    let scaled = imageops::resize(&content, side, side, FilterType::Triangle);
    let origin = (center.0 - side as i32 / 2, center.1 - side as i32 / 2);
    composite_clipped(canvas, &scaled, origin, center, inner as f32);
    debug!("Composited {side}x{side} overlay inside a {outer}px disc");
    Ok(())
}

// Alpha blends `top` onto the canvas, keeping only pixels whose centers fall inside the disc
fn composite_clipped(
    canvas: &mut RasterCanvas,
    top: &RgbaImage,
    origin: (i32, i32),
    center: (i32, i32),
    radius: f32,
) {
    let (w, h) = canvas.dimensions();
    for (tx, ty, p) in top.enumerate_pixels() {
        let (x, y) = (origin.0 + tx as i32, origin.1 + ty as i32);
        if x < 0 || y < 0 || x >= w as i32 || y >= h as i32 {
            continue;
        }
        let dx = x as f32 + 0.5 - center.0 as f32;
        let dy = y as f32 + 0.5 - center.1 as f32;
        if dx * dx + dy * dy > radius * radius {
            continue;
        }
        let dst = canvas.get_pixel_mut(x as u32, y as u32);
        *dst = blend(*dst, *p);
    }
}

fn blend(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let a = src.0[3] as u32;
    let mut out = [0u8; 4];
    for i in 0..3 {
        out[i] = ((src.0[i] as u32 * a + dst.0[i] as u32 * (255 - a) + 127) / 255) as u8;
    }
    out[3] = dst.0[3].max(src.0[3]);
    Rgba(out)
}

#[cfg(test)]
mod overlay_tests {
    use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

    use super::{
        blend, overlay, CenterOverlaySpec, Glyph, OverlayContent, Platform, COVERAGE_BUDGET,
    };
    use crate::common::QRError;
    use crate::style::{ImageSource, Rgb};

    fn canvas() -> RgbaImage {
        RgbaImage::from_pixel(400, 400, Rgba([0, 0, 0, 255]))
    }

    fn touched_outside(before: &RgbaImage, after: &RgbaImage, r: f32) -> bool {
        before.enumerate_pixels().any(|(x, y, p)| {
            let dx = x as f32 - 200.0;
            let dy = y as f32 - 200.0;
            (dx * dx + dy * dy).sqrt() > r + 1.0 && after.get_pixel(x, y) != p
        })
    }

    #[test]
    fn test_geometry() {
        let spec = CenterOverlaySpec::default();
        assert_eq!(spec.outer_radius(400), 50);
        assert_eq!(spec.content_side(400), 65);
    }

    #[test]
    fn test_coverage() {
        let spec = CenterOverlaySpec::default();
        // Version 2 at 12px per module
        assert!((spec.coverage(400, 300) - 0.0873).abs() < 1e-3);
        assert!(spec.coverage(100, 75) > COVERAGE_BUDGET);
        assert_eq!(spec.coverage(400, 60), 1.0);
    }

    #[test]
    fn test_image_stays_in_disc() {
        let logo = RgbaImage::from_pixel(30, 30, Rgba([255, 0, 0, 255]));
        let spec = CenterOverlaySpec::image(DynamicImage::ImageRgba8(logo))
            .colors(Rgb::WHITE, Rgb([0, 0, 255]));
        let before = canvas();
        let mut after = before.clone();
        overlay(&mut after, &spec).unwrap();

        assert!(!touched_outside(&before, &after, 50.0));
        assert_eq!(*after.get_pixel(200, 200), Rgba([255, 0, 0, 255]));
        // Border ring, then fill between border & image
        assert_eq!(*after.get_pixel(200, 152), Rgba([0, 0, 255, 255]));
        assert_eq!(*after.get_pixel(200, 157), Rgba([255, 255, 255, 255]));
        // 65px image fits inside the inner disc, corners included
        assert_eq!(*after.get_pixel(168, 168), Rgba([255, 0, 0, 255]));
        assert_eq!(*after.get_pixel(232, 232), Rgba([255, 0, 0, 255]));
        assert_eq!(*after.get_pixel(161, 161), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_glyph_tinted() {
        let glyph = Glyph::new(Platform::LinkedIn, GrayImage::from_pixel(8, 8, Luma([255])));
        let mut c = canvas();
        overlay(&mut c, &CenterOverlaySpec::glyph(glyph)).unwrap();
        assert_eq!(*c.get_pixel(200, 200), Rgba([0x0a, 0x66, 0xc2, 255]));
        // Defaults: gray border, white fill
        assert_eq!(*c.get_pixel(200, 152), Rgba([0x66, 0x66, 0x66, 255]));
        assert_eq!(*c.get_pixel(200, 157), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_glyph_from_image() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, Luma([0])));
        let glyph = Glyph::from_image(Platform::Snapchat, &img);
        assert_eq!(glyph.coverage.get_pixel(0, 0).0, [255]);
    }

    #[test]
    fn test_none_only_clears_disc() {
        let mut c = canvas();
        overlay(&mut c, &CenterOverlaySpec::new(OverlayContent::None)).unwrap();
        assert_eq!(*c.get_pixel(200, 152), Rgba([255, 255, 255, 255]));
        assert_eq!(*c.get_pixel(200, 200), Rgba([255, 255, 255, 255]));
        assert!(!touched_outside(&canvas(), &c, 50.0));
    }

    #[test]
    fn test_failed_load_leaves_canvas() {
        let before = canvas();
        let mut after = before.clone();
        let spec = CenterOverlaySpec::image(ImageSource::Path("missing/logo.png".into()));
        assert!(matches!(overlay(&mut after, &spec), Err(QRError::Overlay(_))));
        assert_eq!(before, after);

        let empty = Glyph::new(Platform::Instagram, GrayImage::new(0, 0));
        let res = overlay(&mut after, &CenterOverlaySpec::glyph(empty));
        assert!(matches!(res, Err(QRError::Overlay(_))));
        assert_eq!(before, after);
    }

    #[test]
    fn test_blend() {
        let dst = Rgba([0, 0, 0, 255]);
        assert_eq!(blend(dst, Rgba([200, 100, 50, 0])), dst);
        assert_eq!(blend(dst, Rgba([200, 100, 50, 255])), Rgba([200, 100, 50, 255]));
        assert_eq!(blend(dst, Rgba([255, 255, 255, 128])), Rgba([128, 128, 128, 255]));
    }
}

// Global constants
//------------------------------------------------------------------------------

pub const RADIUS_FRACTION: f32 = 0.1;

pub const PADDING: u32 = 10;

pub const BORDER_WIDTH: u32 = 4;

/// Largest share of the symbol an overlay may hide and still leave a level H code readable.
pub const COVERAGE_BUDGET: f32 = 0.2;
