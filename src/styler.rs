use log::{debug, warn};

use crate::common::{
    error::{QRError, QRResult},
    metadata::{ECLevel, Version},
};
use crate::matrix::encode;
use crate::style::{
    colorize, extract_palette_from, overlay, palette_from_gradient, to_data_uri, to_image_bytes,
    CenterOverlaySpec, ColorPalette, Coloring, Gradient, ImageSource, OutputFormat, OverlayContent,
    RasterCanvas, RasterOptions, Rgb, COVERAGE_BUDGET,
};

/// One generation request, from payload to styled raster.
///
/// ```rust
/// use qrstyle::{Gradient, OutputFormat, QRStyler};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let gradient = Gradient::from_hex("Sunset", &["#FF512F", "#F09819"])?;
/// let styled = QRStyler::new("https://example.com").gradient(gradient).render()?;
/// let uri = styled.to_data_uri(OutputFormat::Png)?;
/// assert!(uri.starts_with("data:image/png;base64,"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct QRStyler {
    payload: String,
    gradient: Option<Gradient>,
    palette_image: Option<ImageSource>,
    overlay: Option<OverlayContent>,
    raster: RasterOptions,
}

impl QRStyler {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            gradient: None,
            palette_image: None,
            overlay: None,
            raster: RasterOptions::default(),
        }
    }

    pub fn gradient(mut self, gradient: Gradient) -> Self {
        self.gradient = Some(gradient);
        self
    }

    /// Image whose dominant colors style the code. Takes priority over the gradient.
    pub fn palette_image(mut self, src: impl Into<ImageSource>) -> Self {
        self.palette_image = Some(src.into());
        self
    }

    pub fn overlay(mut self, content: OverlayContent) -> Self {
        self.overlay = Some(content);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.raster.size = size;
        self
    }

    pub fn quiet_zone(mut self, modules: u32) -> Self {
        self.raster.quiet_zone = modules;
        self
    }

    pub fn darkness_threshold(mut self, threshold: u8) -> Self {
        self.raster.darkness_threshold = threshold;
        self
    }

    /// Runs the whole pipeline. Only encoding failures are returned as errors, palette and
    /// overlay failures degrade the result and are listed in [`StyledQR::warnings`].
    pub fn render(&self) -> QRResult<StyledQR> {
        // Overlays eat into the error correction budget, so always encode at H
        let matrix = encode(&self.payload, ECLevel::H)?;
        let mut warnings = Vec::new();

        let image_palette = match &self.palette_image {
            Some(src) => match extract_palette_from(src) {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!("Falling back to default palette: {e}");
                    warnings.push(e);
                    None
                }
            },
            None => None,
        };
        let extraction_failed = !warnings.is_empty();

        let (palette, coloring, background) = match (&image_palette, &self.gradient) {
            (Some(p), _) => (*p, Coloring::Solid(p.primary), p.background),
            (None, Some(g)) if !extraction_failed => {
                (palette_from_gradient(g), Coloring::Gradient(g.clone()), Rgb::WHITE)
            }
            _ => {
                let p = ColorPalette::default();
                (p, Coloring::Solid(p.primary), p.background)
            }
        };
        debug!(
            "Styling version {} code: primary {}, secondary {}, background {}",
            *matrix.version(),
            palette.primary,
            palette.secondary,
            palette.background
        );

        let mut canvas = colorize(&matrix, &coloring, background, &self.raster);

        if let Some(content) = &self.overlay {
            let mut spec = CenterOverlaySpec::new(content.clone());
            if let Some(p) = &image_palette {
                spec = spec.colors(p.background, p.secondary);
            }
            match self.apply_overlay(&mut canvas, &spec, matrix.width()) {
                Ok(()) => {}
                Err(e) if e.is_recoverable() => warnings.push(e),
                Err(e) => return Err(e),
            }
        }

        Ok(StyledQR { canvas, palette, version: matrix.version(), warnings })
    }

    // Leaves the canvas untouched when the disc would hide more than the symbol can recover
    fn apply_overlay(
        &self,
        canvas: &mut RasterCanvas,
        spec: &CenterOverlaySpec,
        width: usize,
    ) -> QRResult<()> {
        let symbol_side = width as u32 * self.raster.module_size(width);
        let coverage = spec.coverage(self.raster.size, symbol_side);
        if coverage > COVERAGE_BUDGET {
            warn!("Skipping center overlay covering {:.0}% of the symbol", coverage * 100.0);
            return Err(QRError::Overlay("overlay exceeds error correction budget".to_string()));
        }
        overlay(canvas, spec)
    }
}

#[derive(Debug, Clone)]
pub struct StyledQR {
    pub canvas: RasterCanvas,
    pub palette: ColorPalette,
    pub version: Version,
    /// Recoverable failures, each reported once.
    pub warnings: Vec<QRError>,
}

impl StyledQR {
    pub fn to_image_bytes(&self, format: OutputFormat) -> QRResult<Vec<u8>> {
        to_image_bytes(&self.canvas, format)
    }

    pub fn to_data_uri(&self, format: OutputFormat) -> QRResult<String> {
        to_data_uri(&self.canvas, format)
    }

    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}
