use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};

use super::colorize::RasterCanvas;
use crate::common::error::{QRError, QRResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    /// Alpha is dropped, JPEG has no transparency.
    Jpeg,
    Bmp,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Bmp => "image/bmp",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Bmp => ImageFormat::Bmp,
        }
    }
}

pub fn to_image_bytes(canvas: &RasterCanvas, format: OutputFormat) -> QRResult<Vec<u8>> {
    let img = match format {
        // JPEG has no alpha channel
        OutputFormat::Jpeg => {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas.clone()).to_rgb8())
        }
        _ => DynamicImage::ImageRgba8(canvas.clone()),
    };
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), format.image_format())
        .map_err(|e| QRError::Render(e.to_string()))?;
    Ok(bytes)
}

pub fn to_data_uri(canvas: &RasterCanvas, format: OutputFormat) -> QRResult<String> {
    let bytes = to_image_bytes(canvas, format)?;
    Ok(format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes)))
}

/// Download name for a code generated at `timestamp_ms` since the unix epoch.
pub fn file_name(timestamp_ms: u128) -> String {
    format!("qr-code-{timestamp_ms}.png")
}
