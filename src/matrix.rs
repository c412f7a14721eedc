use image::{GrayImage, Luma};

use crate::builder::QRBuilder;
use crate::common::{
    error::QRResult,
    metadata::{ECLevel, Version},
};

// Modules of light margin around the symbol
pub const QUIET_ZONE: u32 = 4;

/// Immutable square grid of modules, `true` being dark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QRMatrix {
    version: Version,
    ec_level: ECLevel,
    width: usize,
    modules: Vec<bool>,
}

impl QRMatrix {
    pub(crate) fn new(version: Version, ec_level: ECLevel, modules: Vec<bool>) -> Self {
        let width = version.width();
        debug_assert!(modules.len() == width * width, "Matrix must be square");
        Self { version, ec_level, width, modules }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ec_level
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.width + x]
    }

    /// Rows of modules, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.modules.chunks_exact(self.width)
    }

    /// Plain black on white rendering with a 4 module quiet zone.
    pub fn render(&self, module_size: u32) -> GrayImage {
        let qz_size = QUIET_ZONE * module_size;
        let qr_size = self.width as u32 * module_size;
        let total_size = qz_size + qr_size + qz_size;

        GrayImage::from_fn(total_size, total_size, |x, y| {
            let inside = (qz_size..qz_size + qr_size).contains(&x)
                && (qz_size..qz_size + qr_size).contains(&y);
            if !inside {
                return Luma([255]);
            }
            let c = ((x - qz_size) / module_size) as usize;
            let r = ((y - qz_size) / module_size) as usize;
            if self.is_dark(c, r) {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }

    pub fn to_debug_str(&self) -> String {
        let mut res = String::with_capacity(self.width * (self.width + 1));
        for row in self.rows() {
            res.extend(row.iter().map(|&d| if d { '#' } else { '.' }));
            res.push('\n');
        }
        res
    }
}

/// Encodes the payload's UTF-8 bytes as a single byte mode segment at the smallest version
/// that fits the requested level.
pub fn encode(payload: &str, level: ECLevel) -> QRResult<QRMatrix> {
    let qr = QRBuilder::new(payload.as_bytes()).ec_level(level).build()?;
    Ok(qr.to_matrix())
}
