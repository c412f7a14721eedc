//! # qrstyle
//!
//! A Rust library for generating styled QR codes. Payloads are encoded at the highest error
//! correction level, then rasterized with solid or gradient colored modules, optionally
//! styled with a palette extracted from an uploaded image, and topped with a center logo
//! that stays within the error correction budget.
//!
//! ## Features
//!
//! - **QR Code Generation**: Byte mode encoding with Reed-Solomon error correction, versions 1-40
//! - **Gradient Modules**: Linear gradients sampled along the top left to bottom right diagonal
//! - **Palette Extraction**: Median cut quantization picks the three dominant colors of an image
//! - **Center Overlay**: Logos or platform glyphs composited into a bordered disc
//! - **Output**: PNG, JPEG or BMP bytes and base64 data URIs
//!
//! ## Quick Start
//!
//! ### Styled QR Code
//!
//! ```rust
//! use qrstyle::{Gradient, OutputFormat, QRStyler};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let styled = QRStyler::new("Hello World")
//!     .gradient(Gradient::from_hex("Ocean Blue", &["#2E3192", "#1BFFFF"])?)
//!     .render()?;
//!
//! let png = styled.to_image_bytes(OutputFormat::Png)?;
//! assert!(!png.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ### Plain Matrix
//!
//! ```rust
//! use qrstyle::{encode, ECLevel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let matrix = encode("Hello World", ECLevel::H)?;
//! assert_eq!(matrix.width(), 25);
//! let img = matrix.render(4); // 4 pixels per module, black on white
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrstyle::{ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"Hello, World!")
//!     .version(Version::new(3)?)    // Defaults to the smallest version that fits
//!     .ec_level(ECLevel::M)         // Defaults to ECLevel::H
//!     .mask(MaskPattern::new(3))    // Defaults to the lowest penalty mask
//!     .build()?;
//!
//! let matrix = qr.to_matrix();
//! assert_eq!(matrix.width(), 29);
//! # Ok(())
//! # }
//! ```
//!
//! ## Recoverable Failures
//!
//! Only payload encoding failures stop a generation. A palette image that can't be decoded
//! falls back to the default black on white palette, and an overlay that can't be loaded is
//! skipped, leaving the plain code. Both are reported in [`StyledQR::warnings`].
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction, always used by [`QRStyler`]

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;
pub mod matrix;
pub mod session;
pub mod style;
pub mod styler;

pub use builder::QRBuilder;
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{ECLevel, Version};
pub use matrix::{encode, QRMatrix};
pub use session::{Session, Ticket};
pub use style::{
    CenterOverlaySpec, ColorPalette, Coloring, Glyph, Gradient, ImageSource, OutputFormat,
    OverlayContent, Platform, RasterCanvas, RasterOptions, Rgb,
};
pub use styler::{QRStyler, StyledQR};
