pub mod color;
pub mod colorize;
pub mod output;
pub mod overlay;
pub mod palette;
pub mod source;

pub use color::{ColorPalette, Gradient, Rgb};
pub use colorize::{colorize, Coloring, RasterCanvas, RasterOptions};
pub use output::{file_name, to_data_uri, to_image_bytes, OutputFormat};
pub use overlay::{overlay, CenterOverlaySpec, Glyph, OverlayContent, Platform, COVERAGE_BUDGET};
pub use palette::{extract_palette, extract_palette_from, palette_from_gradient};
pub use source::ImageSource;
