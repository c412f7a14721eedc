use std::path::PathBuf;

use image::{DynamicImage, ImageResult};

/// Where an uploaded or fetched image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Encoded bytes in any format the `image` crate can sniff.
    Bytes(Vec<u8>),
    Path(PathBuf),
    Decoded(DynamicImage),
}

impl ImageSource {
    pub fn load(&self) -> ImageResult<DynamicImage> {
        match self {
            Self::Bytes(b) => image::load_from_memory(b),
            Self::Path(p) => image::open(p),
            Self::Decoded(img) => Ok(img.clone()),
        }
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(img: DynamicImage) -> Self {
        Self::Decoded(img)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(p: PathBuf) -> Self {
        Self::Path(p)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}
