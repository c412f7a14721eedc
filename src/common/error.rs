use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum QRError {
    // Encoder
    #[error("Empty data")]
    EmptyData,
    #[error("Data too long")]
    DataTooLong,
    #[error("Invalid version")]
    InvalidVersion,

    // Style inputs
    #[error("Invalid color: {0}")]
    InvalidColor(String),
    #[error("Gradient has no color stops")]
    EmptyGradient,

    // Recoverable, generation continues with a plainer result
    #[error("Color extraction failed: {0}")]
    ColorExtraction(String),
    #[error("Overlay failed: {0}")]
    Overlay(String),

    // Fatal to a single generation request
    #[error("Render failed: {0}")]
    Render(String),
}

impl QRError {
    /// Whether a generation request can still produce a scannable code after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ColorExtraction(_) | Self::Overlay(_))
    }
}

pub type QRResult<T> = Result<T, QRError>;
