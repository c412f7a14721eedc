use std::fmt;
use std::str::FromStr;

use image::Rgba;

use crate::common::error::{QRError, QRResult};

// Rgb
//------------------------------------------------------------------------------

/// 24 bit color, written as `#rrggbb`.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, PartialOrd, Ord)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);
    pub const GRAY: Rgb = Rgb([0x66, 0x66, 0x66]);

    /// Parses `#rgb` or `#rrggbb`, in any case. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> QRResult<Self> {
        let err = || QRError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return Err(err());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());
        match digits.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, c) in rgb.iter_mut().enumerate() {
                    *c = channel(&digits[i..i + 1])? * 0x11;
                }
                Ok(Self(rgb))
            }
            6 => Ok(Self([
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ])),
            _ => Err(err()),
        }
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, 255])
    }

    // Channel wise linear interpolation
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mut res = [0u8; 3];
        for (i, c) in res.iter_mut().enumerate() {
            let (a, b) = (self.0[i] as f32, other.0[i] as f32);
            *c = (a + (b - a) * t).round() as u8;
        }
        Rgb(res)
    }
}

impl FromStr for Rgb {
    type Err = QRError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Rgb> for Rgba<u8> {
    fn from(c: Rgb) -> Self {
        c.to_rgba()
    }
}


// Color palette
//------------------------------------------------------------------------------

/// Three representative colors used to style a code.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct ColorPalette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub background: Rgb,
}

impl ColorPalette {
    pub fn new(primary: Rgb, secondary: Rgb, background: Rgb) -> Self {
        Self { primary, secondary, background }
    }

    /// Fills missing entries: secondary falls back to primary, background to white.
    pub fn from_colors(colors: &[Rgb]) -> Option<Self> {
        let primary = *colors.first()?;
        let secondary = colors.get(1).copied().unwrap_or(primary);
        let background = colors.get(2).copied().unwrap_or(Rgb::WHITE);
        Some(Self { primary, secondary, background })
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self { primary: Rgb::BLACK, secondary: Rgb::GRAY, background: Rgb::WHITE }
    }
}

// Gradient
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Clone)]
pub struct Gradient {
    pub name: String,
    colors: Vec<Rgb>,
    // Carried along but rendering always runs top left to bottom right
    pub angle: Option<f32>,
    pub is_custom: bool,
}

impl Gradient {
    pub fn new(name: impl Into<String>, colors: Vec<Rgb>) -> QRResult<Self> {
        if colors.is_empty() {
            return Err(QRError::EmptyGradient);
        }
        Ok(Self { name: name.into(), colors, angle: None, is_custom: false })
    }

    pub fn from_hex(name: impl Into<String>, hexes: &[&str]) -> QRResult<Self> {
        let colors = hexes.iter().map(|h| Rgb::from_hex(h)).collect::<QRResult<Vec<_>>>()?;
        Self::new(name, colors)
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = Some(angle);
        self
    }

    pub fn custom(mut self) -> Self {
        self.is_custom = true;
        self
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Color at fraction `t` of the way through, with stops spaced evenly over `0..=1`.
    pub fn sample(&self, t: f32) -> Rgb {
        let n = self.colors.len();
        if n == 1 {
            return self.colors[0];
        }
        let pos = t.clamp(0.0, 1.0) * (n - 1) as f32;
        let i = (pos.floor() as usize).min(n - 2);
        self.colors[i].lerp(self.colors[i + 1], pos - i as f32)
    }

    /// Built in gradients offered when no catalog is available.
    pub fn presets() -> Vec<Gradient> {
        PRESET_GRADIENTS
            .iter()
            .map(|(name, stops)| Gradient {
                name: name.to_string(),
                colors: stops.iter().map(|&c| Rgb(c)).collect(),
                angle: None,
                is_custom: false,
            })
            .collect()
    }
}


// Global constants
//------------------------------------------------------------------------------

static PRESET_GRADIENTS: [(&str, [[u8; 3]; 2]); 5] = [
    ("Ocean Blue", [[0x2e, 0x31, 0x92], [0x1b, 0xff, 0xff]]),
    ("Sunset", [[0xff, 0x51, 0x2f], [0xf0, 0x98, 0x19]]),
    ("Purple Dream", [[0x83, 0x60, 0xc3], [0x2e, 0xbf, 0x91]]),
    ("Pink Flamingo", [[0xf0, 0x93, 0xfb], [0xf5, 0x57, 0x6c]]),
    ("Green Tea", [[0x11, 0x99, 0x8e], [0x38, 0xef, 0x7d]]),
];
