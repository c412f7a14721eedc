use std::ops::Deref;

use crate::common::{
    iter::EncRegionIter,
    mask::MaskPattern,
    metadata::{
        generate_format_info_qr, Color, ECLevel, Version, FORMAT_INFO_BIT_LEN,
        VERSION_INFO_BIT_LEN,
    },
    BitStream,
};
use crate::matrix::QRMatrix;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Version(Color),
    Format(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Version(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask: None }
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    pub fn to_matrix(&self) -> QRMatrix {
        let modules = self.grid.iter().map(|m| **m == Color::Dark).collect();
        QRMatrix::new(self.ver, self.ecl, modules)
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i32;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for y in 0..w {
            for x in 0..w {
                let c = match self.get(x, y) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    // Negative coordinates wrap around from the far edge
    fn coord_to_index(&self, x: i32, y: i32) -> usize {
        let w = self.w as i32;
        debug_assert!(-w <= x && x < w, "x should be within -w..w: {x}");
        debug_assert!(-w <= y && y < w, "y should be within -w..w: {y}");

        let x = if x < 0 { x + w } else { x };
        let y = if y < 0 { y + w } else { y };
        (y * w + x) as _
    }

    pub fn get(&self, x: i32, y: i32) -> Module {
        self.grid[self.coord_to_index(x, y)]
    }

    pub(crate) fn get_mut(&mut self, x: i32, y: i32) -> &mut Module {
        let index = self.coord_to_index(x, y);
        &mut self.grid[index]
    }

    pub(crate) fn set(&mut self, x: i32, y: i32, module: Module) {
        *self.get_mut(x, y) = module;
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(-4, 3);
        self.draw_finder_pattern_at(3, -4);
    }

    // Draws the 7x7 finder along with its separator on the inner sides
    fn draw_finder_pattern_at(&mut self, x: i32, y: i32) {
        let (dx_left, dx_right) = if x > 0 { (-3, 4) } else { (-4, 3) };
        let (dy_top, dy_bottom) = if y > 0 { (-3, 4) } else { (-4, 3) };
        for j in dy_top..=dy_bottom {
            for i in dx_left..=dx_right {
                self.set(
                    x + i,
                    y + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Func(Color::Light),
                        (3 | -3, _) | (_, 3 | -3) => Module::Func(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Func(Color::Light),
                        _ => Module::Func(Color::Dark),
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod finder_pattern_tests {
    use super::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_finder_pattern_qr() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        qr.draw_finder_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.....Ffffffff\n\
             fFFFFFfF.....FfFFFFFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFFFFFfF.....FfFFFFFf\n\
             fffffffF.....Ffffffff\n\
             FFFFFFFF.....FFFFFFFF\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             FFFFFFFF.............\n\
             fffffffF.............\n\
             fFFFFFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFFFFFfF.............\n\
             fffffffF.............\n"
        );
    }
}

// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i32;
        let (off, last) = (6, w - 9);
        self.draw_line(8, off, last, off);
        self.draw_line(off, 8, off, last);
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        debug_assert!(x1 == x2 || y1 == y2, "Line is neither vertical nor horizontal");

        if y1 == y2 {
            for i in x1..=x2 {
                let m =
                    if i & 1 == 0 { Module::Func(Color::Dark) } else { Module::Func(Color::Light) };
                self.set(i, y1, m);
            }
        } else {
            for j in y1..=y2 {
                let m =
                    if j & 1 == 0 { Module::Func(Color::Dark) } else { Module::Func(Color::Light) };
                self.set(x1, j, m);
            }
        }
    }
}

// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &y in &poses {
            for &x in &poses {
                self.draw_alignment_pattern_at(x, y)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, x: i32, y: i32) {
        let w = self.w as i32;
        // Overlaps with finder patterns
        if (x == 6 && (y == 6 || y == w - 7)) || (x == w - 7 && y == 6) {
            return;
        }
        for j in -2..=2 {
            for i in -2..=2 {
                self.set(
                    x + i,
                    y + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Func(Color::Dark),
                        _ => Module::Func(Color::Light),
                    },
                )
            }
        }
    }
}

// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
    }
}


// Format & version info
//------------------------------------------------------------------------------

impl QR {
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, format_info: u32) {
        self.draw_number(
            format_info,
            FORMAT_INFO_BIT_LEN,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_QR_MAIN,
        );
        self.draw_number(
            format_info,
            FORMAT_INFO_BIT_LEN,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_QR_SIDE,
        );
        // Dark module
        self.set(8, -8, Module::Format(Color::Dark));
    }

    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let ver_info = self.ver.info();
        let w = self.w as i32;
        // Bit i sits in the 6x3 blocks next to the top right & bottom left finders
        for i in 0..VERSION_INFO_BIT_LEN as i32 {
            let clr = Color::from((ver_info >> i) & 1 == 1);
            let a = w - 11 + i % 3;
            let b = i / 3;
            self.set(a, b, Module::Version(clr));
            self.set(b, a, Module::Version(clr));
        }
    }

    // Draws the number msb first onto the coords
    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i32, i32)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for &(x, y) in coords {
            if number & mask == 0 {
                self.set(x, y, off_clr);
            } else {
                self.set(x, y, on_clr);
            }
            mask >>= 1;
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_encoding_region(&mut self, payload: BitStream) {
        self.reserve_format_area();
        self.draw_version_info();
        self.draw_payload(payload);

        debug_assert!(!self.grid.contains(&Module::Empty), "Empty module found in debug");
    }

    fn draw_payload(&mut self, payload: BitStream) {
        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload {
            let module = Module::Data(Color::from(bit));
            for (x, y) in coords.by_ref() {
                if matches!(self.get(x, y), Module::Empty) {
                    self.set(x, y, module);
                    break;
                }
            }
        }
        self.fill_remainder_bits(coords);
    }

    fn fill_remainder_bits(&mut self, coords: impl Iterator<Item = (i32, i32)>) {
        for (x, y) in coords {
            if matches!(self.get(x, y), Module::Empty) {
                self.set(x, y, Module::Data(Color::Light));
            }
        }
    }

    pub(crate) fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_functions();
        let w = self.w as i32;
        for y in 0..w {
            for x in 0..w {
                if mask_fn(x, y) {
                    if let Module::Data(clr) = self.get(x, y) {
                        self.set(x, y, Module::Data(!clr))
                    }
                }
            }
        }
        let format_info = generate_format_info_qr(self.ecl, pattern);
        self.draw_format_info(format_info);
    }
}


// Global constants
//------------------------------------------------------------------------------

// (x, y) positions, msb first
static FORMAT_INFO_COORDS_QR_MAIN: [(i32, i32); 15] = [
    (0, 8),
    (1, 8),
    (2, 8),
    (3, 8),
    (4, 8),
    (5, 8),
    (7, 8),
    (8, 8),
    (8, 7),
    (8, 5),
    (8, 4),
    (8, 3),
    (8, 2),
    (8, 1),
    (8, 0),
];

static FORMAT_INFO_COORDS_QR_SIDE: [(i32, i32); 15] = [
    (8, -1),
    (8, -2),
    (8, -3),
    (8, -4),
    (8, -5),
    (8, -6),
    (8, -7),
    (-8, 8),
    (-7, 8),
    (-6, 8),
    (-5, 8),
    (-4, 8),
    (-3, 8),
    (-2, 8),
    (-1, 8),
];
