use std::ops::{Deref, Not};

use super::error::{QRError, QRResult};
use super::mask::MaskPattern;

// Color
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Color {
    Light,
    Dark,
}

impl Not for Color {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl From<bool> for Color {
    fn from(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

// Error correction level
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub enum ECLevel {
    L = 0,
    M = 1,
    Q = 2,
    H = 3,
}

impl ECLevel {
    // Two bit indicator stored in the format info
    pub fn format_bits(self) -> u32 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }
}

// Version
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord, Hash)]
pub struct Version(usize);

impl Deref for Version {
    type Target = usize;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Version {
    pub const MIN: Version = Version(1);
    pub const MAX: Version = Version(40);

    pub fn new(ver: usize) -> QRResult<Self> {
        if !(1..=40).contains(&ver) {
            return Err(QRError::InvalidVersion);
        }
        Ok(Self(ver))
    }

    pub(crate) fn all() -> impl Iterator<Item = Version> {
        (1..=40).map(Version)
    }

    pub const fn width(self) -> usize {
        self.0 * 4 + 17
    }

    /// Center coordinates of the alignment patterns along either axis.
    pub fn alignment_pattern(self) -> Vec<i32> {
        let ver = self.0 as i32;
        if ver == 1 {
            return Vec::new();
        }
        let count = ver / 7 + 2;
        let step = if ver == 32 { 26 } else { (ver * 4 + count * 2 + 1) / (count * 2 - 2) * 2 };
        let mut poses = vec![6; count as usize];
        let mut pos = self.width() as i32 - 7;
        for p in poses.iter_mut().skip(1).rev() {
            *p = pos;
            pos -= step;
        }
        poses
    }

    // Modules left for data & ecc after function patterns, format & version info
    fn raw_data_modules(self) -> usize {
        let ver = self.0;
        let mut res = (16 * ver + 128) * ver + 64;
        if ver >= 2 {
            let align_cnt = ver / 7 + 2;
            res -= (25 * align_cnt - 10) * align_cnt - 55;
            if ver >= 7 {
                res -= 36;
            }
        }
        res
    }

    pub fn total_codewords(self) -> usize {
        self.raw_data_modules() >> 3
    }

    pub fn remainder_bits(self) -> usize {
        self.raw_data_modules() & 7
    }

    pub fn ecc_per_block(self, ecl: ECLevel) -> usize {
        ECC_PER_BLOCK[ecl as usize][self.0]
    }

    fn block_count(self, ecl: ECLevel) -> usize {
        BLOCK_COUNT[ecl as usize][self.0]
    }

    /// Returns (block1 size, block1 count, block2 size, block2 count) of data codewords.
    pub fn data_codewords_per_block(self, ecl: ECLevel) -> (usize, usize, usize, usize) {
        let total = self.total_codewords();
        let blocks = self.block_count(ecl);
        let long_cnt = total % blocks;
        let short_cnt = blocks - long_cnt;
        let short_sz = total / blocks - self.ecc_per_block(ecl);
        let long_sz = if long_cnt > 0 { short_sz + 1 } else { 0 };
        (short_sz, short_cnt, long_sz, long_cnt)
    }

    pub fn data_codewords(self, ecl: ECLevel) -> usize {
        self.total_codewords() - self.ecc_per_block(ecl) * self.block_count(ecl)
    }

    pub fn data_bit_capacity(self, ecl: ECLevel) -> usize {
        self.data_codewords(ecl) << 3
    }

    // Character count field width for byte mode
    pub fn char_cnt_bits(self) -> usize {
        if self.0 <= 9 {
            8
        } else {
            16
        }
    }

    /// Largest byte-mode payload that fits this version at the given level.
    pub fn byte_capacity(self, ecl: ECLevel) -> usize {
        (self.data_bit_capacity(ecl) - MODE_BITS - self.char_cnt_bits()) >> 3
    }

    // 18 bit version info: 6 bit version followed by 12 bit BCH remainder
    pub fn info(self) -> u32 {
        debug_assert!(self.0 >= 7, "Version info only exists from version 7 onwards");
        let ver = self.0 as u32;
        let mut rem = ver;
        for _ in 0..12 {
            rem = (rem << 1) ^ ((rem >> 11) * VERSION_INFO_GENERATOR);
        }
        (ver << 12) | rem
    }
}

// 15 bit format info: ec level & mask pattern followed by 10 bit BCH remainder, xor masked
pub fn generate_format_info_qr(ecl: ECLevel, mask: MaskPattern) -> u32 {
    let data = (ecl.format_bits() << 3) | *mask as u32;
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * FORMAT_INFO_GENERATOR);
    }
    ((data << 10) | rem) ^ FORMAT_INFO_MASK
}

#[cfg(test)]
mod metadata_tests {
    use test_case::test_case;

    use super::{generate_format_info_qr, ECLevel, Version};
    use crate::common::mask::MaskPattern;

    #[test_case(1, &[])]
    #[test_case(2, &[6, 18])]
    #[test_case(7, &[6, 22, 38])]
    #[test_case(32, &[6, 34, 60, 86, 112, 138])]
    #[test_case(40, &[6, 30, 58, 86, 114, 142, 170])]
    fn test_alignment_pattern(ver: usize, exp: &[i32]) {
        assert_eq!(Version::new(ver).unwrap().alignment_pattern(), exp);
    }

    #[test_case(1, 26, 0)]
    #[test_case(2, 44, 7)]
    #[test_case(7, 196, 0)]
    #[test_case(14, 581, 3)]
    #[test_case(40, 3706, 0)]
    fn test_total_codewords(ver: usize, exp_total: usize, exp_rem: usize) {
        let ver = Version::new(ver).unwrap();
        assert_eq!(ver.total_codewords(), exp_total);
        assert_eq!(ver.remainder_bits(), exp_rem);
    }

    #[test_case(1, ECLevel::M, (16, 1, 0, 0))]
    #[test_case(5, ECLevel::Q, (15, 2, 16, 2))]
    #[test_case(40, ECLevel::H, (15, 20, 16, 61))]
    fn test_data_codewords_per_block(ver: usize, ecl: ECLevel, exp: (usize, usize, usize, usize)) {
        assert_eq!(Version::new(ver).unwrap().data_codewords_per_block(ecl), exp);
    }

    #[test]
    fn test_byte_capacity_h() {
        let exp = [
            7, 14, 24, 34, 44, 58, 64, 84, 98, 119, 137, 155, 177, 194, 220, 250, 280, 310, 338,
            382, 403, 439, 461, 511, 535, 593, 625, 658, 698, 742, 790, 842, 898, 958, 983, 1051,
            1093, 1139, 1219, 1273,
        ];
        let caps = Version::all().map(|v| v.byte_capacity(ECLevel::H)).collect::<Vec<_>>();
        assert_eq!(caps, exp);
    }

    #[test]
    fn test_byte_capacity_l_max() {
        assert_eq!(Version::MAX.byte_capacity(ECLevel::L), 2953);
    }

    #[test]
    fn test_invalid_version() {
        assert!(Version::new(0).is_err());
        assert!(Version::new(41).is_err());
    }

    #[test]
    fn test_version_info() {
        assert_eq!(Version::new(7).unwrap().info(), 0b000111_110010_010100);
        assert_eq!(Version::new(40).unwrap().info(), 0b101000_110001_101001);
    }

    #[test]
    fn test_format_info() {
        assert_eq!(generate_format_info_qr(ECLevel::M, MaskPattern::new(5)), 0b100000011001110);
        assert_eq!(generate_format_info_qr(ECLevel::L, MaskPattern::new(4)), 0b110011000101111);
        assert_eq!(generate_format_info_qr(ECLevel::H, MaskPattern::new(0)), 0b001011010001001);
    }
}

// Global constants
//------------------------------------------------------------------------------

pub const MODE_BITS: usize = 4;

pub const FORMAT_INFO_BIT_LEN: usize = 15;

pub const VERSION_INFO_BIT_LEN: usize = 18;

const FORMAT_INFO_GENERATOR: u32 = 0x537;

const FORMAT_INFO_MASK: u32 = 0x5412;

const VERSION_INFO_GENERATOR: u32 = 0x1F25;

// Indexed by [ec level][version], index 0 unused
static ECC_PER_BLOCK: [[usize; 41]; 4] = [
    [
        0, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28,
        30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ],
    [
        0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30,
        30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
    [
        0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ],
];

// Indexed by [ec level][version], index 0 unused
static BLOCK_COUNT: [[usize; 41]; 4] = [
    [
        0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13,
        14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ],
    [
        0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23,
        25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ],
    [
        0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ],
    [
        0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ],
];
