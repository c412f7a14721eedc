use log::trace;

use super::bitstream::BitStream;
use super::error::{QRError, QRResult};
use super::metadata::{ECLevel, Version, MODE_BITS};

// Byte mode encoder
//------------------------------------------------------------------------------

// Every payload is written as a single byte mode segment
pub fn encode(data: &[u8], ecl: ECLevel) -> QRResult<(BitStream, Version)> {
    let ver = find_min_version(data.len(), ecl)?;
    Ok((encode_with_version(data, ver, ecl)?, ver))
}

pub fn encode_with_version(data: &[u8], ver: Version, ecl: ECLevel) -> QRResult<BitStream> {
    if data.len() > ver.byte_capacity(ecl) {
        return Err(QRError::DataTooLong);
    }
    let bcap = ver.data_bit_capacity(ecl);
    let mut bs = BitStream::new(bcap);
    push_segment(data, ver, &mut bs);
    push_terminator(&mut bs);
    pad_remaining_capacity(&mut bs);
    trace!("Encoded {} bytes into {} bits for version {}", data.len(), bs.len(), *ver);
    Ok(bs)
}

fn find_min_version(len: usize, ecl: ECLevel) -> QRResult<Version> {
    Version::all().find(|v| len <= v.byte_capacity(ecl)).ok_or(QRError::DataTooLong)
}

fn push_segment(data: &[u8], ver: Version, bs: &mut BitStream) {
    bs.push_bits(BYTE_MODE_INDICATOR, MODE_BITS);
    bs.push_bits(data.len() as u16, ver.char_cnt_bits());
    for &b in data {
        bs.push_bits(b, 8);
    }
}

fn push_terminator(bs: &mut BitStream) {
    let term_len = (bs.capacity() - bs.len()).min(4);
    bs.push_bits(0u8, term_len);
}

fn pad_remaining_capacity(bs: &mut BitStream) {
    let offset = bs.len() & 7;
    if offset > 0 {
        bs.push_bits(0u8, 8 - offset);
    }
    let pad_cnt = (bs.capacity() - bs.len()) >> 3;
    PADDING_CODEWORDS.iter().cycle().take(pad_cnt).for_each(|&pc| bs.push_bits(pc, 8));
}


// Global constants
//------------------------------------------------------------------------------

const BYTE_MODE_INDICATOR: u8 = 0b0100;

static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];
