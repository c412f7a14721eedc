use crate::common::metadata::{ECLevel, Version};

// ECC: Error Correction Codeword generator
pub fn ecc(data: &[u8], ver: Version, ecl: ECLevel) -> (Vec<&[u8]>, Vec<Vec<u8>>) {
    let data_blocks = blockify(data, ver, ecl);

    let ecc_size_per_block = ver.ecc_per_block(ecl);
    let gen_poly = generator_polynomial(ecc_size_per_block);
    let ecc_blocks =
        data_blocks.iter().map(|b| ecc_per_block(b, &gen_poly)).collect::<Vec<_>>();

    (data_blocks, ecc_blocks)
}

pub fn blockify(data: &[u8], ver: Version, ecl: ECLevel) -> Vec<&[u8]> {
    let (block1_size, block1_count, block2_size, block2_count) = ver.data_codewords_per_block(ecl);

    let total_blocks = block1_count + block2_count;
    let total_block1_size = block1_size * block1_count;
    let total_size = total_block1_size + block2_size * block2_count;

    debug_assert!(
        total_size == data.len(),
        "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
        data.len(),
        total_size
    );

    let mut data_blocks = Vec::with_capacity(total_blocks);
    data_blocks.extend(data[..total_block1_size].chunks(block1_size));
    if block2_size > 0 {
        data_blocks.extend(data[total_block1_size..].chunks(block2_size));
    }
    data_blocks
}

// Coefficients of (x - α^0)(x - α^1)...(x - α^(n-1)), highest degree first,
// excluding the leading 1
fn generator_polynomial(degree: usize) -> Vec<u8> {
    let mut poly = vec![0u8; degree];
    if degree == 0 {
        return poly;
    }
    poly[degree - 1] = 1;
    let mut root = 1u8;
    for _ in 0..degree {
        for j in 0..degree {
            poly[j] = gf_mul(poly[j], root);
            if j + 1 < degree {
                poly[j] ^= poly[j + 1];
            }
        }
        root = gf_mul(root, 0x02);
    }
    poly
}

// Performs polynomial long division with data polynomial(num)
// and generator polynomial(den) to compute remainder polynomial,
// the coefficients of which are the ecc
fn ecc_per_block(block: &[u8], gen_poly: &[u8]) -> Vec<u8> {
    let mut rem = vec![0u8; gen_poly.len()];
    for &b in block {
        let factor = b ^ rem[0];
        rem.rotate_left(1);
        if let Some(last) = rem.last_mut() {
            *last = 0;
        }
        for (r, &g) in rem.iter_mut().zip(gen_poly.iter()) {
            *r ^= gf_mul(g, factor);
        }
    }
    rem
}

pub fn interleave<T: Copy, V: AsRef<[T]>>(blocks: &[V]) -> Vec<T> {
    let max_block_size = blocks.iter().map(|b| b.as_ref().len()).max().unwrap_or(0);
    let total_size = blocks.iter().map(|b| b.as_ref().len()).sum::<usize>();
    let mut res = Vec::with_capacity(total_size);
    for i in 0..max_block_size {
        for b in blocks {
            if let Some(&v) = b.as_ref().get(i) {
                res.push(v);
            }
        }
    }
    res
}

// Galois field
//------------------------------------------------------------------------------

fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
    EXP_TABLE[log_sum % 255]
}

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 256 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLYNOMIAL;
        }
        i += 1;
    }
    table
}

const fn build_log_table(exp: &[u8; 256]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

const PRIMITIVE_POLYNOMIAL: u16 = 0x11D;

static EXP_TABLE: [u8; 256] = build_exp_table();

static LOG_TABLE: [u8; 256] = build_log_table(&build_exp_table());
