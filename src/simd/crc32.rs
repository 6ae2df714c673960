//! CRC-32C accumulation (`_mm_crc32_u8/16/32/64`).
//!
//! Castagnoli polynomial, bit-reflected, exactly as the source instructions
//! compute it: no initial or final inversion inside the instruction, and the
//! operand is consumed least-significant byte first. The usual CRC-32C
//! convention (start from `!0`, invert the result) is left to the caller.

use super::backend::Active;
use super::traits::Backend;

/// The reflected CRC-32C polynomial.
pub const CRC32C_POLY: u32 = 0x82f6_3b78;

/// `_mm_crc32_u8`.
#[inline(always)]
pub fn crc32_u8(crc: u32, v: u8) -> u32 {
    Active::crc32_u8(crc, v)
}

/// `_mm_crc32_u16`.
#[inline(always)]
pub fn crc32_u16(crc: u32, v: u16) -> u32 {
    Active::crc32_u16(crc, v)
}

/// `_mm_crc32_u32`.
#[inline(always)]
pub fn crc32_u32(crc: u32, v: u32) -> u32 {
    Active::crc32_u32(crc, v)
}

/// `_mm_crc32_u64`. Only the low 32 bits of `crc` take part; the upper half
/// of the result is zero.
#[inline(always)]
pub fn crc32_u64(crc: u64, v: u64) -> u64 {
    Active::crc32_u64(crc as u32, v) as u64
}

/// Bitwise rendition of [`crc32_u8`].
#[inline(always)]
pub fn crc32_u8_soft(crc: u32, v: u8) -> u32 {
    let mut crc = crc ^ v as u32;
    for _ in 0..8 {
        crc = (crc >> 1) ^ (CRC32C_POLY & 0u32.wrapping_sub(crc & 1));
    }
    crc
}

#[inline(always)]
pub fn crc32_u16_soft(crc: u32, v: u16) -> u32 {
    v.to_le_bytes().iter().fold(crc, |crc, &b| crc32_u8_soft(crc, b))
}

#[inline(always)]
pub fn crc32_u32_soft(crc: u32, v: u32) -> u32 {
    v.to_le_bytes().iter().fold(crc, |crc, &b| crc32_u8_soft(crc, b))
}

#[inline(always)]
pub fn crc32_u64_soft(crc: u32, v: u64) -> u32 {
    v.to_le_bytes().iter().fold(crc, |crc, &b| crc32_u8_soft(crc, b))
}

// Product of two polynomials modulo the CRC polynomial, reflected form
// (bit 31 is the x^0 coefficient).
fn multiply_mod_poly(a: u32, mut b: u32) -> u32 {
    let mut product = 0;
    for degree in 0..32 {
        if a & (1 << (31 - degree)) != 0 {
            product ^= b;
        }
        b = (b >> 1) ^ (CRC32C_POLY & 0u32.wrapping_sub(b & 1));
    }
    product
}

// x^(8 * bytes) modulo the CRC polynomial.
fn x_pow_bytes(mut bytes: usize) -> u32 {
    let mut result = 1 << 31;
    let mut square = 1 << (31 - 8);
    while bytes != 0 {
        if bytes & 1 != 0 {
            result = multiply_mod_poly(square, result);
        }
        square = multiply_mod_poly(square, square);
        bytes >>= 1;
    }
    result
}

/// Advances a CRC state over `len` zero bytes without touching them.
///
/// With `a` of length `len_b` following `b`,
/// `crc(crc(s, a), b) == crc32c_shift(crc(s, a), len_b) ^ crc(0, b)`,
/// which is what lets independent chunks be accumulated separately.
pub fn crc32c_shift(crc: u32, len: usize) -> u32 {
    multiply_mod_poly(x_pow_bytes(len), crc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checksum(data: &[u8]) -> u32 {
        !data.iter().fold(!0u32, |crc, &b| crc32_u8(crc, b))
    }

    #[test]
    fn test_check_value() {
        assert_eq!(checksum(b"123456789"), 0xe306_9283);
    }

    #[test]
    fn test_zero_state_and_zero_data() {
        assert_eq!(crc32_u8_soft(0, 0), 0);
        assert_eq!(crc32_u64_soft(0, 0), 0);
    }

    #[test]
    fn test_wide_forms_compose_bytes() {
        let v = 0x0123_4567_89ab_cdefu64;
        let bytewise = v
            .to_le_bytes()
            .iter()
            .fold(0x1234_5678u32, |crc, &b| crc32_u8(crc, b));
        assert_eq!(crc32_u64(0x1234_5678, v), bytewise as u64);
        assert_eq!(
            crc32_u32(7, 0xdead_beef),
            crc32_u16(crc32_u16(7, 0xbeef), 0xdead)
        );
    }

    #[test]
    fn test_u64_ignores_upper_state_bits() {
        assert_eq!(crc32_u64(0xffff_ffff_0000_0001, 42), crc32_u64(1, 42));
    }

    #[test]
    fn test_shift_matches_zero_bytes() {
        let state = 0x9abc_def0u32;
        let zeros = [0u8; 37];
        let expected = zeros.iter().fold(state, |crc, &b| crc32_u8_soft(crc, b));
        assert_eq!(crc32c_shift(state, zeros.len()), expected);
        assert_eq!(crc32c_shift(state, 0), state);
    }

    #[test]
    fn test_split_accumulation() {
        let data: Vec<u8> = (0..200u32).map(|i| (i * 31 + 7) as u8).collect();
        let (head, tail) = data.split_at(77);
        let whole = data.iter().fold(!0, |crc, &b| crc32_u8_soft(crc, b));
        let head_crc = head.iter().fold(!0, |crc, &b| crc32_u8_soft(crc, b));
        let tail_crc = tail.iter().fold(0, |crc, &b| crc32_u8_soft(crc, b));
        assert_eq!(crc32c_shift(head_crc, tail.len()) ^ tail_crc, whole);
    }
}
