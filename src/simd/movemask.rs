//! Sign-bit gathering (`_mm_movemask_*`).
//!
//! The target ISA has no instruction that collects one bit per lane into a
//! scalar. The tree used here isolates each sign bit, then repeatedly folds
//! neighbouring lanes into one another with shift-right-accumulate at doubling
//! widths (16, 32, 64 bits). After the last fold, byte 0 holds the mask bits of
//! the low half and byte 8 those of the high half.

use super::backend::Active;
use super::lanes::*;
use super::register::{M128, M64};
use super::traits::Backend;

/// `_mm_movemask_epi8`: bit `i` is the most significant bit of byte `i`.
#[inline(always)]
pub fn movemask_epi8(a: M128) -> i32 {
    Active::movemask_epi8(a)
}

/// `_mm_movemask_ps`: bit `i` is the sign of 32-bit lane `i`.
#[inline(always)]
pub fn movemask_ps(a: M128) -> i32 {
    Active::movemask_ps(a)
}

/// `_mm_movemask_pd`: bit `i` is the sign of 64-bit lane `i`.
#[inline(always)]
pub fn movemask_pd(a: M128) -> i32 {
    let x = vshrq_n_u64(a, 63).as_u8x16();
    (x[0] as i32) | ((x[8] as i32) << 1)
}

/// `_mm_movemask_pi8`: bit `i` is the most significant bit of byte `i` of a
/// half register.
#[inline(always)]
pub fn movemask_pi8(a: M64) -> i32 {
    let x = vshr_n_u8(a, 7);
    let x = vsra_n_u16(x, x, 7);
    let x = vsra_n_u32(x, x, 14);
    let x = vsra_n_u64(x, x, 28);
    x.as_u8x8()[0] as i32
}

/// Reduction-tree rendition of [`movemask_epi8`].
#[inline(always)]
pub fn movemask_epi8_tree(a: M128) -> i32 {
    // 0x01 in every byte whose top bit was set
    let high_bits = vshrq_n_u8(a, 7);
    // two bits per 16-bit lane, in its low byte
    let paired = vsraq_n_u16(high_bits, high_bits, 7);
    // four bits per 32-bit lane
    let quads = vsraq_n_u32(paired, paired, 14);
    // eight bits per 64-bit lane
    let octets = vsraq_n_u64(quads, quads, 28);

    let bytes = octets.as_u8x16();
    (bytes[0] as i32) | ((bytes[8] as i32) << 8)
}

/// Reduction-tree rendition of [`movemask_ps`].
#[inline(always)]
pub fn movemask_ps_tree(a: M128) -> i32 {
    let signs = vshrq_n_u32(a, 31);
    let paired = vsraq_n_u64(signs, signs, 31);

    let bytes = paired.as_u8x16();
    (bytes[0] as i32) | ((bytes[8] as i32) << 2)
}

/// Lane-by-lane oracle for [`movemask_epi8`].
pub fn movemask_epi8_scalar(a: M128) -> i32 {
    a.as_u8x16()
        .iter()
        .enumerate()
        .fold(0, |mask, (i, &byte)| mask | (((byte >> 7) as i32) << i))
}

/// Lane-by-lane oracle for [`movemask_ps`].
pub fn movemask_ps_scalar(a: M128) -> i32 {
    a.as_u32x4()
        .iter()
        .enumerate()
        .fold(0, |mask, (i, &lane)| mask | (((lane >> 31) as i32) << i))
}
