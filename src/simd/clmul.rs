//! Carry-less (GF(2) polynomial) multiplication, `_mm_clmulepi64_si128`.
//!
//! Without a 64×64 polynomial multiplier the product is assembled from byte
//! products. Writing `A = a0 + a1·x^8 + … + a7·x^56` (same for `B`), the
//! 128-bit product is the XOR of every `ai·bj·x^(8(i+j))`. Rotating one
//! operand by `k` bytes and running eight lanewise 8×8 multiplies produces
//! all pairs whose byte indices differ by `k` at once. Pairs for `k` and
//! `8-k` land in the same lanes, so they are XOR-ed together, split into a
//! low and high part with wrap-around masks, and shifted into place by
//! `k` bytes. Partial products are only ever combined with XOR.

use super::backend::Active;
use super::lanes::*;
use super::register::{M128, M64};
use super::traits::Backend;
use super::Imm8;

/// Carry-less product of two 64-bit polynomials.
#[inline(always)]
pub fn clmul64(a: u64, b: u64) -> u128 {
    Active::clmul64(a, b)
}

/// `_mm_clmulepi64_si128`.
///
/// Bit 0 of `IMM8` picks the 64-bit half of `a` (0 = low, 1 = high) and bit
/// 4 picks the half of `b`; the remaining bits are ignored.
#[inline(always)]
pub fn clmulepi64_si128<const IMM8: i32>(a: M128, b: M128) -> M128 {
    let () = Imm8::<IMM8>::OK;
    clmulepi64_si128_dyn(a, b, IMM8 as u8)
}

/// [`clmulepi64_si128`] with a runtime selector.
#[inline(always)]
pub fn clmulepi64_si128_dyn(a: M128, b: M128, imm: u8) -> M128 {
    let a = a.as_u64x2()[(imm & 0x01) as usize];
    let b = b.as_u64x2()[((imm >> 4) & 0x01) as usize];
    M128::from_u128(clmul64(a, b))
}

/// 64×64→128 carry-less multiply built from `vmull_p8` byte products.
pub fn vmull_p64_soft(a: u64, b: u64) -> u128 {
    let (a, b) = (M64::from_u64(a), M64::from_u64(b));

    // Keep 48/32 bits of the high parts for the 1- and 2-byte rotations and
    // 16/0 bits for the 3- and 4-byte ones; the rest wrapped around.
    let k48_32 = M128::from_u64x2([0x0000_ffff_ffff_ffff, 0x0000_0000_ffff_ffff]);
    let k16_00 = M128::from_u64x2([0x0000_0000_0000_ffff, 0]);

    let d = vmull_p8(a, b);
    let e = vmull_p8(a, vext_u8(b, b, 1));
    let f = vmull_p8(vext_u8(a, a, 1), b);
    let g = vmull_p8(a, vext_u8(b, b, 2));
    let h = vmull_p8(vext_u8(a, a, 2), b);
    let i = vmull_p8(a, vext_u8(b, b, 3));
    let j = vmull_p8(vext_u8(a, a, 3), b);
    let k = vmull_p8(a, vext_u8(b, b, 4));

    let l = veorq(e, f);
    let m = veorq(g, h);
    let n = veorq(i, j);

    let lm_p0 = vzip1q_u64(l, m);
    let lm_p1 = vzip2q_u64(l, m);
    let nk_p0 = vzip1q_u64(n, k);
    let nk_p1 = vzip2q_u64(n, k);

    let t0t1_h = vandq(lm_p1, k48_32);
    let t0t1_l = veorq(veorq(lm_p0, lm_p1), t0t1_h);
    let t2t3_h = vandq(nk_p1, k16_00);
    let t2t3_l = veorq(veorq(nk_p0, nk_p1), t2t3_h);

    let t0 = vuzp1q_u64(t0t1_l, t0t1_h);
    let t1 = vuzp2q_u64(t0t1_l, t0t1_h);
    let t2 = vuzp1q_u64(t2t3_l, t2t3_h);
    let t3 = vuzp2q_u64(t2t3_l, t2t3_h);

    // Shift each term up by its byte distance.
    let t0 = vextq_u8(t0, t0, 15);
    let t1 = vextq_u8(t1, t1, 14);
    let t2 = vextq_u8(t2, t2, 13);
    let t3 = vextq_u8(t3, t3, 12);

    let cross = veorq(veorq(t0, t1), veorq(t2, t3));
    veorq(d, cross).as_u128()
}

/// Bit-serial carry-less multiply, used as the oracle.
pub fn clmul64_reference(a: u64, b: u64) -> u128 {
    (0..64)
        .filter(|bit| (b >> bit) & 1 == 1)
        .fold(0u128, |acc, bit| acc ^ ((a as u128) << bit))
}
