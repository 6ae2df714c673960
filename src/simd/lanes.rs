//! Narrow target-ISA primitives in software.
//!
//! Each function here is a lane-exact rendition of one NEON operation of the
//! same name, over the crate's [`M128`]/[`M64`] registers. The core algorithms
//! (`shuffle`, `movemask`, `clmul`, `aes`, `round`) are written against this
//! vocabulary so the portable backend follows the same instruction sequence a
//! NEON build executes, and can be checked on any host.
//!
//! Lane indices and shift amounts are immediates on the target ISA. Here they
//! are plain arguments; passing an out-of-range value panics on the array
//! index, which mirrors the target assembler rejecting the encoding.

use super::register::{M128, M64};

// ----- half/full register split and join -----

#[inline(always)]
pub fn vget_low(a: M128) -> M64 {
    M64::from_u64(a.as_u64x2()[0])
}

#[inline(always)]
pub fn vget_high(a: M128) -> M64 {
    M64::from_u64(a.as_u64x2()[1])
}

#[inline(always)]
pub fn vcombine(low: M64, high: M64) -> M128 {
    M128::from_u64x2([low.as_u64(), high.as_u64()])
}

// ----- 32-bit lane access -----

#[inline(always)]
pub fn vgetq_lane_u32(a: M128, lane: usize) -> u32 {
    a.as_u32x4()[lane]
}

#[inline(always)]
pub fn vsetq_lane_u32(value: u32, a: M128, lane: usize) -> M128 {
    let mut lanes = a.as_u32x4();
    lanes[lane] = value;
    M128::from_u32x4(lanes)
}

#[inline(always)]
pub fn vdupq_n_u32(value: u32) -> M128 {
    M128::from_u32x4([value; 4])
}

#[inline(always)]
pub fn vmovq_n_u32(value: u32) -> M128 {
    vdupq_n_u32(value)
}

#[inline(always)]
pub fn vdupq_laneq_u32(a: M128, lane: usize) -> M128 {
    vdupq_n_u32(vgetq_lane_u32(a, lane))
}

#[inline(always)]
pub fn vget_lane_u32(a: M64, lane: usize) -> u32 {
    a.as_u32x2()[lane]
}

#[inline(always)]
pub fn vset_lane_u32(value: u32, a: M64, lane: usize) -> M64 {
    let mut lanes = a.as_u32x2();
    lanes[lane] = value;
    M64::from_u32x2(lanes)
}

#[inline(always)]
pub fn vdup_lane_u32(a: M64, lane: usize) -> M64 {
    M64::from_u32x2([vget_lane_u32(a, lane); 2])
}

/// Swaps the two 32-bit lanes of a half register.
#[inline(always)]
pub fn vrev64_u32(a: M64) -> M64 {
    let [x, y] = a.as_u32x2();
    M64::from_u32x2([y, x])
}

// ----- 16-bit lane access -----

#[inline(always)]
pub fn vgetq_lane_u16(a: M128, lane: usize) -> u16 {
    a.as_u16x8()[lane]
}

#[inline(always)]
pub fn vsetq_lane_u16(value: u16, a: M128, lane: usize) -> M128 {
    let mut lanes = a.as_u16x8();
    lanes[lane] = value;
    M128::from_u16x8(lanes)
}

#[inline(always)]
pub fn vget_lane_u16(a: M64, lane: usize) -> u16 {
    a.as_u16x4()[lane]
}

#[inline(always)]
pub fn vset_lane_u16(value: u16, a: M64, lane: usize) -> M64 {
    let mut lanes = a.as_u16x4();
    lanes[lane] = value;
    M64::from_u16x4(lanes)
}

// ----- extract (concatenate and take a window) -----

/// `vextq_u32`: lanes `n..n+4` of the concatenation `a:b`.
#[inline(always)]
pub fn vextq_u32(a: M128, b: M128, n: usize) -> M128 {
    assert!(n < 4, "vextq_u32 immediate must be < 4");
    let (a, b) = (a.as_u32x4(), b.as_u32x4());
    let mut out = [0u32; 4];
    for (i, lane) in out.iter_mut().enumerate() {
        let j = i + n;
        *lane = if j < 4 { a[j] } else { b[j - 4] };
    }
    M128::from_u32x4(out)
}

/// `vextq_u8`: bytes `n..n+16` of the concatenation `a:b`.
#[inline(always)]
pub fn vextq_u8(a: M128, b: M128, n: usize) -> M128 {
    assert!(n < 16, "vextq_u8 immediate must be < 16");
    let (a, b) = (a.as_u8x16(), b.as_u8x16());
    let mut out = [0u8; 16];
    for (i, byte) in out.iter_mut().enumerate() {
        let j = i + n;
        *byte = if j < 16 { a[j] } else { b[j - 16] };
    }
    M128::from_u8x16(out)
}

/// `vext_u8`: bytes `n..n+8` of the concatenation `a:b`.
#[inline(always)]
pub fn vext_u8(a: M64, b: M64, n: usize) -> M64 {
    assert!(n < 8, "vext_u8 immediate must be < 8");
    let (a, b) = (a.as_u8x8(), b.as_u8x8());
    let mut out = [0u8; 8];
    for (i, byte) in out.iter_mut().enumerate() {
        let j = i + n;
        *byte = if j < 8 { a[j] } else { b[j - 8] };
    }
    M64::from_u8x8(out)
}

// ----- 64-bit lane zip / unzip -----

#[inline(always)]
pub fn vzip1q_u64(a: M128, b: M128) -> M128 {
    M128::from_u64x2([a.as_u64x2()[0], b.as_u64x2()[0]])
}

#[inline(always)]
pub fn vzip2q_u64(a: M128, b: M128) -> M128 {
    M128::from_u64x2([a.as_u64x2()[1], b.as_u64x2()[1]])
}

// With two 64-bit lanes, unzip-even/odd select the same lanes as zip-low/high.
#[inline(always)]
pub fn vuzp1q_u64(a: M128, b: M128) -> M128 {
    vzip1q_u64(a, b)
}

#[inline(always)]
pub fn vuzp2q_u64(a: M128, b: M128) -> M128 {
    vzip2q_u64(a, b)
}

// ----- bitwise -----

#[inline(always)]
pub fn veorq(a: M128, b: M128) -> M128 {
    M128::from_u128(a.as_u128() ^ b.as_u128())
}

#[inline(always)]
pub fn vandq(a: M128, b: M128) -> M128 {
    M128::from_u128(a.as_u128() & b.as_u128())
}

#[inline(always)]
pub fn vorrq(a: M128, b: M128) -> M128 {
    M128::from_u128(a.as_u128() | b.as_u128())
}

/// Bitwise select: bits of `a` where `mask` is set, bits of `b` elsewhere.
#[inline(always)]
pub fn vbslq(mask: M128, a: M128, b: M128) -> M128 {
    let m = mask.as_u128();
    M128::from_u128((a.as_u128() & m) | (b.as_u128() & !m))
}

// ----- shifts -----

#[inline(always)]
pub fn vshrq_n_u8(a: M128, n: u32) -> M128 {
    M128::from_u8x16(a.as_u8x16().map(|x| x >> n))
}

#[inline(always)]
pub fn vshr_n_u8(a: M64, n: u32) -> M64 {
    M64::from_u8x8(a.as_u8x8().map(|x| x >> n))
}

#[inline(always)]
pub fn vshlq_n_u8(a: M128, n: u32) -> M128 {
    M128::from_u8x16(a.as_u8x16().map(|x| x << n))
}

/// Arithmetic (sign-propagating) right shift of signed bytes.
#[inline(always)]
pub fn vshrq_n_s8(a: M128, n: u32) -> M128 {
    M128::from_i8x16(a.as_i8x16().map(|x| x >> n))
}

#[inline(always)]
pub fn vshrq_n_u32(a: M128, n: u32) -> M128 {
    M128::from_u32x4(a.as_u32x4().map(|x| x >> n))
}

#[inline(always)]
pub fn vshrq_n_u64(a: M128, n: u32) -> M128 {
    M128::from_u64x2(a.as_u64x2().map(|x| x >> n))
}

/// Shift right and accumulate: `a + (b >> n)` per 16-bit lane, wrapping.
#[inline(always)]
pub fn vsraq_n_u16(a: M128, b: M128, n: u32) -> M128 {
    let (a, b) = (a.as_u16x8(), b.as_u16x8());
    M128::from_u16x8(std::array::from_fn(|i| a[i].wrapping_add(b[i] >> n)))
}

#[inline(always)]
pub fn vsraq_n_u32(a: M128, b: M128, n: u32) -> M128 {
    let (a, b) = (a.as_u32x4(), b.as_u32x4());
    M128::from_u32x4(std::array::from_fn(|i| a[i].wrapping_add(b[i] >> n)))
}

#[inline(always)]
pub fn vsraq_n_u64(a: M128, b: M128, n: u32) -> M128 {
    let (a, b) = (a.as_u64x2(), b.as_u64x2());
    M128::from_u64x2([
        a[0].wrapping_add(b[0] >> n),
        a[1].wrapping_add(b[1] >> n),
    ])
}

#[inline(always)]
pub fn vsra_n_u16(a: M64, b: M64, n: u32) -> M64 {
    let (a, b) = (a.as_u16x4(), b.as_u16x4());
    M64::from_u16x4(std::array::from_fn(|i| a[i].wrapping_add(b[i] >> n)))
}

#[inline(always)]
pub fn vsra_n_u32(a: M64, b: M64, n: u32) -> M64 {
    let (a, b) = (a.as_u32x2(), b.as_u32x2());
    M64::from_u32x2([a[0].wrapping_add(b[0] >> n), a[1].wrapping_add(b[1] >> n)])
}

#[inline(always)]
pub fn vsra_n_u64(a: M64, b: M64, n: u32) -> M64 {
    M64::from_u64(a.as_u64().wrapping_add(b.as_u64() >> n))
}

// ----- byte permutes -----

/// Table lookup: byte `i` of the result is `table[idx[i]]`, or zero when the
/// index is 16 or more.
#[inline(always)]
pub fn vqtbl1q_u8(table: M128, idx: M128) -> M128 {
    let table = table.as_u8x16();
    M128::from_u8x16(
        idx.as_u8x16()
            .map(|i| table.get(i as usize).copied().unwrap_or(0)),
    )
}

/// Swaps the two 16-bit halves of every 32-bit lane.
#[inline(always)]
pub fn vrev32q_u16(a: M128) -> M128 {
    M128::from_u32x4(a.as_u32x4().map(|x| x.rotate_left(16)))
}

// ----- polynomial multiply -----

/// Eight independent 8×8→16-bit carry-less products of corresponding bytes.
#[inline(always)]
pub fn vmull_p8(a: M64, b: M64) -> M128 {
    let (a, b) = (a.as_u8x8(), b.as_u8x8());
    M128::from_u16x8(std::array::from_fn(|i| pmul8(a[i], b[i])))
}

#[inline(always)]
fn pmul8(a: u8, b: u8) -> u16 {
    let (a, b) = (a as u16, b as u16);
    let mut acc = 0u16;
    for bit in 0..8 {
        // Branch-free: an all-ones mask when the bit of `b` is set.
        let mask = 0u16.wrapping_sub((b >> bit) & 1);
        acc ^= (a << bit) & mask;
    }
    acc
}

// ----- 32-bit float lanes -----

#[inline(always)]
pub fn vdupq_n_f32(value: f32) -> M128 {
    M128::from_f32x4([value; 4])
}

#[inline(always)]
pub fn vsubq_f32(a: M128, b: M128) -> M128 {
    let (a, b) = (a.as_f32x4(), b.as_f32x4());
    M128::from_f32x4([a[0] - b[0], a[1] - b[1], a[2] - b[2], a[3] - b[3]])
}

#[inline(always)]
pub fn vmulq_f32(a: M128, b: M128) -> M128 {
    let (a, b) = (a.as_f32x4(), b.as_f32x4());
    M128::from_f32x4([a[0] * b[0], a[1] * b[1], a[2] * b[2], a[3] * b[3]])
}

/// Round toward negative infinity.
#[inline(always)]
pub fn vrndmq_f32(a: M128) -> M128 {
    M128::from_f32x4(a.as_f32x4().map(f32::floor))
}

/// Round toward positive infinity.
#[inline(always)]
pub fn vrndpq_f32(a: M128) -> M128 {
    M128::from_f32x4(a.as_f32x4().map(f32::ceil))
}

/// Round toward zero.
#[inline(always)]
pub fn vrndq_f32(a: M128) -> M128 {
    M128::from_f32x4(a.as_f32x4().map(f32::trunc))
}

fn compare_f32(a: M128, b: M128, cmp: impl Fn(f32, f32) -> bool) -> M128 {
    let (a, b) = (a.as_f32x4(), b.as_f32x4());
    M128::from_u32x4(std::array::from_fn(|i| {
        if cmp(a[i], b[i]) {
            u32::MAX
        } else {
            0
        }
    }))
}

#[inline(always)]
pub fn vceqq_f32(a: M128, b: M128) -> M128 {
    compare_f32(a, b, |x, y| x == y)
}

#[inline(always)]
pub fn vcgtq_f32(a: M128, b: M128) -> M128 {
    compare_f32(a, b, |x, y| x > y)
}

#[inline(always)]
pub fn vcgeq_f32(a: M128, b: M128) -> M128 {
    compare_f32(a, b, |x, y| x >= y)
}

#[inline(always)]
pub fn vcltq_f32(a: M128, b: M128) -> M128 {
    compare_f32(a, b, |x, y| x < y)
}

/// Float to signed integer, rounding toward zero, saturating; NaN becomes 0.
#[inline(always)]
pub fn vcvtq_s32_f32(a: M128) -> M128 {
    M128::from_i32x4(a.as_f32x4().map(|x| x as i32))
}
