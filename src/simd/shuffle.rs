//! Four-lane permutation (`_mm_shuffle_ps`, `_mm_shuffle_epi32`) and its
//! 16-bit relatives.
//!
//! A lane-selection code packs four 2-bit fields; field `i` picks the source
//! lane of result lane `i`. In the two-source form result lanes 0 and 1 come
//! from `a`, lanes 2 and 3 from `b`.
//!
//! Three renditions agree on every code:
//!
//! - [`shuffle_ps`] / [`shuffle_epi32`] resolve the code into a lane table at
//!   compile time and move lanes directly, which is what a native swizzle
//!   builtin does.
//! - [`shuffle_ps_catalogue`] / [`shuffle_epi32_catalogue`] match the code
//!   against patterns with a short closed-form sequence of half-register
//!   operations and fall back to per-lane insertion for the rest.
//! - [`shuffle_ps_default`] / [`shuffle_epi32_default`] always go lane by lane.
//!
//! ```
//! use sselane::simd::register::M128;
//! use sselane::simd::shuffle::{mm_shuffle, shuffle_epi32};
//!
//! let a = M128::from_u32x4([10, 11, 12, 13]);
//! let r = shuffle_epi32::<{ mm_shuffle(0, 1, 2, 3) }>(a);
//! assert_eq!(r.as_u32x4(), [13, 12, 11, 10]);
//! ```

use super::lanes::*;
use super::register::{M128, M64};
use super::Imm8;

/// Builds a lane-selection code, `_MM_SHUFFLE(z, y, x, w)`.
///
/// `w` selects result lane 0 and `z` result lane 3.
pub const fn mm_shuffle(z: i32, y: i32, x: i32, w: i32) -> i32 {
    (z << 6) | (y << 4) | (x << 2) | w
}

/// Splits a code into the four source-lane indices, lane 0 first.
#[inline(always)]
pub const fn lane_selectors(code: u8) -> [usize; 4] {
    [
        (code & 3) as usize,
        ((code >> 2) & 3) as usize,
        ((code >> 4) & 3) as usize,
        ((code >> 6) & 3) as usize,
    ]
}

struct Swizzle<const IMM8: i32>;

impl<const IMM8: i32> Swizzle<IMM8> {
    const LANES: [usize; 4] = {
        let () = Imm8::<IMM8>::OK;
        lane_selectors(IMM8 as u8)
    };
}

/// `_mm_shuffle_ps`: lanes 0 and 1 from `a`, lanes 2 and 3 from `b`.
#[inline(always)]
pub fn shuffle_ps<const IMM8: i32>(a: M128, b: M128) -> M128 {
    let [i0, i1, i2, i3] = Swizzle::<IMM8>::LANES;
    let (a, b) = (a.as_u32x4(), b.as_u32x4());
    M128::from_u32x4([a[i0], a[i1], b[i2], b[i3]])
}

/// `_mm_shuffle_epi32`: single-source permutation of the 32-bit lanes.
#[inline(always)]
pub fn shuffle_epi32<const IMM8: i32>(a: M128) -> M128 {
    let [i0, i1, i2, i3] = Swizzle::<IMM8>::LANES;
    let a = a.as_u32x4();
    M128::from_u32x4([a[i0], a[i1], a[i2], a[i3]])
}

/// Catalogue rendition of [`shuffle_ps`] for a constant code.
#[inline(always)]
pub fn shuffle_ps_catalogue<const IMM8: i32>(a: M128, b: M128) -> M128 {
    let () = Imm8::<IMM8>::OK;
    shuffle_ps_dyn(a, b, IMM8 as u8)
}

/// Catalogue rendition of [`shuffle_epi32`] for a constant code.
#[inline(always)]
pub fn shuffle_epi32_catalogue<const IMM8: i32>(a: M128) -> M128 {
    let () = Imm8::<IMM8>::OK;
    shuffle_epi32_dyn(a, IMM8 as u8)
}

/// Two-source shuffle with a runtime code.
pub fn shuffle_ps_dyn(a: M128, b: M128, code: u8) -> M128 {
    match code {
        // 1032
        0x4e => vcombine(vget_high(a), vget_low(b)),
        // 2301
        0xb1 => vcombine(vrev64_u32(vget_low(a)), vrev64_u32(vget_high(b))),
        // 0321
        0x39 => vcombine(
            vget_high(vextq_u32(a, a, 3)),
            vget_low(vextq_u32(b, b, 3)),
        ),
        // 2103
        0x93 => vcombine(
            vget_low(vextq_u32(a, a, 3)),
            vget_high(vextq_u32(b, b, 3)),
        ),
        // 1010, movelh
        0x44 => vcombine(vget_low(a), vget_low(b)),
        // 1001
        0x41 => vcombine(vrev64_u32(vget_low(a)), vget_low(b)),
        // 0101
        0x11 => vcombine(vrev64_u32(vget_low(a)), vrev64_u32(vget_low(b))),
        // 3210
        0xe4 => vcombine(vget_low(a), vget_high(b)),
        // 0011
        0x05 => vcombine(vdup_lane_u32(vget_low(a), 1), vdup_lane_u32(vget_low(b), 0)),
        // 0022
        0x0a => vcombine(vdup_lane_u32(vget_high(a), 0), vdup_lane_u32(vget_low(b), 0)),
        // 2200
        0xa0 => vcombine(vdup_lane_u32(vget_low(a), 0), vdup_lane_u32(vget_high(b), 0)),
        // 3202
        0xe2 => {
            let a0 = vgetq_lane_u32(a, 0);
            let a22 = vdup_lane_u32(vget_high(a), 0);
            vcombine(vset_lane_u32(a0, a22, 1), vget_high(b))
        }
        // 3232, movehl
        0xee => vcombine(vget_high(a), vget_high(b)),
        // 1133
        0x5f => vcombine(vdup_lane_u32(vget_high(a), 1), vdup_lane_u32(vget_low(b), 1)),
        // 2010
        0x84 => vcombine(vget_low(a), even_lanes(b)),
        // 2001
        0x81 => vcombine(vrev64_u32(vget_low(a)), even_lanes(b)),
        // 2032
        0x8e => vcombine(vget_high(a), even_lanes(b)),
        _ => shuffle_ps_default(a, b, code),
    }
}

// [b0, b2]
#[inline(always)]
fn even_lanes(b: M128) -> M64 {
    let b2 = vgetq_lane_u32(b, 2);
    vset_lane_u32(b2, vdup_lane_u32(vget_low(b), 0), 1)
}

/// Single-source shuffle with a runtime code.
pub fn shuffle_epi32_dyn(a: M128, code: u8) -> M128 {
    match code {
        // 1032
        0x4e => vcombine(vget_high(a), vget_low(a)),
        // 2301
        0xb1 => vcombine(vrev64_u32(vget_low(a)), vrev64_u32(vget_high(a))),
        // 0321
        0x39 => vextq_u32(a, a, 1),
        // 2103
        0x93 => vextq_u32(a, a, 3),
        // 1010
        0x44 => vcombine(vget_low(a), vget_low(a)),
        // 1001
        0x41 => vcombine(vrev64_u32(vget_low(a)), vget_low(a)),
        // 0101
        0x11 => {
            let rev = vrev64_u32(vget_low(a));
            vcombine(rev, rev)
        }
        // 2211
        0xa5 => vcombine(vdup_lane_u32(vget_low(a), 1), vdup_lane_u32(vget_high(a), 0)),
        // 0122
        0x1a => vcombine(vdup_lane_u32(vget_high(a), 0), vrev64_u32(vget_low(a))),
        // 3332
        0xfe => vcombine(vget_high(a), vdup_lane_u32(vget_high(a), 1)),
        0x00 => vdupq_laneq_u32(a, 0),
        0x55 => vdupq_laneq_u32(a, 1),
        0xaa => vdupq_laneq_u32(a, 2),
        0xff => vdupq_laneq_u32(a, 3),
        _ => shuffle_epi32_default(a, code),
    }
}

/// Generic two-source shuffle: one indexed lane read and write per lane.
pub fn shuffle_ps_default(a: M128, b: M128, code: u8) -> M128 {
    let [i0, i1, i2, i3] = lane_selectors(code);
    let mut r = vmovq_n_u32(vgetq_lane_u32(a, i0));
    r = vsetq_lane_u32(vgetq_lane_u32(a, i1), r, 1);
    r = vsetq_lane_u32(vgetq_lane_u32(b, i2), r, 2);
    vsetq_lane_u32(vgetq_lane_u32(b, i3), r, 3)
}

/// Generic single-source shuffle.
pub fn shuffle_epi32_default(a: M128, code: u8) -> M128 {
    shuffle_ps_default(a, a, code)
}

/// `_mm_shufflelo_epi16`: permutes the low four 16-bit lanes, keeps the high four.
#[inline(always)]
pub fn shufflelo_epi16<const IMM8: i32>(a: M128) -> M128 {
    let lanes = Swizzle::<IMM8>::LANES;
    let mut r = a;
    for (i, &src) in lanes.iter().enumerate() {
        r = vsetq_lane_u16(vgetq_lane_u16(a, src), r, i);
    }
    r
}

/// `_mm_shufflehi_epi16`: permutes the high four 16-bit lanes, keeps the low four.
#[inline(always)]
pub fn shufflehi_epi16<const IMM8: i32>(a: M128) -> M128 {
    let lanes = Swizzle::<IMM8>::LANES;
    let mut r = a;
    for (i, &src) in lanes.iter().enumerate() {
        r = vsetq_lane_u16(vgetq_lane_u16(a, 4 + src), r, 4 + i);
    }
    r
}

/// `_mm_shuffle_pi16`: permutes the four 16-bit lanes of a half register.
#[inline(always)]
pub fn shuffle_pi16<const IMM8: i32>(a: M64) -> M64 {
    let lanes = Swizzle::<IMM8>::LANES;
    let mut r = a;
    for (i, &src) in lanes.iter().enumerate() {
        r = vset_lane_u16(vget_lane_u16(a, src), r, i);
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (M128, M128) {
        (
            M128::from_u32x4([0xa0, 0xa1, 0xa2, 0xa3]),
            M128::from_u32x4([0xb0, 0xb1, 0xb2, 0xb3]),
        )
    }

    #[test]
    fn test_mm_shuffle_packing() {
        assert_eq!(mm_shuffle(3, 2, 1, 0), 0xe4);
        assert_eq!(mm_shuffle(1, 0, 3, 2), 0x4e);
        assert_eq!(mm_shuffle(0, 0, 0, 0), 0);
        assert_eq!(mm_shuffle(3, 3, 3, 3), 0xff);
        assert_eq!(lane_selectors(0x1b), [3, 2, 1, 0]);
    }

    #[test]
    fn test_identity_and_reverse() {
        let (a, b) = sample();
        assert_eq!(shuffle_ps::<0xe4>(a, b).as_u32x4(), [0xa0, 0xa1, 0xb2, 0xb3]);
        assert_eq!(shuffle_epi32::<0xe4>(a), a);
        assert_eq!(shuffle_epi32::<0x1b>(a).as_u32x4(), [0xa3, 0xa2, 0xa1, 0xa0]);
    }

    // Expected lanes come from the code itself, never from the catalogue.
    fn expected_ps(a: M128, b: M128, code: u8) -> [u32; 4] {
        let [i0, i1, i2, i3] = lane_selectors(code);
        let (a, b) = (a.as_u32x4(), b.as_u32x4());
        [a[i0], a[i1], b[i2], b[i3]]
    }

    fn expected_epi32(a: M128, code: u8) -> [u32; 4] {
        lane_selectors(code).map(|i| a.as_u32x4()[i])
    }

    #[test]
    fn test_catalogue_entries() {
        let (a, b) = sample();
        let codes = [
            0x4e, 0xb1, 0x39, 0x93, 0x44, 0x41, 0x11, 0xe4, 0x05, 0x0a, 0xa0, 0xe2, 0xee, 0x5f,
            0x84, 0x81, 0x8e,
        ];
        for code in codes {
            assert_eq!(
                shuffle_ps_dyn(a, b, code).as_u32x4(),
                expected_ps(a, b, code),
                "code {code:#04x}"
            );
        }
    }

    #[test]
    fn test_neighbouring_codes_are_not_aliased() {
        let (a, b) = sample();
        assert_eq!(shuffle_ps_dyn(a, b, 0x8e).as_u32x4(), [0xa2, 0xa3, 0xb0, 0xb2]);
        assert_eq!(shuffle_ps_dyn(a, b, 0x86).as_u32x4(), [0xa2, 0xa1, 0xb0, 0xb2]);
        assert_eq!(shuffle_ps_catalogue::<0x86>(a, b), shuffle_ps::<0x86>(a, b));
        assert_eq!(shuffle_ps_catalogue::<0x8e>(a, b), shuffle_ps::<0x8e>(a, b));
    }

    #[test]
    fn test_single_source_catalogue_entries() {
        let (a, _) = sample();
        let codes = [
            0x4e, 0xb1, 0x39, 0x93, 0x44, 0x41, 0x11, 0xa5, 0x1a, 0xfe, 0x00, 0x55, 0xaa, 0xff,
        ];
        for code in codes {
            assert_eq!(
                shuffle_epi32_dyn(a, code).as_u32x4(),
                expected_epi32(a, code),
                "code {code:#04x}"
            );
        }
    }

    #[test]
    fn test_every_code_matches_default() {
        let (a, b) = sample();
        for code in 0..=255u8 {
            assert_eq!(shuffle_ps_dyn(a, b, code), shuffle_ps_default(a, b, code));
            assert_eq!(shuffle_epi32_dyn(a, code), shuffle_epi32_default(a, code));
        }
    }

    #[test]
    fn test_const_catalogue_matches_swizzle() {
        let (a, b) = sample();
        assert_eq!(shuffle_ps_catalogue::<0x39>(a, b), shuffle_ps::<0x39>(a, b));
        assert_eq!(shuffle_ps_catalogue::<0x27>(a, b), shuffle_ps::<0x27>(a, b));
        assert_eq!(shuffle_epi32_catalogue::<0xa5>(a), shuffle_epi32::<0xa5>(a));
    }

    #[test]
    fn test_sixteen_bit_shuffles() {
        let a = M128::from_u16x8([0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(shufflelo_epi16::<0x1b>(a).as_u16x8(), [3, 2, 1, 0, 4, 5, 6, 7]);
        assert_eq!(shufflehi_epi16::<0x1b>(a).as_u16x8(), [0, 1, 2, 3, 7, 6, 5, 4]);
        let h = M64::from_u16x4([9, 8, 7, 6]);
        assert_eq!(shuffle_pi16::<0x00>(h).as_u16x4(), [9; 4]);
    }

    #[test]
    fn test_float_payloads_are_moved_by_bits() {
        let a = M128::from_u32x4([0x7fc0_0001, 0xff80_0000, 0x8000_0000, 1]);
        let r = shuffle_epi32::<0x1b>(a);
        assert_eq!(r.as_u32x4(), [1, 0x8000_0000, 0xff80_0000, 0x7fc0_0001]);
    }
}
