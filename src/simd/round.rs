//! Float rounding and float→int conversion with the source ISA's defaults.
//!
//! The default conversion mode rounds to nearest with ties to even. Results
//! that do not fit in an `i32`, and NaN inputs, become the "integer indefinite"
//! value `0x8000_0000`.
//!
//! The scalar rule ([`round_half_even`]) and the packed rule
//! ([`round_nearest_even_lanes`]) make the same decision from the same three
//! values: `floor(x)`, `ceil(x)` and `x - floor(x)`. Above one half takes the
//! ceiling, below takes the floor, and an exact half takes whichever
//! candidate is even.

use num::Float;

use super::backend::Active;
use super::lanes::*;
use super::register::M128;
use super::traits::Backend;
use crate::error::{rounding_immediate_error, Result};

pub const FROUND_TO_NEAREST_INT: i32 = 0x00;
pub const FROUND_TO_NEG_INF: i32 = 0x01;
pub const FROUND_TO_POS_INF: i32 = 0x02;
pub const FROUND_TO_ZERO: i32 = 0x03;
pub const FROUND_CUR_DIRECTION: i32 = 0x04;
pub const FROUND_NO_EXC: i32 = 0x08;

/// The value an out-of-range or NaN conversion produces.
pub const INTEGER_INDEFINITE: i32 = i32::MIN;

/// Rounding direction selected by a rounding-control immediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Nearest, ties to even.
    Nearest,
    /// Toward negative infinity.
    Down,
    /// Toward positive infinity.
    Up,
    /// Toward zero.
    TowardZero,
    /// Whatever the control register says. No control register is emulated,
    /// so this is its reset value, [`RoundingMode::Nearest`].
    Current,
}

impl RoundingMode {
    /// Decodes a rounding-control immediate.
    ///
    /// Bits 0–1 pick a direction, bit 2 overrides them with the current mode
    /// and bit 3 (suppress exceptions) is accepted and ignored. Anything
    /// above `0x0F` is rejected.
    ///
    /// ```
    /// use sselane::simd::round::{RoundingMode, FROUND_NO_EXC, FROUND_TO_ZERO};
    ///
    /// let mode = RoundingMode::from_imm(FROUND_TO_ZERO | FROUND_NO_EXC).unwrap();
    /// assert_eq!(mode, RoundingMode::TowardZero);
    /// assert!(RoundingMode::from_imm(0x10).is_err());
    /// ```
    pub fn from_imm(imm: i32) -> Result<Self> {
        if !(0..=0x0f).contains(&imm) {
            return Err(rounding_immediate_error(imm));
        }
        Ok(Self::decode(imm))
    }

    const fn decode(imm: i32) -> Self {
        if imm & FROUND_CUR_DIRECTION != 0 {
            return RoundingMode::Current;
        }
        match imm & 0x03 {
            0 => RoundingMode::Nearest,
            1 => RoundingMode::Down,
            2 => RoundingMode::Up,
            _ => RoundingMode::TowardZero,
        }
    }

    /// The concrete direction this mode rounds in.
    pub const fn resolve(self) -> Self {
        match self {
            RoundingMode::Current => RoundingMode::Nearest,
            mode => mode,
        }
    }
}

struct RoundingImm<const ROUNDING: i32>;

impl<const ROUNDING: i32> RoundingImm<ROUNDING> {
    const MODE: RoundingMode = {
        assert!(
            0 <= ROUNDING && ROUNDING <= 0x0f,
            "rounding immediate must be in 0..=0x0f"
        );
        RoundingMode::decode(ROUNDING)
    };
}

/// Rounds to the nearest integer, ties to even. NaN and infinities pass
/// through unchanged.
///
/// ```
/// use sselane::simd::round::round_half_even;
///
/// assert_eq!(round_half_even(2.5f32), 2.0);
/// assert_eq!(round_half_even(3.5f32), 4.0);
/// assert_eq!(round_half_even(-2.5f64), -2.0);
/// ```
pub fn round_half_even<F: Float>(x: F) -> F {
    let one = F::one();
    let two = one + one;
    let half = one / two;

    let floor = x.floor();
    let ceil = x.ceil();
    let diff = x - floor;

    if diff > half {
        ceil
    } else if diff < half {
        floor
    } else if (floor / two).fract() == F::zero() {
        floor
    } else {
        ceil
    }
}

// The integer value of an already-rounded float, or the indefinite value.
#[inline(always)]
fn to_i32_or_indefinite<F: Float>(rounded: F) -> i32 {
    rounded.to_i32().unwrap_or(INTEGER_INDEFINITE)
}

/// Rounds to nearest even and converts, yielding [`INTEGER_INDEFINITE`] for
/// NaN and for results outside the `i32` range.
#[inline(always)]
pub fn round_to_i32<F: Float>(x: F) -> i32 {
    to_i32_or_indefinite(round_half_even(x))
}

/// `_mm_cvtss_si32`: converts `f32` lane 0.
pub fn cvtss_si32(a: M128) -> i32 {
    round_to_i32(a.as_f32x4()[0])
}

/// `_mm_cvtsd_si32`: converts `f64` lane 0.
pub fn cvtsd_si32(a: M128) -> i32 {
    round_to_i32(a.as_f64x2()[0])
}

/// `_mm_cvtpd_epi32`: converts both `f64` lanes into `i32` lanes 0 and 1;
/// lanes 2 and 3 are zero.
pub fn cvtpd_epi32(a: M128) -> M128 {
    let [x0, x1] = a.as_f64x2();
    M128::from_i32x4([round_to_i32(x0), round_to_i32(x1), 0, 0])
}

/// `_mm_cvtps_epi32`: converts four `f32` lanes.
#[inline(always)]
pub fn cvtps_epi32(a: M128) -> M128 {
    Active::cvtps_epi32(a)
}

/// Packed nearest-even rounding from lane primitives.
pub fn round_nearest_even_lanes(a: M128) -> M128 {
    let half = vdupq_n_f32(0.5);
    let floor = vrndmq_f32(a);
    let ceil = vrndpq_f32(a);
    let diff = vsubq_f32(a, floor);

    let above = vcgtq_f32(diff, half);
    let tie = vceqq_f32(diff, half);

    // floor - 2·floor(floor / 2) is 1.0 exactly when floor is odd
    let halved = vrndmq_f32(vmulq_f32(floor, half));
    let parity = vsubq_f32(floor, vmulq_f32(halved, vdupq_n_f32(2.0)));
    let odd = vcgtq_f32(parity, vdupq_n_f32(0.0));

    let take_ceil = vorrq(above, vandq(tie, odd));
    vbslq(take_ceil, ceil, floor)
}

/// Lanes whose value lies in `[-2^31, 2^31)`; NaN lanes are excluded.
#[inline(always)]
pub(crate) fn i32_range_mask(a: M128) -> M128 {
    let low = vcgeq_f32(a, vdupq_n_f32(-2_147_483_648.0));
    let high = vcltq_f32(a, vdupq_n_f32(2_147_483_648.0));
    vandq(low, high)
}

/// Lane-primitive rendition of [`cvtps_epi32`].
pub fn cvtps_epi32_soft(a: M128) -> M128 {
    let converted = vcvtq_s32_f32(round_nearest_even_lanes(a));
    vbslq(
        i32_range_mask(a),
        converted,
        vdupq_n_u32(INTEGER_INDEFINITE as u32),
    )
}

/// `_mm_round_ps` with a decoded mode.
pub fn round_ps(a: M128, mode: RoundingMode) -> M128 {
    match mode.resolve() {
        RoundingMode::Down => vrndmq_f32(a),
        RoundingMode::Up => vrndpq_f32(a),
        RoundingMode::TowardZero => vrndq_f32(a),
        _ => round_nearest_even_lanes(a),
    }
}

/// `_mm_round_ps` with a compile-time immediate.
#[inline(always)]
pub fn round_ps_imm<const ROUNDING: i32>(a: M128) -> M128 {
    round_ps(a, RoundingImm::<ROUNDING>::MODE)
}

/// `_mm_floor_ps`.
#[inline(always)]
pub fn floor_ps(a: M128) -> M128 {
    round_ps(a, RoundingMode::Down)
}

/// `_mm_ceil_ps`.
#[inline(always)]
pub fn ceil_ps(a: M128) -> M128 {
    round_ps(a, RoundingMode::Up)
}
