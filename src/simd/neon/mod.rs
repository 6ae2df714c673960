//! Native ARM NEON lowering of the backend operations.
//!
//! This module is only compiled when the build script detects an AArch64
//! target with Advanced SIMD (`cfg(neon)`). Two optional extensions are
//! picked up independently:
//!
//! - **`cfg(neon_aes)`**: the cryptographic extension, which provides the
//!   64-bit polynomial multiply (`vmull_p64`) and the AES round instructions
//!   (`vaeseq_u8`, `vaesmcq_u8`).
//! - **`cfg(neon_crc)`**: the CRC32 extension (`__crc32c*`).
//!
//! Without an extension the corresponding operations fall back to the
//! portable rendition, so every `Neon` method is always callable.
//!
//! # Bit compatibility
//!
//! The native instructions do not always match the source ISA on their own:
//!
//! - `vaeseq_u8` XORs the key before SubBytes while the source round XORs it
//!   after MixColumns, so the key register passed to AESE is zero and the real
//!   round key is applied at the end.
//! - AESE also applies ShiftRows, which `aeskeygenassist` must not; the key
//!   helper picks its bytes back out of the shifted positions.
//! - `vcvtnq_s32_f32` saturates and maps NaN to zero where the source ISA
//!   produces `0x8000_0000`; those lanes are patched afterwards.

use core::arch::aarch64::*;

use super::register::M128;
use super::traits::Backend;
#[cfg(not(neon_aes))]
use super::{aes, clmul};
#[cfg(not(neon_crc))]
use super::crc32;

/// Lowers the backend operations to NEON intrinsics.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neon;

#[inline(always)]
unsafe fn load(a: M128) -> uint8x16_t {
    let bytes = a.as_u8x16();
    vld1q_u8(bytes.as_ptr())
}

#[inline(always)]
unsafe fn store(v: uint8x16_t) -> M128 {
    let mut bytes = [0u8; 16];
    vst1q_u8(bytes.as_mut_ptr(), v);
    M128::from_u8x16(bytes)
}

#[target_feature(enable = "neon")]
unsafe fn movemask_epi8(a: M128) -> i32 {
    let high_bits = vshrq_n_u8::<7>(load(a));
    let paired = vreinterpretq_u16_u8(high_bits);
    let paired = vreinterpretq_u32_u16(vsraq_n_u16::<7>(paired, paired));
    let quads = vreinterpretq_u64_u32(vsraq_n_u32::<14>(paired, paired));
    let octets = vreinterpretq_u8_u64(vsraq_n_u64::<28>(quads, quads));
    (vgetq_lane_u8::<0>(octets) as i32) | ((vgetq_lane_u8::<8>(octets) as i32) << 8)
}

#[target_feature(enable = "neon")]
unsafe fn movemask_ps(a: M128) -> i32 {
    let signs = vreinterpretq_u64_u32(vshrq_n_u32::<31>(vreinterpretq_u32_u8(load(a))));
    let paired = vreinterpretq_u8_u64(vsraq_n_u64::<31>(signs, signs));
    (vgetq_lane_u8::<0>(paired) as i32) | ((vgetq_lane_u8::<8>(paired) as i32) << 2)
}

#[target_feature(enable = "neon")]
unsafe fn cvtps_epi32(a: M128) -> M128 {
    let converted = vreinterpretq_u8_s32(vcvtnq_s32_f32(vreinterpretq_f32_u8(load(a))));
    let in_range = load(super::round::i32_range_mask(a));
    let indefinite = vreinterpretq_u8_u32(vdupq_n_u32(0x8000_0000));
    store(vbslq_u8(in_range, converted, indefinite))
}

#[cfg(neon_aes)]
#[target_feature(enable = "neon,aes")]
unsafe fn clmul64(a: u64, b: u64) -> u128 {
    vmull_p64(a, b)
}

#[cfg(neon_aes)]
#[target_feature(enable = "neon,aes")]
unsafe fn aesenc(state: M128, round_key: M128) -> M128 {
    let round = vaesmcq_u8(vaeseq_u8(load(state), vdupq_n_u8(0)));
    store(veorq_u8(round, load(round_key)))
}

#[cfg(neon_aes)]
#[target_feature(enable = "neon,aes")]
unsafe fn aesenclast(state: M128, round_key: M128) -> M128 {
    let round = vaeseq_u8(load(state), vdupq_n_u8(0));
    store(veorq_u8(round, load(round_key)))
}

#[cfg(neon_aes)]
#[target_feature(enable = "neon,aes")]
unsafe fn aeskeygenassist(key: M128, rcon: u8) -> M128 {
    // Where bytes 4..8 and 12..16 of the key land after ShiftRows, laid out
    // as [X1, ror8(X1), X3, ror8(X3)].
    const UNSHIFT: [u8; 16] = [4, 1, 14, 11, 1, 14, 11, 4, 12, 9, 6, 3, 9, 6, 3, 12];

    let substituted = vaeseq_u8(load(key), vdupq_n_u8(0));
    let selected = vqtbl1q_u8(substituted, vld1q_u8(UNSHIFT.as_ptr()));
    let rcon = rcon as u32;
    let rcon = M128::from_u32x4([0, rcon, 0, rcon]);
    store(veorq_u8(selected, load(rcon)))
}

#[cfg(neon_crc)]
#[target_feature(enable = "crc")]
unsafe fn crc32_u8(crc: u32, v: u8) -> u32 {
    __crc32cb(crc, v)
}

#[cfg(neon_crc)]
#[target_feature(enable = "crc")]
unsafe fn crc32_u16(crc: u32, v: u16) -> u32 {
    __crc32ch(crc, v)
}

#[cfg(neon_crc)]
#[target_feature(enable = "crc")]
unsafe fn crc32_u32(crc: u32, v: u32) -> u32 {
    __crc32cw(crc, v)
}

#[cfg(neon_crc)]
#[target_feature(enable = "crc")]
unsafe fn crc32_u64(crc: u32, v: u64) -> u32 {
    __crc32cd(crc, v)
}

// The build script only sets each cfg after detecting the matching CPU
// feature, which is what makes the `unsafe` calls below sound.
impl Backend for Neon {
    const NAME: &'static str = "neon";

    #[inline(always)]
    fn movemask_epi8(a: M128) -> i32 {
        unsafe { movemask_epi8(a) }
    }

    #[inline(always)]
    fn movemask_ps(a: M128) -> i32 {
        unsafe { movemask_ps(a) }
    }

    #[inline(always)]
    fn clmul64(a: u64, b: u64) -> u128 {
        #[cfg(neon_aes)]
        {
            unsafe { clmul64(a, b) }
        }
        #[cfg(not(neon_aes))]
        {
            clmul::vmull_p64_soft(a, b)
        }
    }

    #[inline(always)]
    fn aesenc(state: M128, round_key: M128) -> M128 {
        #[cfg(neon_aes)]
        {
            unsafe { aesenc(state, round_key) }
        }
        #[cfg(not(neon_aes))]
        {
            aes::aesenc_table(state, round_key)
        }
    }

    #[inline(always)]
    fn aesenclast(state: M128, round_key: M128) -> M128 {
        #[cfg(neon_aes)]
        {
            unsafe { aesenclast(state, round_key) }
        }
        #[cfg(not(neon_aes))]
        {
            aes::aesenclast_table(state, round_key)
        }
    }

    #[inline(always)]
    fn aeskeygenassist(key: M128, rcon: u8) -> M128 {
        #[cfg(neon_aes)]
        {
            unsafe { aeskeygenassist(key, rcon) }
        }
        #[cfg(not(neon_aes))]
        {
            aes::aeskeygenassist_soft(key, rcon)
        }
    }

    #[inline(always)]
    fn cvtps_epi32(a: M128) -> M128 {
        unsafe { cvtps_epi32(a) }
    }

    #[inline(always)]
    fn crc32_u8(crc: u32, v: u8) -> u32 {
        #[cfg(neon_crc)]
        {
            unsafe { crc32_u8(crc, v) }
        }
        #[cfg(not(neon_crc))]
        {
            crc32::crc32_u8_soft(crc, v)
        }
    }

    #[inline(always)]
    fn crc32_u16(crc: u32, v: u16) -> u32 {
        #[cfg(neon_crc)]
        {
            unsafe { crc32_u16(crc, v) }
        }
        #[cfg(not(neon_crc))]
        {
            crc32::crc32_u16_soft(crc, v)
        }
    }

    #[inline(always)]
    fn crc32_u32(crc: u32, v: u32) -> u32 {
        #[cfg(neon_crc)]
        {
            unsafe { crc32_u32(crc, v) }
        }
        #[cfg(not(neon_crc))]
        {
            crc32::crc32_u32_soft(crc, v)
        }
    }

    #[inline(always)]
    fn crc32_u64(crc: u32, v: u64) -> u32 {
        #[cfg(neon_crc)]
        {
            unsafe { crc32_u64(crc, v) }
        }
        #[cfg(not(neon_crc))]
        {
            crc32::crc32_u64_soft(crc, v)
        }
    }
}
