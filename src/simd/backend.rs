//! Backend selection.
//!
//! The build script decides once, at configuration time, whether the native
//! NEON lowering is compiled in (`cfg(neon)`, with `cfg(neon_aes)` and
//! `cfg(neon_crc)` for the optional extensions). [`Active`] names the result
//! and every SSE-named entry point forwards to it.

use super::aes::{aesenc_table, aesenclast_table, aeskeygenassist_soft};
use super::clmul::vmull_p64_soft;
use super::crc32::{crc32_u16_soft, crc32_u32_soft, crc32_u64_soft, crc32_u8_soft};
use super::movemask::{movemask_epi8_tree, movemask_ps_tree};
use super::register::M128;
use super::round::cvtps_epi32_soft;
use super::traits::Backend;

/// Runs every operation from the software lane primitives and tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct Portable;

impl Backend for Portable {
    const NAME: &'static str = "portable";

    #[inline(always)]
    fn movemask_epi8(a: M128) -> i32 {
        movemask_epi8_tree(a)
    }

    #[inline(always)]
    fn movemask_ps(a: M128) -> i32 {
        movemask_ps_tree(a)
    }

    #[inline(always)]
    fn clmul64(a: u64, b: u64) -> u128 {
        vmull_p64_soft(a, b)
    }

    #[inline(always)]
    fn aesenc(state: M128, round_key: M128) -> M128 {
        aesenc_table(state, round_key)
    }

    #[inline(always)]
    fn aesenclast(state: M128, round_key: M128) -> M128 {
        aesenclast_table(state, round_key)
    }

    #[inline(always)]
    fn aeskeygenassist(key: M128, rcon: u8) -> M128 {
        aeskeygenassist_soft(key, rcon)
    }

    #[inline(always)]
    fn cvtps_epi32(a: M128) -> M128 {
        cvtps_epi32_soft(a)
    }

    #[inline(always)]
    fn crc32_u8(crc: u32, v: u8) -> u32 {
        crc32_u8_soft(crc, v)
    }

    #[inline(always)]
    fn crc32_u16(crc: u32, v: u16) -> u32 {
        crc32_u16_soft(crc, v)
    }

    #[inline(always)]
    fn crc32_u32(crc: u32, v: u32) -> u32 {
        crc32_u32_soft(crc, v)
    }

    #[inline(always)]
    fn crc32_u64(crc: u32, v: u64) -> u32 {
        crc32_u64_soft(crc, v)
    }
}

#[cfg(neon)]
pub use super::neon::Neon;

/// The backend chosen for this build.
#[cfg(neon)]
pub type Active = Neon;

/// The backend chosen for this build.
#[cfg(not(neon))]
pub type Active = Portable;

/// Native extensions compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub neon: bool,
    pub aes: bool,
    pub crc: bool,
}

pub const CAPABILITIES: Capabilities = Capabilities {
    neon: cfg!(neon),
    aes: cfg!(neon_aes),
    crc: cfg!(neon_crc),
};

/// Name of the backend the SSE-named entry points forward to.
pub fn active_backend() -> &'static str {
    Active::NAME
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_follow_backend() {
        if active_backend() == Portable::NAME {
            assert!(!CAPABILITIES.neon);
        } else {
            assert!(CAPABILITIES.neon);
        }
        // the extensions are only enabled on top of the base backend
        assert!(CAPABILITIES.neon || !(CAPABILITIES.aes || CAPABILITIES.crc));
    }

    #[test]
    fn test_portable_backend_is_always_available() {
        let a = M128::from_u8x16([0x80; 16]);
        assert_eq!(Portable::movemask_epi8(a), 0xffff);
        assert_eq!(Portable::clmul64(3, 3), 5);
        assert_eq!(Portable::crc32_u8(0, 0), 0);
    }
}
