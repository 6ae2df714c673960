//! Bit-exact emulation of SSE 128-bit operations on NEON-style primitives.
//!
//! The crate covers the operations whose emulation needs an actual algorithm
//! rather than a one-to-one instruction mapping: four-lane shuffles, sign-bit
//! masks, 64-bit carry-less multiplication, AES rounds, ties-to-even
//! conversion and CRC-32C. Each is available under its SSE name and returns
//! the same bits on every backend.
//!
//! ```
//! use sselane::simd::register::M128;
//! use sselane::{clmulepi64_si128, movemask_epi8};
//!
//! let a = M128::from_u8x16([0x80, 0, 0, 0xff, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x90]);
//! assert_eq!(movemask_epi8(a), 0b1000_0000_0000_1001);
//!
//! let x = M128::from_u64x2([3, 0]);
//! assert_eq!(clmulepi64_si128::<0x00>(x, x).as_u128(), 5);
//! ```

pub mod error;
pub mod simd;

pub use error::{Result, SselaneError};
pub use simd::aes::{aesenc_si128, aesenclast_si128, aeskeygenassist, aeskeygenassist_si128};
pub use simd::backend::{active_backend, Active, Portable, CAPABILITIES};
pub use simd::clmul::{clmul64, clmulepi64_si128, clmulepi64_si128_dyn};
pub use simd::crc32::{crc32_u16, crc32_u32, crc32_u64, crc32_u8};
pub use simd::movemask::{movemask_epi8, movemask_pd, movemask_pi8, movemask_ps};
pub use simd::register::{M128, M64};
pub use simd::round::{
    ceil_ps, cvtpd_epi32, cvtps_epi32, cvtsd_si32, cvtss_si32, floor_ps, round_ps, round_ps_imm,
    RoundingMode,
};
pub use simd::shuffle::{
    mm_shuffle, shuffle_epi32, shuffle_epi32_dyn, shuffle_pi16, shuffle_ps, shuffle_ps_dyn,
    shufflehi_epi16, shufflelo_epi16,
};
