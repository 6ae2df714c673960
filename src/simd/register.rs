//! Register model shared by every emulated operation.
//!
//! `M128` and `M64` carry raw bits only. Code reads and writes them through
//! typed lane views (`as_u8x16`, `from_f32x4`, ...). A view never changes the
//! underlying bits; lane 0 always occupies the lowest-addressed bytes, which is
//! the lane order both the source and the target ISA use.

use crate::error::{length_error, Result, SselaneError};

/// Width of a full vector register in bytes.
pub const M128_BYTES: usize = 16;

/// Width of a half (legacy 64-bit) register in bytes.
pub const M64_BYTES: usize = 8;

/// A 128-bit vector register with no fixed element type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(C, align(16))]
pub struct M128([u8; M128_BYTES]);

/// A 64-bit half register with no fixed element type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(C, align(8))]
pub struct M64([u8; M64_BYTES]);

macro_rules! lane_view {
    ($reg:ident, $width:expr, $as_fn:ident, $from_fn:ident, $t:ty, $lanes:expr) => {
        impl $reg {
            #[doc = concat!("Reads the register as `", stringify!($lanes), "` lanes of `", stringify!($t), "`.")]
            #[inline(always)]
            pub fn $as_fn(self) -> [$t; $lanes] {
                const SIZE: usize = std::mem::size_of::<$t>();
                let mut out = [<$t>::default(); $lanes];
                for (i, lane) in out.iter_mut().enumerate() {
                    let mut bytes = [0u8; SIZE];
                    bytes.copy_from_slice(&self.0[i * SIZE..(i + 1) * SIZE]);
                    *lane = <$t>::from_le_bytes(bytes);
                }
                out
            }

            #[doc = concat!("Builds a register from `", stringify!($lanes), "` lanes of `", stringify!($t), "`.")]
            #[inline(always)]
            pub fn $from_fn(lanes: [$t; $lanes]) -> Self {
                const SIZE: usize = std::mem::size_of::<$t>();
                let mut bytes = [0u8; $width];
                for (i, lane) in lanes.iter().enumerate() {
                    bytes[i * SIZE..(i + 1) * SIZE].copy_from_slice(&lane.to_le_bytes());
                }
                Self(bytes)
            }
        }
    };
}

lane_view!(M128, M128_BYTES, as_i8x16, from_i8x16, i8, 16);
lane_view!(M128, M128_BYTES, as_u16x8, from_u16x8, u16, 8);
lane_view!(M128, M128_BYTES, as_i16x8, from_i16x8, i16, 8);
lane_view!(M128, M128_BYTES, as_u32x4, from_u32x4, u32, 4);
lane_view!(M128, M128_BYTES, as_i32x4, from_i32x4, i32, 4);
lane_view!(M128, M128_BYTES, as_u64x2, from_u64x2, u64, 2);
lane_view!(M128, M128_BYTES, as_i64x2, from_i64x2, i64, 2);
lane_view!(M128, M128_BYTES, as_f32x4, from_f32x4, f32, 4);
lane_view!(M128, M128_BYTES, as_f64x2, from_f64x2, f64, 2);

lane_view!(M64, M64_BYTES, as_i8x8, from_i8x8, i8, 8);
lane_view!(M64, M64_BYTES, as_u16x4, from_u16x4, u16, 4);
lane_view!(M64, M64_BYTES, as_i16x4, from_i16x4, i16, 4);
lane_view!(M64, M64_BYTES, as_u32x2, from_u32x2, u32, 2);
lane_view!(M64, M64_BYTES, as_i32x2, from_i32x2, i32, 2);
lane_view!(M64, M64_BYTES, as_f32x2, from_f32x2, f32, 2);

impl M128 {
    /// The all-zero register.
    pub const ZERO: M128 = M128([0; M128_BYTES]);

    #[inline(always)]
    pub const fn from_u8x16(bytes: [u8; M128_BYTES]) -> Self {
        Self(bytes)
    }

    #[inline(always)]
    pub const fn as_u8x16(self) -> [u8; M128_BYTES] {
        self.0
    }

    #[inline(always)]
    pub const fn from_u128(bits: u128) -> Self {
        Self(bits.to_le_bytes())
    }

    #[inline(always)]
    pub const fn as_u128(self) -> u128 {
        u128::from_le_bytes(self.0)
    }

    /// Builds a register from a big-endian hex string as printed in test
    /// vectors, e.g. `"00112233..."` places `0x00` in byte 0.
    pub fn from_hex_bytes(hex: &str) -> Result<Self> {
        let digits: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
        if digits.len() != 2 * M128_BYTES {
            return Err(length_error(M128_BYTES, digits.len() / 2));
        }

        let mut bytes = [0u8; M128_BYTES];
        for (byte, pair) in bytes.iter_mut().zip(digits.chunks_exact(2)) {
            let text = String::from_utf8_lossy(pair);
            if !pair.iter().all(u8::is_ascii_hexdigit) {
                return Err(crate::error::validation_error(format!(
                    "invalid hex byte {text:?}"
                )));
            }
            *byte = u8::from_str_radix(&text, 16).map_err(|_| {
                crate::error::validation_error(format!("invalid hex byte {text:?}"))
            })?;
        }
        Ok(Self(bytes))
    }
}

impl M64 {
    /// The all-zero half register.
    pub const ZERO: M64 = M64([0; M64_BYTES]);

    #[inline(always)]
    pub const fn from_u8x8(bytes: [u8; M64_BYTES]) -> Self {
        Self(bytes)
    }

    #[inline(always)]
    pub const fn as_u8x8(self) -> [u8; M64_BYTES] {
        self.0
    }

    #[inline(always)]
    pub const fn from_u64(bits: u64) -> Self {
        Self(bits.to_le_bytes())
    }

    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        u64::from_le_bytes(self.0)
    }
}

impl TryFrom<&[u8]> for M128 {
    type Error = SselaneError;

    fn try_from(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; M128_BYTES] = slice
            .try_into()
            .map_err(|_| length_error(M128_BYTES, slice.len()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<&[u8]> for M64 {
    type Error = SselaneError;

    fn try_from(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; M64_BYTES] = slice
            .try_into()
            .map_err(|_| length_error(M64_BYTES, slice.len()))?;
        Ok(Self(bytes))
    }
}

impl From<u128> for M128 {
    fn from(bits: u128) -> Self {
        Self::from_u128(bits)
    }
}

impl From<M128> for u128 {
    fn from(reg: M128) -> Self {
        reg.as_u128()
    }
}

impl From<u64> for M64 {
    fn from(bits: u64) -> Self {
        Self::from_u64(bits)
    }
}

impl From<M64> for u64 {
    fn from(reg: M64) -> Self {
        reg.as_u64()
    }
}
