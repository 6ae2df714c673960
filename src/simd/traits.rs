use super::register::M128;

/// An implementation strategy for the operations whose lowering differs
/// between the portable and the native build.
///
/// Every backend must return exactly the same bits for the same inputs; they
/// only differ in which instructions produce them.
pub trait Backend {
    /// Short name reported by [`super::backend::active_backend`].
    const NAME: &'static str;

    fn movemask_epi8(a: M128) -> i32;
    fn movemask_ps(a: M128) -> i32;

    fn clmul64(a: u64, b: u64) -> u128;

    fn aesenc(state: M128, round_key: M128) -> M128;
    fn aesenclast(state: M128, round_key: M128) -> M128;
    fn aeskeygenassist(key: M128, rcon: u8) -> M128;

    fn cvtps_epi32(a: M128) -> M128;

    fn crc32_u8(crc: u32, v: u8) -> u32;
    fn crc32_u16(crc: u32, v: u16) -> u32;
    fn crc32_u32(crc: u32, v: u32) -> u32;
    fn crc32_u64(crc: u32, v: u64) -> u32;
}

/// Per-block sign masks over a byte slice, one `u16` per 16 bytes. A short
/// final block is treated as zero-padded.
pub trait SimdMovemask {
    type Output;

    fn simd_movemask(self) -> Self::Output;
    fn par_simd_movemask(self) -> Self::Output;
    fn scalar_movemask(self) -> Self::Output;
}

/// Nearest-even `f32` → `i32` conversion of every element.
pub trait SimdConvert {
    type Output;

    fn simd_cvtps_epi32(self) -> Self::Output;
    fn par_simd_cvtps_epi32(self) -> Self::Output;
    fn scalar_cvtps_epi32(self) -> Self::Output;
}

/// Standard CRC-32C (initial value `!0`, inverted result) of a byte slice.
pub trait SimdCrc32c {
    fn simd_crc32c(self) -> u32;
    fn par_simd_crc32c(self) -> u32;
    fn scalar_crc32c(self) -> u32;
}
