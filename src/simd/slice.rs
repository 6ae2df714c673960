//! Batch kernels over slices, built on the register operations.
//!
//! Every kernel comes in three flavours with identical results: `scalar_*`
//! walks the elements one by one with the lane-wise oracles, `simd_*` runs the
//! register operations block by block, and `par_simd_*` spreads the blocks over
//! the rayon thread pool.

use rayon::prelude::*;

use super::crc32::{crc32_u64, crc32_u8, crc32_u8_soft, crc32c_shift};
use super::movemask::movemask_epi8;
use super::register::{M128, M128_BYTES};
use super::round::{cvtps_epi32, round_to_i32};
use super::traits::{SimdConvert, SimdCrc32c, SimdMovemask};

/// Number of `f32` lanes in a register.
pub const F32_LANES: usize = M128_BYTES / std::mem::size_of::<f32>();

/// Bytes handed to one rayon task by [`SimdCrc32c::par_simd_crc32c`].
pub const PARALLEL_CRC_BLOCK: usize = 64 * 1024;

// ----- movemask -----

#[inline(always)]
fn scalar_movemask(a: &[u8]) -> Vec<u16> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    a.chunks(M128_BYTES)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u16, |mask, (i, &byte)| mask | (((byte >> 7) as u16) << i))
        })
        .collect()
}

// Zero-pads a short final block.
#[inline(always)]
fn movemask_block(chunk: &[u8]) -> u16 {
    let mut bytes = [0u8; M128_BYTES];
    bytes[..chunk.len()].copy_from_slice(chunk);
    movemask_epi8(M128::from_u8x16(bytes)) as u16
}

#[inline(always)]
fn simd_movemask(a: &[u8]) -> Vec<u16> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    a.chunks(M128_BYTES).map(movemask_block).collect()
}

#[inline(always)]
fn parallel_simd_movemask(a: &[u8]) -> Vec<u16> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    a.par_chunks(M128_BYTES).map(movemask_block).collect()
}

impl SimdMovemask for &[u8] {
    type Output = Vec<u16>;

    #[inline(always)]
    fn simd_movemask(self) -> Self::Output {
        simd_movemask(self)
    }

    #[inline(always)]
    fn par_simd_movemask(self) -> Self::Output {
        parallel_simd_movemask(self)
    }

    #[inline(always)]
    fn scalar_movemask(self) -> Self::Output {
        scalar_movemask(self)
    }
}

// ----- f32 -> i32 conversion -----

#[inline(always)]
fn scalar_cvtps_epi32(a: &[f32]) -> Vec<i32> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    a.iter().map(|&x| round_to_i32(x)).collect()
}

// Assumes a.len() == c.len() <= F32_LANES; missing lanes are converted as zero.
#[inline(always)]
fn cvtps_block(a: &[f32], c: &mut [i32]) {
    let mut lanes = [0f32; F32_LANES];
    lanes[..a.len()].copy_from_slice(a);
    let converted = cvtps_epi32(M128::from_f32x4(lanes)).as_i32x4();
    c.copy_from_slice(&converted[..a.len()]);
}

#[inline(always)]
fn simd_cvtps_epi32(a: &[f32]) -> Vec<i32> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    let size = a.len();
    let mut c = vec![0i32; size];

    let step = F32_LANES;
    let nb_lanes = size - (size % step);
    let rem_lanes = size - nb_lanes;

    for i in (0..nb_lanes).step_by(step) {
        cvtps_block(&a[i..i + step], &mut c[i..i + step]);
    }

    if rem_lanes > 0 {
        cvtps_block(&a[nb_lanes..], &mut c[nb_lanes..]);
    }

    c
}

#[inline(always)]
fn parallel_simd_cvtps_epi32(a: &[f32]) -> Vec<i32> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    let mut c = vec![0i32; a.len()];

    // The last chunk may be shorter than a register; cvtps_block pads it.
    c.par_chunks_mut(F32_LANES)
        .zip(a.par_chunks(F32_LANES))
        .for_each(|(c_chunk, a_chunk)| cvtps_block(a_chunk, c_chunk));

    c
}

impl SimdConvert for &[f32] {
    type Output = Vec<i32>;

    #[inline(always)]
    fn simd_cvtps_epi32(self) -> Self::Output {
        simd_cvtps_epi32(self)
    }

    #[inline(always)]
    fn par_simd_cvtps_epi32(self) -> Self::Output {
        parallel_simd_cvtps_epi32(self)
    }

    #[inline(always)]
    fn scalar_cvtps_epi32(self) -> Self::Output {
        scalar_cvtps_epi32(self)
    }
}

// ----- CRC-32C -----

#[inline(always)]
fn scalar_crc32c(a: &[u8]) -> u32 {
    !a.iter().fold(!0, |crc, &byte| crc32_u8_soft(crc, byte))
}

// Raw accumulation from `crc` with no inversion.
#[inline(always)]
fn accumulate_crc32c(crc: u32, a: &[u8]) -> u32 {
    let mut words = a.chunks_exact(8);
    let mut crc = crc as u64;
    for word in words.by_ref() {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(word);
        crc = crc32_u64(crc, u64::from_le_bytes(bytes));
    }
    words
        .remainder()
        .iter()
        .fold(crc as u32, |crc, &byte| crc32_u8(crc, byte))
}

#[inline(always)]
fn simd_crc32c(a: &[u8]) -> u32 {
    !accumulate_crc32c(!0, a)
}

#[inline(always)]
fn parallel_simd_crc32c(a: &[u8]) -> u32 {
    if a.len() <= PARALLEL_CRC_BLOCK {
        return simd_crc32c(a);
    }

    // Each block starts from a zero state; the blocks are then chained by
    // advancing the running state over each block's length.
    let partials: Vec<(usize, u32)> = a
        .par_chunks(PARALLEL_CRC_BLOCK)
        .map(|block| (block.len(), accumulate_crc32c(0, block)))
        .collect();

    !partials
        .into_iter()
        .fold(!0, |crc, (len, partial)| crc32c_shift(crc, len) ^ partial)
}

impl SimdCrc32c for &[u8] {
    #[inline(always)]
    fn simd_crc32c(self) -> u32 {
        simd_crc32c(self)
    }

    #[inline(always)]
    fn par_simd_crc32c(self) -> u32 {
        parallel_simd_crc32c(self)
    }

    #[inline(always)]
    fn scalar_crc32c(self) -> u32 {
        scalar_crc32c(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod movemask {
        use super::*;

        #[test]
        fn test_short_tail_is_padded() {
            let data = [0x80u8, 0x00, 0xff];
            assert_eq!(data.as_slice().simd_movemask(), vec![0b101]);
            assert_eq!(data.as_slice().scalar_movemask(), vec![0b101]);
        }

        #[test]
        fn test_variants_agree() {
            let data: Vec<u8> = (0..1000u32).map(|i| (i * 97 + 13) as u8).collect();
            let expected = data.as_slice().scalar_movemask();
            assert_eq!(expected.len(), 63);
            assert_eq!(data.as_slice().simd_movemask(), expected);
            assert_eq!(data.as_slice().par_simd_movemask(), expected);
        }

        #[test]
        #[should_panic(expected = "Size can't be empty")]
        fn test_empty_input_panics() {
            let data: [u8; 0] = [];
            let _ = data.as_slice().simd_movemask();
        }
    }

    mod convert {
        use super::*;

        #[test]
        fn test_variants_agree() {
            let data: Vec<f32> = (0..1003).map(|i| i as f32 * 0.25 - 125.0).collect();
            let expected = data.as_slice().scalar_cvtps_epi32();
            assert_eq!(data.as_slice().simd_cvtps_epi32(), expected);
            assert_eq!(data.as_slice().par_simd_cvtps_epi32(), expected);
        }

        #[test]
        fn test_halves_and_indefinite() {
            let data = [0.5f32, 1.5, 2.5, -0.5, f32::NAN, 1e10];
            let expected = vec![0, 2, 2, 0, i32::MIN, i32::MIN];
            assert_eq!(data.as_slice().simd_cvtps_epi32(), expected);
            assert_eq!(data.as_slice().par_simd_cvtps_epi32(), expected);
            assert_eq!(data.as_slice().scalar_cvtps_epi32(), expected);
        }
    }

    mod crc32c {
        use super::*;

        #[test]
        fn test_check_value() {
            let data = b"123456789".as_slice();
            assert_eq!(data.scalar_crc32c(), 0xe306_9283);
            assert_eq!(data.simd_crc32c(), 0xe306_9283);
            assert_eq!(data.par_simd_crc32c(), 0xe306_9283);
        }

        #[test]
        fn test_empty() {
            let data: &[u8] = &[];
            assert_eq!(data.scalar_crc32c(), 0);
            assert_eq!(data.simd_crc32c(), 0);
        }

        #[test]
        fn test_parallel_blocks_chain() {
            let len = 3 * PARALLEL_CRC_BLOCK + 123;
            let data: Vec<u8> = (0..len).map(|i| (i.wrapping_mul(131) >> 3) as u8).collect();
            let expected = data.as_slice().scalar_crc32c();
            assert_eq!(data.as_slice().simd_crc32c(), expected);
            assert_eq!(data.as_slice().par_simd_crc32c(), expected);
        }
    }
}
