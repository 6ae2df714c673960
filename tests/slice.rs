//! The scalar, SIMD and parallel SIMD slice kernels agree on random data of
//! awkward lengths.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sselane::simd::slice::PARALLEL_CRC_BLOCK;
use sselane::simd::traits::{SimdConvert, SimdCrc32c, SimdMovemask};

const LENGTHS: &[usize] = &[1, 3, 4, 15, 16, 17, 255, 1_024, 4_099, 100_003];

#[test]
fn test_movemask_variants_agree() {
    let mut rng = StdRng::seed_from_u64(12345);

    for &len in LENGTHS {
        let data: Vec<u8> = (0..len).map(|_| rng.random()).collect();
        let scalar = data.as_slice().scalar_movemask();
        assert_eq!(scalar.len(), len.div_ceil(16));
        assert_eq!(data.as_slice().simd_movemask(), scalar, "len {len}");
        assert_eq!(data.as_slice().par_simd_movemask(), scalar, "len {len}");
    }
}

#[test]
fn test_convert_variants_agree() {
    let mut rng = StdRng::seed_from_u64(42);

    for &len in LENGTHS {
        let data: Vec<f32> = (0..len)
            .map(|_| rng.random_range(-1.0e5..=1.0e5))
            .collect();
        let scalar = data.as_slice().scalar_cvtps_epi32();
        assert_eq!(data.as_slice().simd_cvtps_epi32(), scalar, "len {len}");
        assert_eq!(data.as_slice().par_simd_cvtps_epi32(), scalar, "len {len}");
    }
}

#[test]
fn test_convert_large_parallel() {
    let data: Vec<f32> = (0..1_000_000).map(|i| i as f32 * 0.5 - 250_000.0).collect();
    let result = data.as_slice().par_simd_cvtps_epi32();

    for (i, (&x, &r)) in data.iter().zip(result.iter()).enumerate() {
        let expected = x.round_ties_even() as i32;
        assert_eq!(r, expected, "index {i}: {x}");
    }
}

#[test]
fn test_crc32c_variants_agree() {
    let mut rng = StdRng::seed_from_u64(9);

    for &len in LENGTHS.iter().chain(&[PARALLEL_CRC_BLOCK, 2 * PARALLEL_CRC_BLOCK + 1]) {
        let data: Vec<u8> = (0..len).map(|_| rng.random()).collect();
        let scalar = data.as_slice().scalar_crc32c();
        assert_eq!(data.as_slice().simd_crc32c(), scalar, "len {len}");
        assert_eq!(data.as_slice().par_simd_crc32c(), scalar, "len {len}");
    }
}
