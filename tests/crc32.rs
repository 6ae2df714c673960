//! CRC-32C accumulation: check value and width composition.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sselane::simd::crc32::{crc32_u8_soft, crc32c_shift};
use sselane::{crc32_u16, crc32_u32, crc32_u64, crc32_u8};

#[test]
fn test_castagnoli_check_value() {
    let crc = b"123456789".iter().fold(!0u32, |crc, &b| crc32_u8(crc, b));
    assert_eq!(!crc, 0xe306_9283);
}

#[test]
fn test_rfc3720_zero_and_ones_blocks() {
    // iSCSI test patterns: 32 bytes of 0x00 and of 0xff
    let zeros = [0u8; 32].iter().fold(!0u32, |crc, &b| crc32_u8(crc, b));
    assert_eq!(!zeros, 0x8a91_36aa);
    let ones = [0xffu8; 32].iter().fold(!0u32, |crc, &b| crc32_u8(crc, b));
    assert_eq!(!ones, 0x62a8_ab43);
}

#[test]
fn test_widths_compose_random() {
    let mut rng = StdRng::seed_from_u64(12345);

    for _ in 0..5_000 {
        let crc: u32 = rng.random();
        let v: u64 = rng.random();
        let bytes = v.to_le_bytes();
        let bytewise = |n: usize| bytes[..n].iter().fold(crc, |c, &b| crc32_u8_soft(c, b));

        assert_eq!(crc32_u8(crc, bytes[0]), bytewise(1));
        assert_eq!(crc32_u16(crc, v as u16), bytewise(2));
        assert_eq!(crc32_u32(crc, v as u32), bytewise(4));
        assert_eq!(crc32_u64(crc as u64, v), bytewise(8) as u64);
    }
}

#[test]
fn test_shift_over_zero_bytes_random() {
    let mut rng = StdRng::seed_from_u64(4);

    for _ in 0..200 {
        let crc: u32 = rng.random();
        let len = rng.random_range(0..300usize);
        let expected = (0..len).fold(crc, |c, _| crc32_u8_soft(c, 0));
        assert_eq!(crc32c_shift(crc, len), expected, "len {len}");
    }
}
