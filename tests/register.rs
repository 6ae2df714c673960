//! Lane views over the register model.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sselane::{SselaneError, M128, M64};

#[test]
fn test_views_preserve_bits_random() {
    let mut rng = StdRng::seed_from_u64(12345);

    for _ in 0..1_000 {
        let r = M128::from_u128(rng.random());
        assert_eq!(M128::from_u8x16(r.as_u8x16()), r);
        assert_eq!(M128::from_i8x16(r.as_i8x16()), r);
        assert_eq!(M128::from_u16x8(r.as_u16x8()), r);
        assert_eq!(M128::from_i16x8(r.as_i16x8()), r);
        assert_eq!(M128::from_u32x4(r.as_u32x4()), r);
        assert_eq!(M128::from_i32x4(r.as_i32x4()), r);
        assert_eq!(M128::from_u64x2(r.as_u64x2()), r);
        assert_eq!(M128::from_i64x2(r.as_i64x2()), r);
        assert_eq!(M128::from_f32x4(r.as_f32x4()), r);
        assert_eq!(M128::from_f64x2(r.as_f64x2()), r);

        let h = M64::from_u64(rng.random());
        assert_eq!(M64::from_u8x8(h.as_u8x8()), h);
        assert_eq!(M64::from_i8x8(h.as_i8x8()), h);
        assert_eq!(M64::from_u16x4(h.as_u16x4()), h);
        assert_eq!(M64::from_i16x4(h.as_i16x4()), h);
        assert_eq!(M64::from_u32x2(h.as_u32x2()), h);
        assert_eq!(M64::from_i32x2(h.as_i32x2()), h);
        assert_eq!(M64::from_f32x2(h.as_f32x2()), h);
    }
}

#[test]
fn test_lane_zero_is_lowest_address() {
    let r = M128::from_u64x2([0x1122_3344_5566_7788, 0x99aa_bbcc_ddee_ff00]);
    assert_eq!(r.as_u8x16()[0], 0x88);
    assert_eq!(r.as_u8x16()[15], 0x99);
    assert_eq!(r.as_u32x4(), [0x5566_7788, 0x1122_3344, 0xddee_ff00, 0x99aa_bbcc]);
    assert_eq!(r.as_u128() & 0xff, 0x88);
}

#[test]
fn test_slice_conversion_errors() {
    let bytes = [0u8; 17];
    assert_eq!(
        M128::try_from(&bytes[..17]),
        Err(SselaneError::LengthMismatch {
            expected: 16,
            actual: 17
        })
    );
    assert!(M128::try_from(&bytes[..16]).is_ok());
    assert!(M64::try_from(&bytes[..7]).is_err());
}

#[test]
fn test_alignment() {
    assert_eq!(std::mem::align_of::<M128>(), 16);
    assert_eq!(std::mem::size_of::<M128>(), 16);
    assert_eq!(std::mem::size_of::<M64>(), 8);
    assert_eq!(M128::default(), M128::ZERO);
}
