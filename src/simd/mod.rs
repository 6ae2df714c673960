pub mod aes;
pub mod backend;
pub mod clmul;
pub mod crc32;
pub mod lanes;
pub mod movemask;
pub mod register;
pub mod round;
pub mod shuffle;
pub mod slice;
pub mod traits;

#[cfg(neon)]
pub mod neon;

// Rejects an 8-bit immediate outside 0..=255 when the caller is monomorphized.
pub(crate) struct Imm8<const IMM8: i32>;

impl<const IMM8: i32> Imm8<IMM8> {
    pub(crate) const OK: () = assert!(
        0 <= IMM8 && IMM8 <= 255,
        "immediate must be an 8-bit value"
    );
}
