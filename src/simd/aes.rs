//! One AES encryption round (`_mm_aesenc_si128`, `_mm_aesenclast_si128`) and
//! the key-schedule helper `_mm_aeskeygenassist_si128`.
//!
//! The state is sixteen bytes in column-major order: byte `4c + r` is row `r`
//! of column `c`, so each 32-bit lane is one column.
//!
//! Two software renditions are kept:
//!
//! - the table form folds SubBytes and MixColumns into four 256-entry `u32`
//!   tables and applies ShiftRows through the choice of source column for each
//!   table lookup;
//! - the bytewise form does ShiftRows with a byte-table permute, SubBytes with
//!   an S-box lookup per byte, and MixColumns with `xtime` plus two in-column
//!   byte rotations.
//!
//! The round key is always XOR-ed in last.

use super::backend::Active;
use super::lanes::*;
use super::register::M128;
use super::shuffle::shuffle_epi32;
use super::traits::Backend;
use super::Imm8;

/// The AES forward S-box.
#[rustfmt::skip]
pub const SBOX: [u8; 256] = [
    0x63, 0x7c, 0x77, 0x7b, 0xf2, 0x6b, 0x6f, 0xc5, 0x30, 0x01, 0x67, 0x2b, 0xfe, 0xd7, 0xab, 0x76,
    0xca, 0x82, 0xc9, 0x7d, 0xfa, 0x59, 0x47, 0xf0, 0xad, 0xd4, 0xa2, 0xaf, 0x9c, 0xa4, 0x72, 0xc0,
    0xb7, 0xfd, 0x93, 0x26, 0x36, 0x3f, 0xf7, 0xcc, 0x34, 0xa5, 0xe5, 0xf1, 0x71, 0xd8, 0x31, 0x15,
    0x04, 0xc7, 0x23, 0xc3, 0x18, 0x96, 0x05, 0x9a, 0x07, 0x12, 0x80, 0xe2, 0xeb, 0x27, 0xb2, 0x75,
    0x09, 0x83, 0x2c, 0x1a, 0x1b, 0x6e, 0x5a, 0xa0, 0x52, 0x3b, 0xd6, 0xb3, 0x29, 0xe3, 0x2f, 0x84,
    0x53, 0xd1, 0x00, 0xed, 0x20, 0xfc, 0xb1, 0x5b, 0x6a, 0xcb, 0xbe, 0x39, 0x4a, 0x4c, 0x58, 0xcf,
    0xd0, 0xef, 0xaa, 0xfb, 0x43, 0x4d, 0x33, 0x85, 0x45, 0xf9, 0x02, 0x7f, 0x50, 0x3c, 0x9f, 0xa8,
    0x51, 0xa3, 0x40, 0x8f, 0x92, 0x9d, 0x38, 0xf5, 0xbc, 0xb6, 0xda, 0x21, 0x10, 0xff, 0xf3, 0xd2,
    0xcd, 0x0c, 0x13, 0xec, 0x5f, 0x97, 0x44, 0x17, 0xc4, 0xa7, 0x7e, 0x3d, 0x64, 0x5d, 0x19, 0x73,
    0x60, 0x81, 0x4f, 0xdc, 0x22, 0x2a, 0x90, 0x88, 0x46, 0xee, 0xb8, 0x14, 0xde, 0x5e, 0x0b, 0xdb,
    0xe0, 0x32, 0x3a, 0x0a, 0x49, 0x06, 0x24, 0x5c, 0xc2, 0xd3, 0xac, 0x62, 0x91, 0x95, 0xe4, 0x79,
    0xe7, 0xc8, 0x37, 0x6d, 0x8d, 0xd5, 0x4e, 0xa9, 0x6c, 0x56, 0xf4, 0xea, 0x65, 0x7a, 0xae, 0x08,
    0xba, 0x78, 0x25, 0x2e, 0x1c, 0xa6, 0xb4, 0xc6, 0xe8, 0xdd, 0x74, 0x1f, 0x4b, 0xbd, 0x8b, 0x8a,
    0x70, 0x3e, 0xb5, 0x66, 0x48, 0x03, 0xf6, 0x0e, 0x61, 0x35, 0x57, 0xb9, 0x86, 0xc1, 0x1d, 0x9e,
    0xe1, 0xf8, 0x98, 0x11, 0x69, 0xd9, 0x8e, 0x94, 0x9b, 0x1e, 0x87, 0xe9, 0xce, 0x55, 0x28, 0xdf,
    0x8c, 0xa1, 0x89, 0x0d, 0xbf, 0xe6, 0x42, 0x68, 0x41, 0x99, 0x2d, 0x0f, 0xb0, 0x54, 0xbb, 0x16,
];

/// Source byte of each output byte under ShiftRows.
pub const SHIFT_ROWS: [u8; 16] = [0, 5, 10, 15, 4, 9, 14, 3, 8, 13, 2, 7, 12, 1, 6, 11];

// Rotates every 32-bit column right by one byte.
const ROR32_BY_8: [u8; 16] = [1, 2, 3, 0, 5, 6, 7, 4, 9, 10, 11, 8, 13, 14, 15, 12];

/// Round constants for the ten AES-128 key-expansion steps.
pub const RCON: [u8; 10] = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80, 0x1b, 0x36];

/// Multiplication by `x` in GF(2^8) modulo the AES polynomial.
#[inline(always)]
pub const fn xtime(x: u8) -> u8 {
    (x << 1) ^ (((x >> 7) & 1) * 0x1b)
}

const fn build_t_tables() -> [[u32; 256]; 4] {
    let mut tables = [[0u32; 256]; 4];
    let mut i = 0;
    while i < 256 {
        let s = SBOX[i];
        let s2 = xtime(s);
        let s3 = s2 ^ s;
        // MixColumns column [2, 1, 1, 3] applied to S(x)
        let t0 = u32::from_le_bytes([s2, s, s, s3]);
        tables[0][i] = t0;
        tables[1][i] = t0.rotate_left(8);
        tables[2][i] = t0.rotate_left(16);
        tables[3][i] = t0.rotate_left(24);
        i += 1;
    }
    tables
}

/// SubBytes folded with MixColumns, one table per input row.
pub static T_TABLES: [[u32; 256]; 4] = build_t_tables();

/// `_mm_aesenc_si128`: ShiftRows, SubBytes, MixColumns, then XOR `round_key`.
#[inline(always)]
pub fn aesenc_si128(state: M128, round_key: M128) -> M128 {
    Active::aesenc(state, round_key)
}

/// `_mm_aesenclast_si128`: ShiftRows, SubBytes, then XOR `round_key`.
#[inline(always)]
pub fn aesenclast_si128(state: M128, round_key: M128) -> M128 {
    Active::aesenclast(state, round_key)
}

/// `_mm_aeskeygenassist_si128` with a compile-time round constant.
#[inline(always)]
pub fn aeskeygenassist_si128<const IMM8: i32>(key: M128) -> M128 {
    let () = Imm8::<IMM8>::OK;
    aeskeygenassist(key, IMM8 as u8)
}

/// `_mm_aeskeygenassist_si128` with a runtime round constant.
///
/// Returns the 32-bit lanes `[X1, ror8(X1) ^ rcon, X3, ror8(X3) ^ rcon]`
/// where `Xn` is SubWord of key lane `n`.
#[inline(always)]
pub fn aeskeygenassist(key: M128, rcon: u8) -> M128 {
    Active::aeskeygenassist(key, rcon)
}

#[inline(always)]
fn sub_word(word: u32) -> u32 {
    u32::from_le_bytes(word.to_le_bytes().map(|b| SBOX[b as usize]))
}

#[inline(always)]
fn sub_bytes(state: M128) -> M128 {
    M128::from_u8x16(state.as_u8x16().map(|b| SBOX[b as usize]))
}

/// Table rendition of [`aesenc_si128`].
pub fn aesenc_table(state: M128, round_key: M128) -> M128 {
    let x = state.as_u32x4();
    let [t0, t1, t2, t3] = &T_TABLES;

    // Output column c reads row r from column c + r.
    let column = |c0: usize, c1: usize, c2: usize, c3: usize| {
        t0[(x[c0] & 0xff) as usize]
            ^ t1[((x[c1] >> 8) & 0xff) as usize]
            ^ t2[((x[c2] >> 16) & 0xff) as usize]
            ^ t3[(x[c3] >> 24) as usize]
    };

    let mixed = M128::from_u32x4([
        column(0, 1, 2, 3),
        column(1, 2, 3, 0),
        column(2, 3, 0, 1),
        column(3, 0, 1, 2),
    ]);
    veorq(mixed, round_key)
}

/// Table rendition of [`aesenclast_si128`].
pub fn aesenclast_table(state: M128, round_key: M128) -> M128 {
    let bytes = state.as_u8x16();
    let substituted = M128::from_u8x16(SHIFT_ROWS.map(|src| SBOX[bytes[src as usize] as usize]));
    veorq(substituted, round_key)
}

/// Bytewise rendition of [`aesenc_si128`].
pub fn aesenc_bytewise(state: M128, round_key: M128) -> M128 {
    let v = sub_bytes(vqtbl1q_u8(state, M128::from_u8x16(SHIFT_ROWS)));

    // 2·v
    let reduce = vandq(vshrq_n_s8(v, 7), M128::from_u8x16([0x1b; 16]));
    let mut w = veorq(vshlq_n_u8(v, 1), reduce);
    // + v rotated by two rows
    w = veorq(w, vrev32q_u16(v));
    // + 3·v and v rotated by three rows, both moved up one row
    w = veorq(w, vqtbl1q_u8(veorq(v, w), M128::from_u8x16(ROR32_BY_8)));

    veorq(w, round_key)
}

/// Bytewise rendition of [`aesenclast_si128`].
pub fn aesenclast_bytewise(state: M128, round_key: M128) -> M128 {
    let v = sub_bytes(vqtbl1q_u8(state, M128::from_u8x16(SHIFT_ROWS)));
    veorq(v, round_key)
}

/// Software rendition of [`aeskeygenassist`].
pub fn aeskeygenassist_soft(key: M128, rcon: u8) -> M128 {
    let x = key.as_u32x4();
    let x1 = sub_word(x[1]);
    let x3 = sub_word(x[3]);
    let rcon = rcon as u32;
    M128::from_u32x4([x1, x1.rotate_right(8) ^ rcon, x3, x3.rotate_right(8) ^ rcon])
}

// key ^ (key << 32) ^ (key << 64) ^ (key << 96), then XOR the broadcast assist word
fn expand_step(key: M128, assist: M128) -> M128 {
    let assist = shuffle_epi32::<0xff>(assist);
    let mut key = key;
    for _ in 0..3 {
        key = veorq(key, vextq_u8(M128::ZERO, key, 12));
    }
    veorq(key, assist)
}

/// AES-128 key expansion driven by [`aeskeygenassist`].
pub fn aes128_expand_key(key: M128) -> [M128; 11] {
    let mut schedule = [key; 11];
    for (round, &rcon) in RCON.iter().enumerate() {
        let previous = schedule[round];
        schedule[round + 1] = expand_step(previous, aeskeygenassist(previous, rcon));
    }
    schedule
}

/// Encrypts one block with an expanded AES-128 key schedule.
pub fn aes128_encrypt_block(schedule: &[M128; 11], block: M128) -> M128 {
    let mut state = veorq(block, schedule[0]);
    for round_key in &schedule[1..10] {
        state = aesenc_si128(state, *round_key);
    }
    aesenclast_si128(state, schedule[10])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(s: &str) -> M128 {
        M128::from_hex_bytes(s).unwrap()
    }

    #[test]
    fn test_sbox_known_entries() {
        assert_eq!(SBOX[0x00], 0x63);
        assert_eq!(SBOX[0x53], 0xed);
        assert_eq!(SBOX[0xff], 0x16);
    }

    #[test]
    fn test_sbox_is_a_permutation() {
        let mut seen = [false; 256];
        for &s in SBOX.iter() {
            assert!(!seen[s as usize]);
            seen[s as usize] = true;
        }
    }

    #[test]
    fn test_t_table_layout() {
        // S(0) = 0x63, 2·0x63 = 0xc6, 3·0x63 = 0xa5
        assert_eq!(T_TABLES[0][0].to_le_bytes(), [0xc6, 0x63, 0x63, 0xa5]);
        assert_eq!(T_TABLES[1][0].to_le_bytes(), [0xa5, 0xc6, 0x63, 0x63]);
        assert_eq!(T_TABLES[3][0].to_le_bytes(), [0x63, 0x63, 0xa5, 0xc6]);
    }

    #[test]
    fn test_xtime() {
        assert_eq!(xtime(0x57), 0xae);
        assert_eq!(xtime(0xae), 0x47);
        assert_eq!(xtime(0x80), 0x1b);
    }

    #[test]
    fn test_first_round_vector() {
        let state = hex("193de3bea0f4e22b9ac68d2ae9f84808");
        let key = hex("a0fafe1788542cb123a339392a6c7605");
        let expected = hex("a49c7ff2689f352b6b5bea43026a5049");
        assert_eq!(aesenc_table(state, key), expected);
        assert_eq!(aesenc_bytewise(state, key), expected);
        assert_eq!(aesenc_si128(state, key), expected);
    }

    #[test]
    fn test_last_round_paths_agree() {
        let state = hex("00112233445566778899aabbccddeeff");
        let key = hex("0f0e0d0c0b0a09080706050403020100");
        assert_eq!(aesenclast_table(state, key), aesenclast_bytewise(state, key));
        assert_eq!(aesenclast_si128(state, M128::ZERO).as_u8x16()[0], SBOX[0x00]);
    }

    #[test]
    fn test_keygenassist_layout() {
        let key = M128::from_u32x4([0, 0x0000_0001, 0, 0x0302_0100]);
        let r = aeskeygenassist_si128::<0x01>(key).as_u32x4();
        let x1 = u32::from_le_bytes([SBOX[1], SBOX[0], SBOX[0], SBOX[0]]);
        let x3 = u32::from_le_bytes([SBOX[0], SBOX[1], SBOX[2], SBOX[3]]);
        assert_eq!(r, [x1, x1.rotate_right(8) ^ 1, x3, x3.rotate_right(8) ^ 1]);
    }

    #[test]
    fn test_expanded_key_last_round() {
        let schedule = aes128_expand_key(hex("2b7e151628aed2a6abf7158809cf4f3c"));
        assert_eq!(schedule[1], hex("a0fafe1788542cb123a339392a6c7605"));
        assert_eq!(schedule[10], hex("d014f9a8c9ee2589e13f0cc8b6630ca6"));
    }

    #[test]
    fn test_block_encryption() {
        let schedule = aes128_expand_key(hex("000102030405060708090a0b0c0d0e0f"));
        let ct = aes128_encrypt_block(&schedule, hex("00112233445566778899aabbccddeeff"));
        assert_eq!(ct, hex("69c4e0d86a7b0430d8cdb78070b4c55a"));
    }
}
