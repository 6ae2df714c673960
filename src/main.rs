//! Prints the backend this build selected and runs the published known-answer
//! vectors against it. Exits non-zero when any of them disagrees.

use sselane::error::validation_error;
use sselane::simd::aes::{aes128_encrypt_block, aes128_expand_key};
use sselane::simd::slice::F32_LANES;
use sselane::simd::traits::SimdCrc32c;
use sselane::{
    active_backend, aesenc_si128, clmulepi64_si128, cvtps_epi32, movemask_epi8, shuffle_epi32,
    Result, CAPABILITIES, M128,
};

struct Check {
    name: &'static str,
    passed: bool,
}

impl Check {
    fn new(name: &'static str, passed: bool) -> Self {
        Self { name, passed }
    }
}

fn run_checks() -> Result<Vec<Check>> {
    let hex = M128::from_hex_bytes;
    let mut checks = Vec::new();

    // FIPS-197 appendix B, first round
    let round = aesenc_si128(
        hex("193de3bea0f4e22b9ac68d2ae9f84808")?,
        hex("a0fafe1788542cb123a339392a6c7605")?,
    );
    checks.push(Check::new(
        "aesenc round 1",
        round == hex("a49c7ff2689f352b6b5bea43026a5049")?,
    ));

    // FIPS-197 appendix C.1
    let schedule = aes128_expand_key(hex("000102030405060708090a0b0c0d0e0f")?);
    let ciphertext = aes128_encrypt_block(&schedule, hex("00112233445566778899aabbccddeeff")?);
    checks.push(Check::new(
        "aes-128 block",
        ciphertext == hex("69c4e0d86a7b0430d8cdb78070b4c55a")?,
    ));

    let x = M128::from_u64x2([3, 0]);
    checks.push(Check::new(
        "clmul (x+1)^2",
        clmulepi64_si128::<0x00>(x, x).as_u128() == 5,
    ));

    let halves = M128::from_f32x4([0.5, 1.5, 2.5, -2.5]);
    checks.push(Check::new(
        "cvtps ties to even",
        cvtps_epi32(halves).as_i32x4() == [0, 2, 2, -2],
    ));

    let indefinite = M128::from_f32x4([f32::NAN, 3.0e9, -3.0e9, 0.0]);
    checks.push(Check::new(
        "cvtps indefinite",
        cvtps_epi32(indefinite).as_i32x4()[..F32_LANES - 1] == [i32::MIN; 3],
    ));

    let signs = M128::from_u8x16([0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff]);
    checks.push(Check::new("movemask_epi8", movemask_epi8(signs) == 0x8001));

    let lanes = M128::from_u32x4([0, 1, 2, 3]);
    checks.push(Check::new(
        "shuffle_epi32 reverse",
        shuffle_epi32::<0x1b>(lanes).as_u32x4() == [3, 2, 1, 0],
    ));

    checks.push(Check::new(
        "crc32c check value",
        b"123456789".as_slice().simd_crc32c() == 0xe306_9283,
    ));

    Ok(checks)
}

fn main() -> Result<()> {
    println!("sselane backend: {}", active_backend());
    println!(
        "  neon: {}, aes: {}, crc: {}",
        CAPABILITIES.neon, CAPABILITIES.aes, CAPABILITIES.crc
    );

    let checks = run_checks()?;
    for check in &checks {
        let status = if check.passed { "ok" } else { "FAILED" };
        println!("  {:<24} {status}", check.name);
    }

    let failed: Vec<&str> = checks
        .iter()
        .filter(|check| !check.passed)
        .map(|check| check.name)
        .collect();

    if failed.is_empty() {
        Ok(())
    } else {
        Err(validation_error(format!(
            "self-check failed: {}",
            failed.join(", ")
        )))
    }
}
