//! Multihash function codes and the names the RPC API expects for them.

use std::borrow::Cow;

pub const IDENTITY: u64 = 0x00;
pub const SHA2_256: u64 = 0x12;
pub const BLAKE3: u64 = 0x1e;

const BLAKE2B_MIN: u64 = 0xb201;
const BLAKE2B_MAX: u64 = 0xb240;
const BLAKE2S_MIN: u64 = 0xb241;
const BLAKE2S_MAX: u64 = 0xb260;

const NAMED: &[(u64, &str)] = &[
    (IDENTITY, "identity"),
    (0x11, "sha1"),
    (SHA2_256, "sha2-256"),
    (0x13, "sha2-512"),
    (0x14, "sha3-512"),
    (0x15, "sha3-384"),
    (0x16, "sha3-256"),
    (0x17, "sha3-224"),
    (0x18, "shake-128"),
    (0x19, "shake-256"),
    (0x1a, "keccak-224"),
    (0x1b, "keccak-256"),
    (0x1c, "keccak-384"),
    (0x1d, "keccak-512"),
    (BLAKE3, "blake3"),
    (0x20, "sha2-384"),
    (0x22, "murmur3-x64-64"),
    (0x56, "dbl-sha2-256"),
    (0xd5, "md5"),
    (0x1012, "sha2-256-trunc254-padded"),
    (0x1013, "sha2-224"),
    (0x1014, "sha2-512-224"),
    (0x1015, "sha2-512-256"),
    (0x1100, "x11"),
    (0xb401, "poseidon-bls12_381-a2-fc1"),
];

/// Name of a multihash function, or `None` if the code is not a known hash.
pub fn name(code: u64) -> Option<Cow<'static, str>> {
    if let Some((_, name)) = NAMED.iter().find(|(c, _)| *c == code) {
        return Some(Cow::Borrowed(name));
    }
    // blake2 variants encode their digest length (in bytes) in the low bits
    match code {
        BLAKE2B_MIN..=BLAKE2B_MAX => Some(Cow::Owned(format!(
            "blake2b-{}",
            (code - (BLAKE2B_MIN - 1)) * 8
        ))),
        BLAKE2S_MIN..=BLAKE2S_MAX => Some(Cow::Owned(format!(
            "blake2s-{}",
            (code - (BLAKE2S_MIN - 1)) * 8
        ))),
        _ => None,
    }
}

/// Inverse of [`name`].
pub fn code(name: &str) -> Option<u64> {
    if let Some((code, _)) = NAMED.iter().find(|(_, n)| *n == name) {
        return Some(*code);
    }
    let (family, bits) = name.split_once('-')?;
    let bits: u64 = bits.parse().ok()?;
    if bits == 0 || bits % 8 != 0 {
        return None;
    }
    let (base, max) = match family {
        "blake2b" => (BLAKE2B_MIN - 1, BLAKE2B_MAX),
        "blake2s" => (BLAKE2S_MIN - 1, BLAKE2S_MAX),
        _ => return None,
    };
    let code = base + bits / 8;
    (code <= max).then_some(code)
}
