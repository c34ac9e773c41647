//! PBKDF2-SHA256 password hashing and constant-time verification (spec §4.8).

use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Minimum iteration count the spec requires.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
const HASH_LEN: usize = 32;

/// Hash `password` with `salt`, returning the base64-encoded digest stored
/// as `AuthAccount::pass_hash`.
pub fn hash_password(password: &str, salt: &str) -> String {
    BASE64.encode(derive(password, salt))
}

fn derive(password: &str, salt: &str) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), PBKDF2_ITERATIONS, &mut out);
    out
}

/// A fixed password/salt pair hashed once per process, used in place of a
/// real account so an unknown username still pays the full PBKDF2 cost
/// (invariant 5, §8: wrong-username and wrong-password paths must take
/// statistically indistinguishable time).
fn dummy_digest() -> &'static [u8; HASH_LEN] {
    static DUMMY: OnceLock<[u8; HASH_LEN]> = OnceLock::new();
    DUMMY.get_or_init(|| derive("dummy-password", "dummy-salt-networktap"))
}

/// Verify `password` against `salt`/`expected_hash` (or, if `account` is
/// absent, against the dummy digest) in constant time. Always runs exactly
/// one PBKDF2 derivation and one constant-time comparison.
pub fn verify_password(account: Option<(&str, &str)>, password: &str) -> bool {
    let (salt, expected_hash) = account.unwrap_or(("dummy-salt-networktap", ""));
    let computed = derive(password, salt);

    let expected = BASE64.decode(expected_hash).ok();
    match expected {
        Some(bytes) if bytes.len() == HASH_LEN => bool::from(computed.ct_eq(&bytes)),
        _ => {
            // Malformed or absent stored hash: compare against the dummy
            // digest so the cost is identical, then always reject.
            let _ = computed.ct_eq(dummy_digest());
            false
        }
    }
}

#[cfg(test)]
#[path = "hashing_tests.rs"]
mod tests;
