//! HTTP Basic verification shared across REST and WebSocket handshake
//! (spec §4.8), driven off the configured [`WebAuthConfig`].

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use subtle::ConstantTimeEq;
use tap_core::config::{AuthAccount, WebAuthConfig};

use crate::error::AuthError;
use crate::hashing::verify_password;
use crate::principal::Principal;

/// Decode an `Authorization: Basic ...` header value and verify it against
/// `accounts`. Every step that can fail returns `Unauthenticated`;
/// malformed input never distinguishes itself from a bad password.
pub fn verify(header_value: &str, accounts: &WebAuthConfig) -> Result<Principal, AuthError> {
    let encoded = header_value.strip_prefix("Basic ").ok_or(AuthError::Unauthenticated)?;
    let decoded = BASE64.decode(encoded.trim()).map_err(|_| AuthError::Unauthenticated)?;
    let text = String::from_utf8(decoded).map_err(|_| AuthError::Unauthenticated)?;
    let (user, password) = text.split_once(':').ok_or(AuthError::Unauthenticated)?;

    let account = lookup_account(accounts, user);
    let hash_args = account.as_ref().map(|a| (a.pass_salt.as_str(), a.pass_hash.as_str()));
    let ok = verify_password(hash_args, password);

    match (ok, account) {
        (true, Some(account)) => Ok(Principal { user: account.user.clone(), role: account.role }),
        _ => Err(AuthError::Unauthenticated),
    }
}

/// Scan every configured account comparing usernames in constant time
/// (spec §4.8 step 2), rather than short-circuiting on the first match.
fn lookup_account(accounts: &WebAuthConfig, user: &str) -> Option<AuthAccount> {
    let mut found = None;
    for account in &accounts.accounts {
        let same_length = account.user.len() == user.len();
        let matches = same_length && bool::from(account.user.as_bytes().ct_eq(user.as_bytes()));
        if matches {
            found = Some(account.clone());
        }
    }
    found
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
