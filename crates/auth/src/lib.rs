//! tap-auth: HTTP Basic verification shared by REST and WebSocket (spec C8).

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod error;
pub mod gate;
pub mod hashing;
pub mod principal;

pub use error::AuthError;
pub use gate::verify;
pub use hashing::{hash_password, PBKDF2_ITERATIONS};
pub use principal::{require_role, Principal};
