use tap_core::error::{HasKind, Kind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing or invalid credentials")]
    Unauthenticated,
    #[error("role does not permit this operation")]
    Forbidden,
}

impl HasKind for AuthError {
    fn kind(&self) -> Kind {
        match self {
            AuthError::Unauthenticated => Kind::Unauthenticated,
            AuthError::Forbidden => Kind::Forbidden,
        }
    }
}
