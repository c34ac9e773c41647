use tap_core::error::{HasKind, Kind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0:?}")]
    InvalidConfig(Vec<ValidationIssue>),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] crate::parser::ParseError),
}

impl HasKind for ConfigError {
    fn kind(&self) -> Kind {
        match self {
            ConfigError::InvalidConfig(_) | ConfigError::Parse(_) => Kind::InvalidConfig,
            ConfigError::Io(_) => Kind::IoFailure,
        }
    }
}
