//! Config data model (spec §3, §6).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Span,
    Bridge,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Span => "span",
            Mode::Bridge => "bridge",
        }
    }

    pub fn other(self) -> Mode {
        match self {
            Mode::Span => Mode::Bridge,
            Mode::Bridge => Mode::Span,
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "span" => Ok(Mode::Span),
            "bridge" => Ok(Mode::Bridge),
            other => Err(format!("invalid MODE {other:?}, expected span|bridge")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub dir: PathBuf,
    pub rotate_seconds: u32,
    pub file_limit: u32,
    pub snaplen: u32,
    pub compress: bool,
    pub filter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionConfig {
    pub max_age_days: u32,
    pub min_free_disk_pct: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Viewer,
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "viewer" => Ok(Role::Viewer),
            other => Err(format!("invalid role {other:?}, expected admin|viewer")),
        }
    }
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Viewer => "viewer",
        }
    }
}

/// One basic-auth principal: a username, its salted PBKDF2 hash, and the
/// role it authorizes (spec §3: "basic-auth principal (user, salted hash,
/// role)").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthAccount {
    pub user: String,
    pub pass_hash: String,
    pub pass_salt: String,
    pub role: Role,
}

/// The configured set of basic-auth principals. The on-disk format keeps
/// a mandatory admin account plus an optional viewer account (spec §8
/// scenario S5 exercises both roles) rather than an arbitrary list, to
/// stay representable in the flat `KEY=VALUE` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAuthConfig {
    pub accounts: Vec<AuthAccount>,
}

impl WebAuthConfig {
    pub fn account(&self, user: &str) -> Option<&AuthAccount> {
        self.accounts.iter().find(|a| a.user == user)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    pub enabled: bool,
    pub cert: Option<PathBuf>,
    pub key: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebConfig {
    pub port: u16,
    pub auth: WebAuthConfig,
    pub tls: TlsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub suricata_enabled: bool,
    pub zeek_enabled: bool,
    pub ai_assistant_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnginePaths {
    pub capture_dir: PathBuf,
    pub suricata_eve_log: PathBuf,
    pub zeek_log_dir: PathBuf,
}

/// Immutable configuration snapshot. Replaced atomically on every
/// successful `set()`/`reload()` (spec §4.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigData {
    pub mode: Mode,
    pub nic1: String,
    pub nic2: String,
    pub bridge_name: String,
    pub mgmt_ip: String,
    pub mgmt_gateway: Option<String>,
    pub mgmt_dns: Option<String>,
    pub capture: CaptureConfig,
    pub retention: RetentionConfig,
    pub web: WebConfig,
    pub features: FeatureFlags,
    pub paths: EnginePaths,
    pub suricata_iface: Option<String>,
    pub zeek_iface: Option<String>,
    /// Unknown keys from the on-disk file, preserved verbatim for
    /// round-tripping (Design Notes §9: unknown-field policy).
    pub extra: IndexMap<String, String>,
}

impl ConfigData {
    /// Interface that is promiscuous/monitoring (SPAN) or bridge-joined
    /// (bridge mode).
    pub fn capture_interface(&self) -> &str {
        &self.nic1
    }

    /// Interface carrying the management IP in SPAN mode; in bridge mode
    /// the bridge itself carries it and both NICs are members.
    pub fn management_interface(&self) -> &str {
        match self.mode {
            Mode::Span => &self.nic2,
            Mode::Bridge => &self.bridge_name,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
