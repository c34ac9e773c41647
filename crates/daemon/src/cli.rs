//! CLI surface (spec §6): `--config`, `--bind`, `--log-level`, `--help`,
//! `--version`.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "networktapd", version, about = "NetworkTap passive-monitoring daemon")]
pub struct Cli {
    /// Path to the KEY=VALUE config file (default /etc/networktap.conf,
    /// overridable by NETWORKTAP_CONFIG).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the config file's WEB_PORT, e.g. `0.0.0.0:8443`.
    #[arg(long, value_name = "HOST:PORT")]
    pub bind: Option<String>,

    /// Tracing filter directive; overridden by RUST_LOG when set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
