//! Interface enumeration via `ip -json addr show` (spec §4.2).

use serde::Deserialize;
use tap_core::Interface;

#[derive(Debug, Deserialize)]
struct IpAddrEntry {
    ifname: String,
    operstate: Option<String>,
    address: Option<String>,
    mtu: Option<u32>,
    #[serde(default)]
    addr_info: Vec<AddrInfo>,
}

#[derive(Debug, Deserialize)]
struct AddrInfo {
    family: String,
    local: String,
    #[serde(default)]
    prefixlen: Option<u8>,
}

/// Parse the output of `ip -json addr show` into [`Interface`] records.
/// Unknown JSON fields are ignored (Design Notes §9 unknown-field policy —
/// we don't round-trip this particular feed since it's host-derived, not
/// user data, but we never fail on fields we don't model).
pub fn parse_ip_addr_json(json: &str) -> Result<Vec<Interface>, serde_json::Error> {
    let entries: Vec<IpAddrEntry> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .map(|e| {
            let ipv4 = e
                .addr_info
                .iter()
                .find(|a| a.family == "inet")
                .map(|a| match a.prefixlen {
                    Some(p) => format!("{}/{p}", a.local),
                    None => a.local.clone(),
                });
            Interface {
                name: e.ifname,
                state: e.operstate.unwrap_or_else(|| "unknown".to_string()),
                mac: e.address,
                ipv4,
                rx_bytes: 0,
                tx_bytes: 0,
                mtu: e.mtu.unwrap_or(1500),
            }
        })
        .collect())
}

/// Fill in rx/tx byte counters from `/sys/class/net/<iface>/statistics/*`,
/// the cheap kernel-provided counters that don't require re-shelling out.
pub fn read_byte_counters(iface: &str) -> (u64, u64) {
    let base = format!("/sys/class/net/{iface}/statistics");
    let rx = std::fs::read_to_string(format!("{base}/rx_bytes"))
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    let tx = std::fs::read_to_string(format!("{base}/tx_bytes"))
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0);
    (rx, tx)
}

#[cfg(test)]
#[path = "interfaces_tests.rs"]
mod tests;
