//! Command-line configuration for the exporter.
//!
//! All configuration is immutable once the exporter starts. The alias
//! list maps peer public keys to human-readable names and feeds the
//! [`AliasTable`](crate::alias::AliasTable) built at startup.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Prometheus exporter for WireGuard interfaces.
#[derive(Debug, Parser)]
#[command(name = "wireguard-exporter", version, about = "Prometheus exporter for WireGuard interfaces")]
pub struct Config {
    /// Address to listen on for the metrics server.
    #[arg(long, default_value = "0.0.0.0:9586")]
    pub listen_address: SocketAddr,

    /// Path under which to expose metrics.
    #[arg(long, default_value = "/metrics", value_parser = parse_metrics_path)]
    pub metrics_path: String,

    /// Interval in seconds between metric collections.
    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Seconds after which a device state query is abandoned for the cycle.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub scrape_timeout: u64,

    /// Comma-separated list of publicKey:alias entries.
    #[arg(long, default_value = "")]
    pub alias: String,

    /// Path to the `wg` executable.
    #[arg(long, default_value = "wg")]
    pub wg_path: PathBuf,

    /// Enable verbose logging.
    #[arg(long)]
    pub verbose: bool,
}

impl Config {
    /// Pause between the start of consecutive scrape cycles.
    pub fn scrape_interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Deadline applied to each device state query.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.scrape_timeout)
    }

    /// Alias table entries parsed from the `--alias` flag.
    pub fn aliases(&self) -> HashMap<String, String> {
        parse_alias_list(&self.alias)
    }
}

fn parse_metrics_path(value: &str) -> Result<String, String> {
    if !value.starts_with('/') {
        return Err(format!("metrics path `{value}` must start with `/`"));
    }
    Ok(value.to_owned())
}

/// Parses a comma-separated list of `publicKey:alias` pairs.
///
/// Keys and names are trimmed of surrounding whitespace. Pairs that do
/// not contain exactly one `:` are skipped rather than rejected.
pub fn parse_alias_list(list: &str) -> HashMap<String, String> {
    let mut aliases = HashMap::new();
    if list.is_empty() {
        return aliases;
    }
    for pair in list.split(',') {
        let mut parts = pair.split(':');
        if let (Some(key), Some(name), None) = (parts.next(), parts.next(), parts.next()) {
            aliases.insert(key.trim().to_owned(), name.trim().to_owned());
        }
    }
    aliases
}
