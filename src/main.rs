use clap::Parser;

/// Entry point for the WireGuard Prometheus exporter.
///
/// This binary parses the command line, initializes logging, and runs the
/// exporter: a background poller that periodically samples WireGuard device
/// state via `wg show all dump`, plus an HTTP endpoint exposing the
/// collected gauges for scraping.
///
/// # Errors
///
/// Returns an error if startup fails (e.g., metric registration conflicts
/// or the listen address cannot be bound).
///
/// # Examples
///
/// ```bash
/// wireguard-exporter --listen-address 0.0.0.0:9586 --interval 15 \
///     --alias "hkzN...=:alice,dGhp...=:bob"
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = wireguard_exporter::Config::parse();

    let default_level = if config.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    wireguard_exporter::run(config).await
}
