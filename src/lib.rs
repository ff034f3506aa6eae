//! WireGuard Exporter: samples the live state of WireGuard interfaces and
//! their peers on a fixed cadence and exposes the result as labeled
//! Prometheus gauges.
//!
//! One background task drives the whole collection lifecycle: it fetches a
//! device snapshot from the [`wg`] source each tick, translates it into
//! metric samples, and writes them into the shared registry served by
//! [`server`]. Nothing flows back from the registry into the loop.

use std::error::Error;

pub mod alias;
pub mod config;
pub mod metrics;
pub mod poller;
pub mod server;
pub mod wg;

pub use config::Config;

/// Runs the exporter.
///
/// Registers the metric set, builds the alias table, spawns the poller
/// task, and serves the exposition endpoint in the foreground until the
/// process exits.
///
/// # Errors
///
/// Possible errors include:
/// - Metric registration conflicts in the registry.
/// - Failure to bind the configured listen address.
pub async fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let registry = prometheus::Registry::new();
    let metrics = metrics::Metrics::register(&registry)?;

    let aliases = alias::AliasTable::new(config.aliases());
    if !aliases.is_empty() {
        log::info!("loaded {} peer aliases", aliases.len());
    }

    let source = wg::WgCli::new(config.wg_path.clone());
    let poller = poller::Poller::new(
        source,
        metrics,
        aliases,
        config.scrape_interval(),
        config.fetch_timeout(),
    );
    tokio::spawn(poller.run());

    log::info!(
        "wireguard exporter running on http://{}{}",
        config.listen_address,
        config.metrics_path
    );
    log::info!("collection interval: {}s", config.interval);

    let server = server::ExporterServer::new(registry, &config.metrics_path);
    server.listen(config.listen_address).await?;
    Ok(())
}
