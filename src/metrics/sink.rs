use std::time::Duration;

use prometheus::{Gauge, GaugeVec, Opts, Registry};

use super::{Sample, Series};

/// Namespace every exported metric name is prefixed with.
const NAMESPACE: &str = "wireguard";

/// The exporter's registered gauges.
///
/// Constructed once against a shared [`Registry`]. The poller task is the
/// sole writer; exposition requests read concurrently through the
/// registry. Gauge handles are internally synchronized, so no further
/// locking happens here.
#[derive(Debug, Clone)]
pub struct Metrics {
    interfaces_total: Gauge,
    scrape_success: Gauge,
    scrape_duration: Gauge,
    collector_running: Gauge,
    peers_total: GaugeVec,
    bytes_total: GaugeVec,
    peer_bytes_total: GaugeVec,
    duration_since_latest_handshake: GaugeVec,
    peer_endpoint: GaugeVec,
}

fn gauge(name: &str, help: &str) -> Result<Gauge, prometheus::Error> {
    Gauge::with_opts(Opts::new(name, help).namespace(NAMESPACE))
}

fn gauge_vec(name: &str, help: &str, labels: &[&str]) -> Result<GaugeVec, prometheus::Error> {
    GaugeVec::new(Opts::new(name, help).namespace(NAMESPACE), labels)
}

impl Metrics {
    /// Creates every exporter gauge and registers it with `registry`.
    ///
    /// # Errors
    ///
    /// Returns a [`prometheus::Error`] if a metric name is already taken
    /// in `registry`.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let metrics = Self {
            interfaces_total: gauge("interfaces_total", "Total number of interfaces")?,
            scrape_success: gauge("scrape_success", "If the scrape was a success")?,
            scrape_duration: gauge(
                "scrape_duration_milliseconds",
                "Duration in milliseconds of the scrape",
            )?,
            collector_running: gauge(
                "collector_running",
                "If the collection loop is still running",
            )?,
            peers_total: gauge_vec(
                "peers_total",
                "Total number of peers per interfaces",
                &["interface"],
            )?,
            bytes_total: gauge_vec(
                "bytes_total",
                "Total number of bytes per direction per interface",
                &["interface", "direction"],
            )?,
            peer_bytes_total: gauge_vec(
                "peer_bytes_total",
                "Total number of bytes per direction for a peer",
                &["interface", "peer", "alias", "direction"],
            )?,
            duration_since_latest_handshake: gauge_vec(
                "duration_since_latest_handshake",
                "Duration since latest handshake for a peer",
                &["interface", "peer", "alias"],
            )?,
            peer_endpoint: gauge_vec(
                "peer_endpoint",
                "Peers info. static value",
                &["interface", "peer", "alias", "endpoint_ip"],
            )?,
        };

        registry.register(Box::new(metrics.interfaces_total.clone()))?;
        registry.register(Box::new(metrics.scrape_success.clone()))?;
        registry.register(Box::new(metrics.scrape_duration.clone()))?;
        registry.register(Box::new(metrics.collector_running.clone()))?;
        registry.register(Box::new(metrics.peers_total.clone()))?;
        registry.register(Box::new(metrics.bytes_total.clone()))?;
        registry.register(Box::new(metrics.peer_bytes_total.clone()))?;
        registry.register(Box::new(metrics.duration_since_latest_handshake.clone()))?;
        registry.register(Box::new(metrics.peer_endpoint.clone()))?;

        Ok(metrics)
    }

    pub fn set_scrape_success(&self, success: bool) {
        self.scrape_success.set(if success { 1.0 } else { 0.0 });
    }

    pub fn set_collector_running(&self, running: bool) {
        self.collector_running.set(if running { 1.0 } else { 0.0 });
    }

    pub fn set_scrape_duration(&self, duration: Duration) {
        self.scrape_duration.set(duration.as_millis() as f64);
    }

    /// Writes one observation, replacing the prior value of its series.
    pub fn apply(&self, sample: &Sample) {
        let value = sample.value;
        match &sample.series {
            Series::InterfacesTotal => self.interfaces_total.set(value),
            Series::PeersTotal { interface } => self
                .peers_total
                .with_label_values(&[interface.as_str()])
                .set(value),
            Series::BytesTotal {
                interface,
                direction,
            } => self
                .bytes_total
                .with_label_values(&[interface.as_str(), direction.as_str()])
                .set(value),
            Series::PeerBytesTotal {
                interface,
                peer,
                alias,
                direction,
            } => self
                .peer_bytes_total
                .with_label_values(&[
                    interface.as_str(),
                    peer.as_str(),
                    alias.as_str(),
                    direction.as_str(),
                ])
                .set(value),
            Series::HandshakeAge {
                interface,
                peer,
                alias,
            } => self
                .duration_since_latest_handshake
                .with_label_values(&[interface.as_str(), peer.as_str(), alias.as_str()])
                .set(value),
            Series::PeerEndpoint {
                interface,
                peer,
                alias,
                endpoint_ip,
            } => self
                .peer_endpoint
                .with_label_values(&[
                    interface.as_str(),
                    peer.as_str(),
                    alias.as_str(),
                    endpoint_ip.as_str(),
                ])
                .set(value),
        }
    }

    /// Drops one labeled series from the registry output.
    ///
    /// Unlabeled series describe the exporter itself, not snapshot
    /// members, and are never retracted. Retracting a series that is
    /// already gone is a no-op.
    pub fn retract(&self, series: &Series) {
        let _ = match series {
            Series::InterfacesTotal => Ok(()),
            Series::PeersTotal { interface } => self
                .peers_total
                .remove_label_values(&[interface.as_str()]),
            Series::BytesTotal {
                interface,
                direction,
            } => self
                .bytes_total
                .remove_label_values(&[interface.as_str(), direction.as_str()]),
            Series::PeerBytesTotal {
                interface,
                peer,
                alias,
                direction,
            } => self.peer_bytes_total.remove_label_values(&[
                interface.as_str(),
                peer.as_str(),
                alias.as_str(),
                direction.as_str(),
            ]),
            Series::HandshakeAge {
                interface,
                peer,
                alias,
            } => self.duration_since_latest_handshake.remove_label_values(&[
                interface.as_str(),
                peer.as_str(),
                alias.as_str(),
            ]),
            Series::PeerEndpoint {
                interface,
                peer,
                alias,
                endpoint_ip,
            } => self.peer_endpoint.remove_label_values(&[
                interface.as_str(),
                peer.as_str(),
                alias.as_str(),
                endpoint_ip.as_str(),
            ]),
        };
    }
}
