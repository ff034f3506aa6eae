//! The collection loop: scheduled scrape, translation, and write-out.

use std::collections::HashSet;
use std::time::{Duration, Instant, SystemTime};

use tokio::time::MissedTickBehavior;

use crate::alias::AliasTable;
use crate::metrics::{Metrics, Series, translate};
use crate::wg::{DeviceHandle, DeviceSource, FetchError};

/// Drives the scrape cadence against one device source.
///
/// The poller is the sole writer of every gauge and the sole reader of
/// the device source. Cycles are strictly serialized: a scrape that
/// outlives the interval delays subsequent ticks instead of overlapping
/// them.
pub struct Poller<S: DeviceSource> {
    source: S,
    metrics: Metrics,
    aliases: AliasTable,
    interval: Duration,
    fetch_timeout: Duration,
    live_series: HashSet<Series>,
}

impl<S: DeviceSource> Poller<S> {
    pub fn new(
        source: S,
        metrics: Metrics,
        aliases: AliasTable,
        interval: Duration,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            source,
            metrics,
            aliases,
            interval,
            fetch_timeout,
            live_series: HashSet::new(),
        }
    }

    /// Runs the collection loop until the process exits.
    ///
    /// Failing to open the device source terminates the loop before the
    /// first cycle: `wireguard_scrape_success` is pinned to 0 and
    /// `wireguard_collector_running` reports the stop. There is no
    /// restart path; per-cycle fetch failures only skip their cycle.
    pub async fn run(mut self) {
        let mut handle = match self.source.open() {
            Ok(handle) => handle,
            Err(err) => {
                log::error!("cannot open wireguard device source: {err}");
                self.metrics.set_scrape_success(false);
                self.metrics.set_collector_running(false);
                return;
            }
        };
        self.metrics.set_collector_running(true);

        // The first tick completes immediately: scrape once at startup,
        // then follow the fixed cadence.
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.scrape(&mut handle).await;
        }
    }

    /// Runs one scrape cycle: fetch under the deadline, translate, write
    /// every sample, retract series that vanished since the previous
    /// cycle.
    async fn scrape(&mut self, handle: &mut S::Handle) {
        let start = Instant::now();

        let fetched = match tokio::time::timeout(self.fetch_timeout, handle.devices()).await {
            Ok(fetched) => fetched,
            Err(_) => Err(FetchError::Timeout {
                after: self.fetch_timeout,
            }),
        };
        let devices = match fetched {
            Ok(devices) => devices,
            Err(err) => {
                log::error!("cannot list wireguard devices: {err}");
                self.metrics.set_scrape_success(false);
                return;
            }
        };
        self.metrics.set_scrape_success(true);

        for device in &devices {
            log::debug!("collecting metrics for interface {}", device.name);
            for peer in &device.peers {
                log::debug!(
                    "  peer {} (alias: {})",
                    peer.public_key,
                    self.aliases.resolve(&peer.public_key)
                );
            }
        }

        let samples = translate(&devices, &self.aliases, SystemTime::now());
        let mut written = HashSet::with_capacity(samples.len());
        for sample in &samples {
            self.metrics.apply(sample);
            written.insert(sample.series.clone());
        }
        for stale in self.live_series.difference(&written) {
            self.metrics.retract(stale);
        }
        self.live_series = written;

        let took = start.elapsed();
        self.metrics.set_scrape_duration(took);
        log::debug!("scrape completed in {took:?}");
    }
}
