use std::time::SystemTime;

use crate::alias::AliasTable;
use crate::wg::Device;

/// Traffic direction of a byte counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Rx,
    Tx,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Rx => "rx",
            Direction::Tx => "tx",
        }
    }
}

/// Identity of one metric series: the metric plus its full label set.
///
/// Hashable so the poller can diff the series written in consecutive
/// cycles and retract the ones that disappeared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Series {
    InterfacesTotal,
    PeersTotal {
        interface: String,
    },
    BytesTotal {
        interface: String,
        direction: Direction,
    },
    PeerBytesTotal {
        interface: String,
        peer: String,
        alias: String,
        direction: Direction,
    },
    HandshakeAge {
        interface: String,
        peer: String,
        alias: String,
    },
    PeerEndpoint {
        interface: String,
        peer: String,
        alias: String,
        endpoint_ip: String,
    },
}

/// One gauge observation: a series and the value that fully replaces its
/// previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub series: Series,
    pub value: f64,
}

impl Sample {
    fn new(series: Series, value: f64) -> Self {
        Self { series, value }
    }
}

/// Translates one device snapshot into the full set of gauge samples.
///
/// Pure function of the snapshot and `now`: feeding the same snapshot at
/// the same instant yields the identical sample list. Peers absent from
/// the snapshot simply produce no samples.
pub fn translate(devices: &[Device], aliases: &AliasTable, now: SystemTime) -> Vec<Sample> {
    let mut samples = vec![Sample::new(Series::InterfacesTotal, devices.len() as f64)];

    for device in devices {
        samples.push(Sample::new(
            Series::PeersTotal {
                interface: device.name.clone(),
            },
            device.peers.len() as f64,
        ));

        let total_rx: u64 = device.peers.iter().map(|peer| peer.receive_bytes).sum();
        let total_tx: u64 = device.peers.iter().map(|peer| peer.transmit_bytes).sum();
        samples.push(Sample::new(
            Series::BytesTotal {
                interface: device.name.clone(),
                direction: Direction::Rx,
            },
            total_rx as f64,
        ));
        samples.push(Sample::new(
            Series::BytesTotal {
                interface: device.name.clone(),
                direction: Direction::Tx,
            },
            total_tx as f64,
        ));

        for peer in &device.peers {
            let alias = aliases.resolve(&peer.public_key);

            for (direction, bytes) in [
                (Direction::Rx, peer.receive_bytes),
                (Direction::Tx, peer.transmit_bytes),
            ] {
                samples.push(Sample::new(
                    Series::PeerBytesTotal {
                        interface: device.name.clone(),
                        peer: peer.public_key.clone(),
                        alias: alias.to_owned(),
                        direction,
                    },
                    bytes as f64,
                ));
            }

            // 0 doubles as the "never handshaked" sentinel.
            let handshake_age = peer
                .latest_handshake
                .and_then(|at| now.duration_since(at).ok())
                .map_or(0.0, |age| age.as_secs_f64());
            samples.push(Sample::new(
                Series::HandshakeAge {
                    interface: device.name.clone(),
                    peer: peer.public_key.clone(),
                    alias: alias.to_owned(),
                },
                handshake_age,
            ));

            if let Some(endpoint) = peer.endpoint {
                samples.push(Sample::new(
                    Series::PeerEndpoint {
                        interface: device.name.clone(),
                        peer: peer.public_key.clone(),
                        alias: alias.to_owned(),
                        endpoint_ip: endpoint.ip().to_string(),
                    },
                    1.0,
                ));
            }
        }
    }

    samples
}
