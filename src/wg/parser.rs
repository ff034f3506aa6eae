//! Parser for `wg show all dump` output.
//!
//! The dump format is line-oriented and tab-separated. Each interface
//! contributes one header line with five fields:
//!
//! ```text
//! <interface> <private-key> <public-key> <listen-port> <fwmark>
//! ```
//!
//! followed by one nine-field line per peer:
//!
//! ```text
//! <interface> <public-key> <preshared-key> <endpoint> <allowed-ips> <latest-handshake> <transfer-rx> <transfer-tx> <persistent-keepalive>
//! ```
//!
//! Missing values are reported as `(none)` (endpoint, preshared key) or
//! `0` (latest handshake, meaning the peer never completed one).

use std::net::SocketAddr;
use std::time::{Duration, UNIX_EPOCH};

use super::{Device, Peer};

const NONE_FIELD: &str = "(none)";
const INTERFACE_FIELDS: usize = 5;
const PEER_FIELDS: usize = 9;

/// Errors that may occur when parsing a device dump.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected field count {count} on line {line_number}: `{line}`")]
    FieldCount {
        count: usize,
        line_number: usize,
        line: String,
    },

    #[error("peer on line {line_number} references interface `{interface}` before its header line")]
    PeerBeforeInterface {
        interface: String,
        line_number: usize,
    },

    #[error("invalid {field} `{value}` on line {line_number}: {source}")]
    Number {
        field: &'static str,
        value: String,
        line_number: usize,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("invalid endpoint `{value}` on line {line_number}: {source}")]
    Endpoint {
        value: String,
        line_number: usize,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Parses the complete output of `wg show all dump` into devices.
///
/// Devices appear in dump order; every peer line must follow the header
/// line of the interface it names.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first malformed line. A
/// malformed dump never yields a partial device list.
pub fn parse_dump(dump: &str) -> Result<Vec<Device>, ParseError> {
    let mut devices: Vec<Device> = Vec::new();

    for (index, line) in dump.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let line_number = index + 1;
        let fields: Vec<&str> = line.split('\t').collect();
        match fields.len() {
            INTERFACE_FIELDS => devices.push(Device {
                name: fields[0].to_owned(),
                peers: Vec::new(),
            }),
            PEER_FIELDS => {
                let peer = parse_peer_fields(&fields, line_number)?;
                let device = devices
                    .iter_mut()
                    .rev()
                    .find(|device| device.name == fields[0])
                    .ok_or_else(|| ParseError::PeerBeforeInterface {
                        interface: fields[0].to_owned(),
                        line_number,
                    })?;
                device.peers.push(peer);
            }
            count => {
                return Err(ParseError::FieldCount {
                    count,
                    line_number,
                    line: line.to_owned(),
                });
            }
        }
    }

    Ok(devices)
}

fn parse_peer_fields(fields: &[&str], line_number: usize) -> Result<Peer, ParseError> {
    let endpoint = match fields[3] {
        NONE_FIELD => None,
        value => Some(value.parse::<SocketAddr>().map_err(|source| {
            ParseError::Endpoint {
                value: value.to_owned(),
                line_number,
                source,
            }
        })?),
    };

    let handshake_epoch = parse_number(fields[5], "latest handshake", line_number)?;
    let latest_handshake =
        (handshake_epoch != 0).then(|| UNIX_EPOCH + Duration::from_secs(handshake_epoch));

    Ok(Peer {
        public_key: fields[1].to_owned(),
        receive_bytes: parse_number(fields[6], "transfer-rx", line_number)?,
        transmit_bytes: parse_number(fields[7], "transfer-tx", line_number)?,
        latest_handshake,
        endpoint,
    })
}

fn parse_number(value: &str, field: &'static str, line_number: usize) -> Result<u64, ParseError> {
    value.parse::<u64>().map_err(|source| ParseError::Number {
        field,
        value: value.to_owned(),
        line_number,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WG0_HEADER: &str = "wg0\tcHJpdmF0ZTA=\tcHVibGljMA==\t51820\toff";
    const WG1_HEADER: &str = "wg1\tcHJpdmF0ZTE=\tcHVibGljMQ==\t51821\toff";

    fn peer_line(
        interface: &str,
        public_key: &str,
        endpoint: &str,
        handshake: u64,
        rx: u64,
        tx: u64,
    ) -> String {
        format!("{interface}\t{public_key}\t(none)\t{endpoint}\t10.0.0.2/32\t{handshake}\t{rx}\t{tx}\toff")
    }

    #[test]
    fn parses_interface_with_peers() {
        let dump = format!(
            "{WG0_HEADER}\n{}\n{}\n",
            peer_line("wg0", "peer-a", "203.0.113.9:51820", 1700000000, 100, 50),
            peer_line("wg0", "peer-b", "(none)", 0, 0, 0),
        );
        let devices = parse_dump(&dump).unwrap();

        assert_eq!(devices.len(), 1);
        let device = &devices[0];
        assert_eq!(device.name, "wg0");
        assert_eq!(device.peers.len(), 2);

        let first = &device.peers[0];
        assert_eq!(first.public_key, "peer-a");
        assert_eq!(first.receive_bytes, 100);
        assert_eq!(first.transmit_bytes, 50);
        assert_eq!(
            first.latest_handshake,
            Some(UNIX_EPOCH + Duration::from_secs(1700000000))
        );
        assert_eq!(
            first.endpoint,
            Some("203.0.113.9:51820".parse().unwrap())
        );

        let second = &device.peers[1];
        assert_eq!(second.latest_handshake, None);
        assert_eq!(second.endpoint, None);
    }

    #[test]
    fn parses_multiple_interfaces() {
        let dump = format!(
            "{WG0_HEADER}\n{}\n{WG1_HEADER}\n{}\n",
            peer_line("wg0", "peer-a", "(none)", 0, 1, 2),
            peer_line("wg1", "peer-b", "(none)", 0, 3, 4),
        );
        let devices = parse_dump(&dump).unwrap();

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].name, "wg0");
        assert_eq!(devices[0].peers[0].public_key, "peer-a");
        assert_eq!(devices[1].name, "wg1");
        assert_eq!(devices[1].peers[0].public_key, "peer-b");
    }

    #[test]
    fn parses_interface_without_peers() {
        let devices = parse_dump(WG0_HEADER).unwrap();
        assert_eq!(devices.len(), 1);
        assert!(devices[0].peers.is_empty());
    }

    #[test]
    fn parses_ipv6_endpoint() {
        let dump = format!(
            "{WG0_HEADER}\n{}\n",
            peer_line("wg0", "peer-a", "[2001:db8::1]:51820", 0, 0, 0),
        );
        let devices = parse_dump(&dump).unwrap();
        let endpoint = devices[0].peers[0].endpoint.unwrap();
        assert_eq!(endpoint.ip().to_string(), "2001:db8::1");
        assert_eq!(endpoint.port(), 51820);
    }

    #[test]
    fn empty_dump_yields_no_devices() {
        assert!(parse_dump("").unwrap().is_empty());
        assert!(parse_dump("\n\n").unwrap().is_empty());
    }

    #[test]
    fn error_on_unexpected_field_count() {
        let err = parse_dump("wg0\tonly\tthree").unwrap_err();
        match err {
            ParseError::FieldCount {
                count, line_number, ..
            } => {
                assert_eq!(count, 3);
                assert_eq!(line_number, 1);
            }
            _ => panic!("expected FieldCount error"),
        }
    }

    #[test]
    fn error_on_peer_before_interface() {
        let dump = peer_line("wg9", "peer-a", "(none)", 0, 0, 0);
        let err = parse_dump(&dump).unwrap_err();
        match err {
            ParseError::PeerBeforeInterface {
                interface,
                line_number,
            } => {
                assert_eq!(interface, "wg9");
                assert_eq!(line_number, 1);
            }
            _ => panic!("expected PeerBeforeInterface error"),
        }
    }

    #[test]
    fn error_on_bad_transfer_value() {
        let dump = format!(
            "{WG0_HEADER}\nwg0\tpeer-a\t(none)\t(none)\t10.0.0.2/32\t0\tabc\t0\toff"
        );
        let err = parse_dump(&dump).unwrap_err();
        match err {
            ParseError::Number {
                field,
                value,
                line_number,
                ..
            } => {
                assert_eq!(field, "transfer-rx");
                assert_eq!(value, "abc");
                assert_eq!(line_number, 2);
            }
            _ => panic!("expected Number error"),
        }
    }

    #[test]
    fn error_on_bad_endpoint() {
        let dump = format!(
            "{WG0_HEADER}\n{}\n",
            peer_line("wg0", "peer-a", "not-an-address", 0, 0, 0),
        );
        let err = parse_dump(&dump).unwrap_err();
        match err {
            ParseError::Endpoint { value, .. } => assert_eq!(value, "not-an-address"),
            _ => panic!("expected Endpoint error"),
        }
    }
}
