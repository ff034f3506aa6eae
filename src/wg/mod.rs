//! WireGuard device state access.
//!
//! Models one snapshot of kernel device state (interfaces and their
//! peers) and defines the seam the poller fetches it through:
//!
//! - [`DeviceSource`] acquires a handle once at loop start; failure here
//!   is fatal to the collection loop.
//! - [`DeviceHandle`] produces one snapshot per call; failure here only
//!   skips the current cycle.
//!
//! The production implementation ([`WgCli`]) shells out to
//! `wg show all dump` and parses its tab-separated output. The [`mock`]
//! module provides scripted sources for tests.

mod cli;
mod error;
pub mod mock;
mod parser;

pub use cli::WgCli;
pub use error::{FetchError, OpenError};
pub use parser::{ParseError, parse_dump};

use std::net::SocketAddr;
use std::time::SystemTime;

/// One WireGuard interface and its peers, as reported by a single scrape.
///
/// Materialized fresh each cycle and discarded afterwards; nothing is
/// retained between snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub name: String,
    pub peers: Vec<Peer>,
}

/// One remote endpoint configured on a [`Device`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peer {
    /// Base64-encoded public key identifying the peer.
    pub public_key: String,
    /// Bytes received from the peer, as reported by the kernel.
    pub receive_bytes: u64,
    /// Bytes sent to the peer, as reported by the kernel.
    pub transmit_bytes: u64,
    /// Time of the latest completed handshake; `None` if the peer never
    /// completed one.
    pub latest_handshake: Option<SystemTime>,
    /// Remote address the peer was last seen at, if known.
    pub endpoint: Option<SocketAddr>,
}

/// Factory for device state handles.
pub trait DeviceSource {
    type Handle: DeviceHandle + Send + 'static;

    /// Acquires a handle to device state.
    ///
    /// Runs once when the poller starts; a failure here terminates the
    /// collection loop, unlike per-cycle fetch failures.
    fn open(&self) -> Result<Self::Handle, OpenError>;
}

/// A live handle that can produce device snapshots on demand.
pub trait DeviceHandle {
    /// Fetches a snapshot of all WireGuard devices and their peers.
    fn devices(&mut self) -> impl Future<Output = Result<Vec<Device>, FetchError>> + Send;
}
