use std::path::PathBuf;
use std::time::Duration;

use super::parser::ParseError;

/// Error acquiring a handle to WireGuard device state at startup.
#[derive(Debug, thiserror::Error)]
#[error("cannot run `{}`: {source}", wg_path.display())]
pub struct OpenError {
    pub wg_path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Errors that can fail a single snapshot fetch.
///
/// All variants are per-cycle-transient: the poller skips the cycle and
/// retries on the next tick.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to spawn `wg`: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("`wg show all dump` failed with {status}: {stderr}")]
    Command {
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("`wg` produced non-UTF-8 output: {0}")]
    Output(#[source] std::str::Utf8Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("device state query timed out after {after:?}")]
    Timeout { after: Duration },
}
