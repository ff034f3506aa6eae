use std::path::PathBuf;
use std::process::Stdio;

use super::{Device, DeviceHandle, DeviceSource, FetchError, OpenError, parser};

/// Device source backed by the `wg(8)` userspace tool.
#[derive(Debug, Clone)]
pub struct WgCli {
    wg_path: PathBuf,
}

impl WgCli {
    pub fn new(wg_path: PathBuf) -> Self {
        Self { wg_path }
    }
}

impl DeviceSource for WgCli {
    type Handle = WgCliHandle;

    /// Verifies the `wg` executable runs before the collection loop
    /// starts; a missing or broken binary is not a per-cycle condition.
    fn open(&self) -> Result<WgCliHandle, OpenError> {
        std::process::Command::new(&self.wg_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| OpenError {
                wg_path: self.wg_path.clone(),
                source,
            })?;
        Ok(WgCliHandle {
            wg_path: self.wg_path.clone(),
        })
    }
}

/// Fetches snapshots by running `wg show all dump`.
#[derive(Debug)]
pub struct WgCliHandle {
    wg_path: PathBuf,
}

impl DeviceHandle for WgCliHandle {
    async fn devices(&mut self) -> Result<Vec<Device>, FetchError> {
        // kill_on_drop: an abandoned fetch (deadline expiry) must not
        // leave the child running into the next cycle.
        let output = tokio::process::Command::new(&self.wg_path)
            .args(["show", "all", "dump"])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(FetchError::Spawn)?;

        if !output.status.success() {
            return Err(FetchError::Command {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let stdout = std::str::from_utf8(&output.stdout).map_err(FetchError::Output)?;
        Ok(parser::parse_dump(stdout)?)
    }
}
