//! Scripted device sources for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{Device, DeviceHandle, DeviceSource, FetchError, OpenError};

/// One scripted reply of a [`MockHandle`].
#[derive(Debug)]
pub enum MockResponse {
    /// Return this snapshot.
    Devices(Vec<Device>),
    /// Fail the fetch.
    Error(String),
    /// Never resolve, so the caller's deadline expires.
    Stall,
}

/// Device handle that replays scripted responses in order.
///
/// Once the script is exhausted every further fetch returns an empty
/// snapshot.
#[derive(Debug, Default)]
pub struct MockHandle {
    responses: VecDeque<MockResponse>,
}

impl MockHandle {
    pub fn new(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        Self {
            responses: responses.into_iter().collect(),
        }
    }
}

impl DeviceHandle for MockHandle {
    async fn devices(&mut self) -> Result<Vec<Device>, FetchError> {
        match self.responses.pop_front() {
            Some(MockResponse::Devices(devices)) => Ok(devices),
            Some(MockResponse::Error(message)) => {
                Err(FetchError::Spawn(std::io::Error::other(message)))
            }
            Some(MockResponse::Stall) => {
                std::future::pending::<()>().await;
                unreachable!("pending future resolved")
            }
            None => Ok(Vec::new()),
        }
    }
}

/// Device source handing out a pre-built [`MockHandle`], or failing
/// acquisition when constructed without one.
#[derive(Debug, Default)]
pub struct MockSource {
    handle: Mutex<Option<MockHandle>>,
}

impl MockSource {
    pub fn with_handle(handle: MockHandle) -> Self {
        Self {
            handle: Mutex::new(Some(handle)),
        }
    }

    /// A source whose `open` always fails, for exercising the loop-fatal
    /// startup path.
    pub fn failing() -> Self {
        Self::default()
    }
}

impl DeviceSource for MockSource {
    type Handle = MockHandle;

    fn open(&self) -> Result<MockHandle, OpenError> {
        self.handle
            .lock()
            .expect("mock handle lock")
            .take()
            .ok_or_else(|| OpenError {
                wg_path: "wg".into(),
                source: std::io::Error::other("mock source configured to fail"),
            })
    }
}
