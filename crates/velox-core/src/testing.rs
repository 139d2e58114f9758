//! Testing primitives shared by the workspace.
//!
//! [`RecordingTransport`] implements [`ResponseTransport`] over an in-memory
//! record so tests can assert on exactly what the core handed the transport.
//! [`run`] drives a future to completion synchronously; dispatch is
//! runtime-agnostic, so a plain executor is all tests need.

use crate::response::{ResponseTransport, StatusCode};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;

/// Everything the core wrote through the transport seam.
#[derive(Debug, Default)]
pub struct Recorded {
    /// Status from the last head write, if any.
    pub status: Option<StatusCode>,
    /// Headers from the last head write.
    pub headers: Vec<(String, String)>,
    /// Body bytes passed to `end`.
    pub body: Vec<u8>,
    /// Whether `end` was called.
    pub ended: bool,
    /// Number of head writes observed. A correct core writes at most one.
    pub head_writes: usize,
}

impl Recorded {
    /// Look up a recorded header by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }
}

/// In-memory [`ResponseTransport`] for tests.
pub struct RecordingTransport {
    shared: Arc<Mutex<Recorded>>,
}

impl RecordingTransport {
    /// Create a transport and the shared record it writes into.
    #[must_use]
    pub fn new() -> (Self, Arc<Mutex<Recorded>>) {
        let shared = Arc::new(Mutex::new(Recorded::default()));
        (
            Self {
                shared: Arc::clone(&shared),
            },
            shared,
        )
    }
}

impl ResponseTransport for RecordingTransport {
    fn write_head(&mut self, status: StatusCode, headers: &[(String, String)]) {
        let mut rec = self.shared.lock();
        rec.status = Some(status);
        rec.headers = headers.to_vec();
        rec.head_writes += 1;
    }

    fn end(&mut self, body: &[u8]) {
        let mut rec = self.shared.lock();
        rec.body = body.to_vec();
        rec.ended = true;
    }
}

/// Drive a future to completion on the current thread.
pub fn run<F: Future>(fut: F) -> F::Output {
    futures_executor::block_on(fut)
}
