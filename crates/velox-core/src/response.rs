//! Response side of the routing core.
//!
//! The transport collaborator hands the core an object implementing
//! [`ResponseTransport`] — the minimal "write status + headers" and
//! "end/finalize" capability. The core wraps it in a [`ResponseHandle`], which
//! adds the send helpers and enforces two invariants:
//!
//! - a response is finalized at most once (later sends are ignored), and
//! - HEAD responses keep their status and headers but suppress body bytes.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    pub const OK: Self = Self(200);
    pub const CREATED: Self = Self(201);
    pub const NO_CONTENT: Self = Self(204);
    pub const MOVED_PERMANENTLY: Self = Self(301);
    pub const FOUND: Self = Self(302);
    pub const BAD_REQUEST: Self = Self(400);
    pub const UNAUTHORIZED: Self = Self(401);
    pub const FORBIDDEN: Self = Self(403);
    pub const NOT_FOUND: Self = Self(404);
    pub const METHOD_NOT_ALLOWED: Self = Self(405);
    pub const INTERNAL_SERVER_ERROR: Self = Self(500);

    /// Create a status code from its numeric value.
    #[must_use]
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    /// The numeric value.
    #[must_use]
    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// The canonical reason phrase.
    #[must_use]
    pub fn canonical_reason(self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.canonical_reason())
    }
}

/// The capability the transport collaborator must provide.
///
/// The core never parses or formats wire bytes; it only asks the transport to
/// write a head and finalize with a body.
pub trait ResponseTransport: Send {
    /// Write the status line and headers.
    fn write_head(&mut self, status: StatusCode, headers: &[(String, String)]);

    /// Finalize the response with the given body bytes.
    fn end(&mut self, body: &[u8]);
}

struct ResponseState {
    transport: Box<dyn ResponseTransport>,
    finished: bool,
    suppress_body: bool,
}

/// Shared, finalize-once wrapper around the transport's response capability.
///
/// Every entry of a handler chain holds a clone of the same handle. Once any
/// entry finalizes the response, later sends become no-ops, so an erroring
/// chain can never write a second head.
#[derive(Clone)]
pub struct ResponseHandle {
    inner: Arc<Mutex<ResponseState>>,
}

impl ResponseHandle {
    /// Wrap a transport. `suppress_body` is set for HEAD requests: status and
    /// headers go through, body bytes are dropped.
    #[must_use]
    pub fn new(transport: impl ResponseTransport + 'static, suppress_body: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ResponseState {
                transport: Box::new(transport),
                finished: false,
                suppress_body,
            })),
        }
    }

    /// Whether the response has been finalized.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.lock().finished
    }

    /// Write head and finalize in one step. No-op if already finalized.
    pub fn send(&self, status: StatusCode, headers: &[(String, String)], body: &[u8]) {
        let mut state = self.inner.lock();
        if state.finished {
            return;
        }
        state.transport.write_head(status, headers);
        if state.suppress_body {
            state.transport.end(&[]);
        } else {
            state.transport.end(body);
        }
        state.finished = true;
    }

    /// Send a plain-text response.
    pub fn send_text(&self, status: StatusCode, data: &str) {
        self.send(
            status,
            &[("Content-Type".to_string(), "text/plain".to_string())],
            data.as_bytes(),
        );
    }

    /// Send a JSON response serialized from `data`.
    ///
    /// A value that fails to serialize degrades to a 500, since by this point
    /// there is no handler left to recover.
    pub fn send_json<T: Serialize>(&self, status: StatusCode, data: &T) {
        match serde_json::to_vec(data) {
            Ok(body) => self.send(
                status,
                &[("Content-Type".to_string(), "application/json".to_string())],
                &body,
            ),
            Err(err) => {
                crate::logging::error(format!("response serialization failed: {err}"));
                self.send_server_error();
            }
        }
    }

    /// Send an XML response. Leading/trailing whitespace is trimmed and the
    /// `Content-Length` of the trimmed payload is set.
    pub fn send_xml(&self, status: StatusCode, data: &str) {
        let body = data.trim();
        self.send(
            status,
            &[
                ("Content-Type".to_string(), "application/xml".to_string()),
                ("Content-Length".to_string(), body.len().to_string()),
            ],
            body.as_bytes(),
        );
    }

    /// Redirect to `url` — 301 when `permanent`, 302 otherwise.
    pub fn redirect(&self, url: &str, permanent: bool) {
        let status = if permanent {
            StatusCode::MOVED_PERMANENTLY
        } else {
            StatusCode::FOUND
        };
        self.send(status, &[("Location".to_string(), url.to_string())], &[]);
    }

    /// Send a 401 with a plain-text message.
    pub fn send_unauthorized(&self, msg: &str) {
        self.send_text(StatusCode::UNAUTHORIZED, msg);
    }

    /// Send the canonical 404 body.
    pub fn send_not_found(&self) {
        self.send_json(
            StatusCode::NOT_FOUND,
            &serde_json::json!({ "error": "Not found" }),
        );
    }

    /// Send the canonical 500 body.
    pub fn send_server_error(&self) {
        self.send_json(
            StatusCode::INTERNAL_SERVER_ERROR,
            &serde_json::json!({ "error": "Internal Server Error" }),
        );
    }
}

impl std::fmt::Debug for ResponseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseHandle")
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}
