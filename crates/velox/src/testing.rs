//! In-process test client.
//!
//! Drives an [`App`] end to end without a socket: requests go straight into
//! [`App::handle`] over a recording transport, and the recorded write comes
//! back as a [`TestResponse`].

use crate::app::App;
use velox_core::testing::{RecordingTransport, run};
use velox_core::{Body, Method, Request, StatusCode};

/// Synchronous client over an in-process [`App`].
#[derive(Debug)]
pub struct TestClient {
    app: App,
}

impl TestClient {
    /// Wrap an app.
    #[must_use]
    pub fn new(app: App) -> Self {
        Self { app }
    }

    /// Issue a request for `target`, which may carry a query string
    /// (`/search?q=velox`).
    pub fn request(&self, method: Method, target: &str) -> TestResponse {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };
        let mut request = Request::new(method, path);
        request.set_query(query);
        self.send(request)
    }

    /// Issue a fully built request, for tests that need headers or a body.
    pub fn send(&self, request: Request) -> TestResponse {
        let (transport, recorded) = RecordingTransport::new();
        run(self.app.handle(request, transport));
        let rec = recorded.lock();
        TestResponse {
            status: rec.status,
            headers: rec.headers.clone(),
            body: rec.body.clone(),
        }
    }

    /// `GET` shorthand.
    pub fn get(&self, target: &str) -> TestResponse {
        self.request(Method::Get, target)
    }

    /// `HEAD` shorthand.
    pub fn head(&self, target: &str) -> TestResponse {
        self.request(Method::Head, target)
    }

    /// `POST` shorthand with a byte body.
    pub fn post(&self, target: &str, body: impl Into<Vec<u8>>) -> TestResponse {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };
        let mut request = Request::new(Method::Post, path);
        request.set_query(query);
        request.set_body(Body::Bytes(body.into()));
        self.send(request)
    }

    /// `PUT` shorthand.
    pub fn put(&self, target: &str) -> TestResponse {
        self.request(Method::Put, target)
    }

    /// `PATCH` shorthand.
    pub fn patch(&self, target: &str) -> TestResponse {
        self.request(Method::Patch, target)
    }

    /// `DELETE` shorthand.
    pub fn delete(&self, target: &str) -> TestResponse {
        self.request(Method::Delete, target)
    }

    /// `OPTIONS` shorthand.
    pub fn options(&self, target: &str) -> TestResponse {
        self.request(Method::Options, target)
    }
}

/// What the app wrote through the transport.
#[derive(Debug)]
pub struct TestResponse {
    status: Option<StatusCode>,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl TestResponse {
    /// The written status, or `None` when the chain never finalized.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// A response header by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body decoded as UTF-8, lossily.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}
