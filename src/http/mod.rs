//! HTTP handler abstractions shared by the file server and the content filter.
//!
//! A [`Handler`] serves the resource for a URL into a [`ResponseWriter`].
//! The transport layer hands handlers a [`BufferedResponse`] and only talks
//! to the client once the handler has returned, so status, headers and
//! `Content-Length` are always final before the first byte goes out.

pub mod files;
pub mod filter;

use std::io;

use anyhow::Result;

pub use files::FileServer;
pub use filter::ContentFilter;

/// "Serve the resource matching this request path."
pub trait Handler: Send + Sync {
    fn serve(&self, url: &str, out: &mut dyn ResponseWriter) -> Result<()>;
}

/// Destination of one HTTP response.
pub trait ResponseWriter {
    fn headers_mut(&mut self) -> &mut Headers;

    /// Set the status code. Must precede body writes; defaults to 200.
    fn write_head(&mut self, status: u16);

    fn write_body(&mut self, data: &[u8]) -> io::Result<()>;
}

// =============================================================================
// Headers
// =============================================================================

/// Ordered header list with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Replace any existing value for `name`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove(&name);
        self.0.push((name, value.into()));
    }

    /// Add a value without touching existing ones.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn remove(&mut self, name: &str) {
        self.0.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Headers {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// BufferedResponse
// =============================================================================

/// Fully materialized response: status, headers and body in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Declared media type, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("Content-Type")
    }
}

impl Default for BufferedResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseWriter for BufferedResponse {
    fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    fn write_head(&mut self, status: u16) {
        self.status = status;
    }

    fn write_body(&mut self, data: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(data);
        Ok(())
    }
}
