//! HTML-injecting response filter.
//!
//! Wraps another [`Handler`], buffers its response and splices the reload
//! bootstrap script in front of the first `</head>` of HTML bodies. Every
//! other response is passed through byte for byte.

use anyhow::{Context, Result};

use super::{BufferedResponse, Handler, ResponseWriter};

/// Header telling whether the filter rewrote the body.
pub const FILTER_HEADER: &str = "X-Hotserve-Filter";

const MARKER: &[u8] = b"</head>";

/// Validators describing the unfiltered body; stale once the snippet is in.
const DROPPED_HEADERS: &[&str] = &["Last-Modified", "ETag", "Content-Length"];

pub struct ContentFilter<H> {
    inner: H,
    snippet: String,
}

impl<H: Handler> ContentFilter<H> {
    pub fn new(inner: H, snippet: impl Into<String>) -> Self {
        Self {
            inner,
            snippet: snippet.into(),
        }
    }
}

impl<H: Handler> Handler for ContentFilter<H> {
    fn serve(&self, url: &str, out: &mut dyn ResponseWriter) -> Result<()> {
        let mut buffered = BufferedResponse::new();
        self.inner.serve(url, &mut buffered)?;

        let headers = out.headers_mut();
        for (name, value) in buffered.headers.iter() {
            if !DROPPED_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name)) {
                headers.append(name, value);
            }
        }

        let injected = if is_html(&buffered) {
            inject(&buffered.body, &self.snippet)
        } else {
            None
        };

        let (mode, body) = match &injected {
            Some(body) => ("injected", body.as_slice()),
            None => ("passthrough", buffered.body.as_slice()),
        };
        headers.set(FILTER_HEADER, mode);
        headers.set("Content-Length", body.len().to_string());

        out.write_head(buffered.status);
        out.write_body(body)
            .with_context(|| format!("failed to write response for {url}"))
    }
}

fn is_html(response: &BufferedResponse) -> bool {
    response
        .content_type()
        .is_some_and(|ct| ct.len() >= 9 && ct.as_bytes()[..9].eq_ignore_ascii_case(b"text/html"))
}

/// Splice `snippet` in front of the first `</head>`.
///
/// Returns `None` when the body has no marker.
pub fn inject(body: &[u8], snippet: &str) -> Option<Vec<u8>> {
    let at = body.windows(MARKER.len()).position(|w| w == MARKER)?;

    let mut out = Vec::with_capacity(body.len() + snippet.len());
    out.extend_from_slice(&body[..at]);
    out.extend_from_slice(snippet.as_bytes());
    out.extend_from_slice(&body[at..]);
    Some(out)
}
