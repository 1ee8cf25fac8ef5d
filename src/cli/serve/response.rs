//! tiny_http responders.

use std::io::Cursor;

use anyhow::{Context, Result, anyhow};
use tiny_http::{Header, Request, Response, StatusCode};

use crate::http::{BufferedResponse, Headers};
use crate::utils::mime::types::PLAIN;

/// Send a fully buffered response. tiny_http derives `Content-Length` from
/// the body and omits the body itself for HEAD requests.
pub fn respond_buffered(request: Request, buffered: BufferedResponse) -> Result<()> {
    let headers = to_tiny_headers(&buffered.headers)?;
    let len = buffered.body.len();
    let response = Response::new(
        StatusCode(buffered.status),
        headers,
        Cursor::new(buffered.body),
        Some(len),
        None,
    );
    request.respond(response).context("failed to send response")
}

/// Short plain-text response for errors and rejections.
pub fn respond_text(request: Request, status: u16, text: &str) -> Result<()> {
    let mut buffered = BufferedResponse::new();
    buffered.status = status;
    buffered.headers.set("Content-Type", PLAIN);
    buffered.body = text.as_bytes().to_vec();
    respond_buffered(request, buffered)
}

/// 405 with the `Allow` header listing what the route accepts.
pub fn respond_method_not_allowed(request: Request, allow: &str) -> Result<()> {
    let mut buffered = BufferedResponse::new();
    buffered.status = 405;
    buffered.headers.set("Content-Type", PLAIN);
    buffered.headers.set("Allow", allow);
    buffered.body = b"405 Method Not Allowed".to_vec();
    respond_buffered(request, buffered)
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    respond_text(request, 503, "503 Service Unavailable")
}

/// Copy request headers into the handler-side header list.
pub fn request_headers(request: &Request) -> Headers {
    request
        .headers()
        .iter()
        .map(|h| (h.field.as_str().as_str().to_owned(), h.value.as_str().to_owned()))
        .collect()
}

pub fn make_header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("invalid header {name}: {value}"))
}

fn to_tiny_headers(headers: &Headers) -> Result<Vec<Header>> {
    headers
        .iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case("Content-Length"))
        .map(|(name, value)| make_header(name, value))
        .collect()
}
