//! End-to-end routing tests over a real socket.

use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tempfile::TempDir;
use tungstenite::Message;
use tungstenite::stream::MaybeTlsStream;

use super::bind;
use crate::config::{Config, DEFAULT_PATTERN, WatchSpec};
use crate::http::filter::FILTER_HEADER;
use crate::reload::RELOAD_PATH;

const INTERVAL: Duration = Duration::from_millis(50);
const WAIT: Duration = Duration::from_secs(5);

/// Serve a fresh site on an OS-assigned port; the server thread outlives the test.
fn start(is_shutdown: fn() -> bool) -> (TempDir, SocketAddr) {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("index.html"),
        "<html><head><title>t</title></head><body>hi</body></html>",
    )
    .unwrap();

    let spec = WatchSpec::new(dir.path(), DEFAULT_PATTERN).unwrap();
    let mut config = Config::default();
    config.serve.port = 0;

    let bound = bind(&config, Arc::new(spec), INTERVAL, is_shutdown).unwrap();
    let addr = bound.addr;
    thread::spawn(move || bound.run());
    (dir, addr)
}

fn running() -> bool {
    false
}

/// Send one raw HTTP/1.1 request and read until the server closes.
fn send(addr: SocketAddr, method: &str, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(WAIT)).unwrap();
    write!(
        stream,
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    )
    .unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

fn header<'a>(response: &'a str, name: &str) -> Option<&'a str> {
    let head = response.split("\r\n\r\n").next()?;
    head.lines().skip(1).find_map(|line| {
        let (field, value) = line.split_once(':')?;
        field
            .trim()
            .eq_ignore_ascii_case(name)
            .then_some(value.trim())
    })
}

#[test]
fn test_html_page_gets_reload_script() {
    let (_dir, addr) = start(running);
    let response = send(addr, "GET", "/");

    assert!(response.starts_with("HTTP/1.1 200"));
    assert_eq!(header(&response, FILTER_HEADER), Some("injected"));
    assert!(response.contains(RELOAD_PATH));
    assert!(response.contains("<body>hi</body>"));
}

#[test]
fn test_head_is_allowed() {
    let (_dir, addr) = start(running);
    let response = send(addr, "HEAD", "/index.html");

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.ends_with("\r\n\r\n"));
}

#[test]
fn test_other_methods_rejected_with_allow() {
    let (_dir, addr) = start(running);
    let response = send(addr, "POST", "/index.html");

    assert!(response.starts_with("HTTP/1.1 405"));
    assert_eq!(header(&response, "Allow"), Some("GET, HEAD"));
}

#[test]
fn test_reload_path_requires_upgrade() {
    let (_dir, addr) = start(running);

    let response = send(addr, "GET", RELOAD_PATH);
    assert!(response.starts_with("HTTP/1.1 400"));

    let response = send(addr, "POST", RELOAD_PATH);
    assert!(response.starts_with("HTTP/1.1 405"));
    assert_eq!(header(&response, "Allow"), Some("GET"));
}

#[test]
fn test_shutting_down_refuses_requests() {
    let (_dir, addr) = start(|| true);

    assert!(send(addr, "GET", "/").starts_with("HTTP/1.1 503"));
    assert!(send(addr, "GET", RELOAD_PATH).starts_with("HTTP/1.1 503"));
}

#[test]
fn test_websocket_receives_reload_after_change() {
    let (dir, addr) = start(running);

    let (mut ws, response) = tungstenite::connect(format!("ws://{addr}{RELOAD_PATH}")).unwrap();
    assert_eq!(response.status(), 101);
    if let MaybeTlsStream::Plain(stream) = ws.get_mut() {
        stream.set_read_timeout(Some(WAIT)).unwrap();
    }

    // The watch is registered before the upgrade completes.
    fs::write(dir.path().join("index.md"), "# changed").unwrap();

    let text = loop {
        match ws.read().unwrap() {
            Message::Text(text) => break text,
            // Keepalives on idle ticks.
            _ => continue,
        }
    };
    let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
    assert!(value["r"].as_u64().unwrap() > 0);
}
