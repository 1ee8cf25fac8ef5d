//! Static file handler rooted at the content directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use super::{Handler, ResponseWriter};
use crate::embed::serve::{LISTING_HTML, ListingVars};
use crate::utils::{html, mime};

/// Characters left unescaped in listing links: RFC 3986 unreserved.
const HREF_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// What a request URL points at.
#[derive(Debug, PartialEq, Eq)]
enum Target {
    File(PathBuf),
    /// Directory requested with a trailing slash and no index.html.
    Listing { dir: PathBuf, url_path: String },
    /// Directory requested without a trailing slash.
    Redirect(String),
    NotFound,
}

/// Serves files below `root`. Stateless between calls.
pub struct FileServer {
    root: PathBuf,
}

impl FileServer {
    /// `root` should be canonical; paths resolving outside it are refused.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, url: &str) -> Target {
        let (raw_path, query) = match url.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (url, None),
        };

        let Ok(decoded) = percent_decode_str(raw_path).decode_utf8() else {
            return Target::NotFound;
        };
        if decoded.split('/').any(|segment| segment == "..") {
            return Target::NotFound;
        }

        // Symlinks are resolved before the containment check.
        let local = self.root.join(decoded.trim_start_matches('/'));
        let Ok(canonical) = local.canonicalize() else {
            return Target::NotFound;
        };
        if !canonical.starts_with(&self.root) {
            return Target::NotFound;
        }

        if canonical.is_file() {
            return Target::File(canonical);
        }
        if !canonical.is_dir() {
            return Target::NotFound;
        }

        if !raw_path.ends_with('/') {
            let location = match query {
                Some(query) => format!("{raw_path}/?{query}"),
                None => format!("{raw_path}/"),
            };
            return Target::Redirect(location);
        }

        let index = canonical.join("index.html");
        if index.is_file() {
            return Target::File(index);
        }

        Target::Listing {
            dir: canonical,
            url_path: decoded.into_owned(),
        }
    }
}

impl Handler for FileServer {
    fn serve(&self, url: &str, out: &mut dyn ResponseWriter) -> Result<()> {
        match self.resolve(url) {
            Target::File(path) => respond_file(&path, out),
            Target::Listing { dir, url_path } => respond_listing(&dir, &url_path, out),
            Target::Redirect(location) => {
                out.headers_mut().set("Location", location);
                respond_text(301, "301 Moved Permanently", out)
            }
            Target::NotFound => respond_text(404, "404 Not Found", out),
        }
    }
}

fn respond_file(path: &Path, out: &mut dyn ResponseWriter) -> Result<()> {
    let body = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .with_context(|| format!("failed to stat {}", path.display()))?;

    let headers = out.headers_mut();
    headers.set("Content-Type", mime::from_path(path));
    headers.set("Content-Length", body.len().to_string());
    headers.set("Last-Modified", http_date(modified));
    headers.set("ETag", etag(modified, body.len() as u64));

    out.write_head(200);
    out.write_body(&body)?;
    Ok(())
}

fn respond_listing(dir: &Path, url_path: &str, out: &mut dyn ResponseWriter) -> Result<()> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .with_context(|| format!("failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if entry.path().is_dir() {
                format!("{name}/")
            } else {
                name
            }
        })
        .collect();
    names.sort();

    let mut entries = String::new();
    if url_path != "/" {
        entries.push_str("<li><a href=\"../\">../</a></li>\n");
    }
    for name in &names {
        let (stem, slash) = match name.strip_suffix('/') {
            Some(stem) => (stem, "/"),
            None => (name.as_str(), ""),
        };
        let href = utf8_percent_encode(stem, HREF_ENCODE_SET);
        entries.push_str(&format!(
            "<li><a href=\"{href}{slash}\">{}</a></li>\n",
            html::escape(name)
        ));
    }

    let body = LISTING_HTML.render(&ListingVars {
        title: html::escape(url_path).into_owned(),
        entries,
    });

    let headers = out.headers_mut();
    headers.set("Content-Type", mime::types::HTML);
    headers.set("Content-Length", body.len().to_string());
    out.write_head(200);
    out.write_body(body.as_bytes())?;
    Ok(())
}

fn respond_text(status: u16, text: &str, out: &mut dyn ResponseWriter) -> Result<()> {
    let headers = out.headers_mut();
    headers.set("Content-Type", mime::types::PLAIN);
    headers.set("Content-Length", text.len().to_string());
    out.write_head(status);
    out.write_body(text.as_bytes())?;
    Ok(())
}

fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

fn etag(modified: SystemTime, len: u64) -> String {
    let secs = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("\"{secs:x}-{len:x}\"")
}
