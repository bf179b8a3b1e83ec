//! Raw header block parsing and header serialization.
//!
//! The request bridge reports response headers as a single folded string and
//! accepts request headers as a flat string map. This module converts between
//! those shapes and [`http::HeaderMap`].

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use http::{HeaderMap, HeaderName, HeaderValue};

/// Parses a raw response header block into a [`HeaderMap`].
///
/// Lines may be separated by `\r\n` or bare `\n`. RFC 7230 §3.2 line
/// continuations (a newline followed by at least one space or horizontal tab)
/// are collapsed into a single space first, so folded values parse the same
/// whichever newline flavor folded them. The remainder is split on `\r`
/// alone, with a leftover leading `\n` stripped from each fragment.
///
/// Repeated keys accumulate in order rather than overwriting. Lines whose key
/// is empty after trimming are dropped, as are names or values outside what
/// [`http`] accepts.
#[must_use]
pub fn parse_raw_headers(raw: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for fragment in collapse_continuations(raw).split('\r') {
        let line = fragment.strip_prefix('\n').unwrap_or(fragment);
        let (key, value) = split_header_line(line);
        if key.is_empty() {
            continue;
        }
        let Ok(name) = HeaderName::from_bytes(key.as_bytes()) else {
            continue;
        };
        let Ok(value) = HeaderValue::from_str(value) else {
            continue;
        };
        headers.append(name, value);
    }

    headers
}

/// Serializes a [`HeaderMap`] into the flat mapping the bridge accepts.
///
/// Iterates the collection in its own order. The mapping cannot represent
/// repetition, so repeated keys are comma-joined the way the standard header
/// collection merges them on read.
#[must_use]
pub fn headers_to_map(headers: &HeaderMap) -> HashMap<String, String> {
    let mut map: HashMap<String, String> = HashMap::new();

    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        match map.entry(name.as_str().to_owned()) {
            Entry::Occupied(mut entry) => {
                let joined = entry.get_mut();
                joined.push_str(", ");
                joined.push_str(&value);
            }
            Entry::Vacant(entry) => {
                entry.insert(value.into_owned());
            }
        }
    }

    map
}

/// Collapses each `\r?\n[\t ]+` continuation sequence into a single space.
fn collapse_continuations(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let newline_len = match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => 2,
            b'\n' => 1,
            _ => 0,
        };
        if newline_len > 0 && matches!(bytes.get(i + newline_len), Some(b' ' | b'\t')) {
            i += newline_len;
            while matches!(bytes.get(i), Some(b' ' | b'\t')) {
                i += 1;
            }
            out.push(b' ');
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    // Only single-byte ASCII was removed or inserted, so the bytes stay
    // valid UTF-8.
    String::from_utf8_lossy(&out).into_owned()
}

/// Splits a header line on the first `:`, trimming both halves.
///
/// A line without a colon yields the whole trimmed line as the key and an
/// empty value.
fn split_header_line(line: &str) -> (&str, &str) {
    match line.split_once(':') {
        Some((key, value)) => (key.trim(), value.trim()),
        None => (line.trim(), ""),
    }
}
