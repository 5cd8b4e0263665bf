//! Save-file format detection.
//!
//! A save may be plain JSON, a gzip envelope around JSON, or the binary
//! record stream. [`detect`] probes in that fixed order, cheapest and least
//! ambiguous first, and never fails: the binary decoder accepts any
//! non-empty buffer, so only an empty input falls through to
//! [`Method::Unknown`].

use std::io::Read;

use flate2::read::GzDecoder;
use serde::Serialize;

use crate::save::decoder::{self, BinaryDecode};

/// Which probe recognized the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Json,
    GzipJson,
    Binary,
    Unknown,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Json => "json",
            Method::GzipJson => "gzip_json",
            Method::Binary => "binary",
            Method::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured document recovered from the raw bytes.
#[derive(Debug, Clone)]
pub enum Document {
    /// JSON value from the plain or gzip probe.
    Json(serde_json::Value),
    /// Decode result from the binary record stream.
    Binary(BinaryDecode),
    /// Nothing recognized the input; only the byte length is known.
    Unrecognized { bytes: usize },
}

/// Probe the raw bytes and return the first decode that succeeds.
///
/// Probe order is fixed: UTF-8 + JSON, gzip + JSON, binary record stream.
/// A valid JSON document is never run through gzip inflation, and the
/// binary path never fails for non-empty input (even a `Truncated` or
/// `Aborted` decode counts as recognition). Pure function of the input.
pub fn detect(data: &[u8]) -> (Document, Method) {
    detect_with_budget(data, decoder::decode)
}

/// [`detect`] with a caller-supplied binary decode, used to thread a
/// non-default record budget through from the CLI.
pub fn detect_with_budget<F>(data: &[u8], decode: F) -> (Document, Method)
where
    F: FnOnce(&[u8]) -> BinaryDecode,
{
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
            return (Document::Json(value), Method::Json);
        }
    }

    let mut inflated = Vec::new();
    if GzDecoder::new(data).read_to_end(&mut inflated).is_ok() {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&inflated) {
            return (Document::Json(value), Method::GzipJson);
        }
    }

    if data.is_empty() {
        return (Document::Unrecognized { bytes: 0 }, Method::Unknown);
    }

    (Document::Binary(decode(data)), Method::Binary)
}
