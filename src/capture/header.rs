//! Optional capture header parsing.
//!
//! Captures may carry a leading header block recorded alongside the raw
//! terminal bytes. Lines matching the bookmark pattern register stop offsets
//! the operator can seek to by index; everything after the end marker line is
//! payload.

use once_cell::sync::Lazy;
use regex::Regex;

/// Marker line opening a header block.
pub const HEADER_START: &str = "@@ HEADER_START";
/// Marker line closing a header block.
pub const HEADER_END: &str = "@@ HEADER_END";

static BOOKMARK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@@ OFFSET:(\d+) LINES:(\d+) CURSOR:(\d+),(\d+)").unwrap());

/// A stop parsed from a capture header, addressed 1-based by the operator.
///
/// Offsets are relative to the payload, not the raw file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bookmark {
    pub offset: usize,
    pub lines: usize,
    pub row: usize,
    pub column: usize,
}

/// Outcome of splitting a raw capture into header and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderIndex {
    /// Byte offset where the payload begins in the raw capture.
    pub payload_start: usize,
    /// Bookmarks in encounter order.
    pub bookmarks: Vec<Bookmark>,
    /// The start marker was present but the end marker was missing, so the
    /// whole capture was treated as payload.
    pub missing_end_marker: bool,
}

/// Split `raw` into header and payload.
///
/// No start marker: the whole input is payload, no bookmarks. A start marker
/// without an end marker is a recoverable format error: the whole input is
/// still payload and `missing_end_marker` is set so the caller can surface a
/// diagnostic. Header lines that do not match the bookmark pattern are
/// skipped.
pub fn parse(raw: &[u8]) -> HeaderIndex {
    if !raw.starts_with(HEADER_START.as_bytes()) {
        return HeaderIndex {
            payload_start: 0,
            bookmarks: Vec::new(),
            missing_end_marker: false,
        };
    }

    let Some(end_at) = find(raw, HEADER_END.as_bytes(), 0) else {
        return HeaderIndex {
            payload_start: 0,
            bookmarks: Vec::new(),
            missing_end_marker: true,
        };
    };

    // Payload begins after the end-marker line.
    let after_marker = end_at + HEADER_END.len();
    let payload_start = match find(raw, b"\n", after_marker) {
        Some(newline) => newline + 1,
        None => raw.len(),
    };

    let header = String::from_utf8_lossy(&raw[..end_at]);
    let bookmarks = header
        .lines()
        .filter_map(|line| {
            let caps = BOOKMARK_LINE.captures(line)?;
            Some(Bookmark {
                offset: caps[1].parse().ok()?,
                lines: caps[2].parse().ok()?,
                row: caps[3].parse().ok()?,
                column: caps[4].parse().ok()?,
            })
        })
        .collect();

    HeaderIndex {
        payload_start,
        bookmarks,
        missing_end_marker: false,
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|at| from + at)
}
