//! Chunk resolution: advancing the cursor over the payload one chunk at a
//! time and rendering the operator previews.

use std::fmt;

use crate::capture::CapturedSession;
use crate::classify::{classify, SequenceKind, ESC, MAX_PREVIEW};

/// One resolved chunk of payload, recomputed on every advance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    /// A maximal run of bytes with no escape introducer.
    Text {
        start: usize,
        len: usize,
        /// JSON-quoted, truncated preview of the run.
        preview: String,
    },
    /// A single escape/control sequence.
    Sequence {
        start: usize,
        kind: SequenceKind,
        /// The sequence bytes after ESC, space-separated and escaped.
        rendered: String,
    },
}

impl Chunk {
    pub fn start(&self) -> usize {
        match self {
            Chunk::Text { start, .. } | Chunk::Sequence { start, .. } => *start,
        }
    }

    /// True when the classifier could not find the end of the sequence.
    pub fn is_unrecognized(&self) -> bool {
        matches!(
            self,
            Chunk::Sequence {
                kind: SequenceKind::Unknown,
                ..
            }
        )
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chunk::Text {
                start,
                len,
                preview,
            } => write!(f, "offset {}, {} chars: {}", start, len, preview),
            Chunk::Sequence {
                start,
                kind,
                rendered,
            } if rendered.is_empty() => write!(f, "offset {}, {}", start, kind.tag()),
            Chunk::Sequence {
                start,
                kind,
                rendered,
            } => write!(f, "offset {}, {} {}", start, kind.tag(), rendered),
        }
    }
}

/// Advance the cursor to the next chunk.
///
/// Sets `start = end`, then resolves the new `end` from the byte under the
/// cursor: escape runs via the classifier, text runs by scanning for the next
/// introducer. Returns `None` once the whole payload is consumed. `end`
/// strictly increases on every call short of the terminal state, so repeated
/// advances always make progress.
pub fn advance(capture: &mut CapturedSession) -> Option<Chunk> {
    capture.start = capture.end;
    let start = capture.start;
    let len = capture.payload().len();
    if start >= len {
        return None;
    }

    if capture.payload()[start] == ESC {
        let classification = classify(capture.payload(), start + 1);
        capture.end = classification.end;
        let rendered = render_sequence(&capture.payload()[start + 1..classification.end]);
        Some(Chunk::Sequence {
            start,
            kind: classification.kind,
            rendered,
        })
    } else {
        let end = match capture.payload()[start..].iter().position(|&b| b == ESC) {
            Some(found) => start + found,
            None => len,
        };
        capture.end = end;
        Some(Chunk::Text {
            start,
            len: end - start,
            preview: preview_text(&capture.payload()[start..end]),
        })
    }
}

/// Render sequence bytes the way the operator sees them: one character per
/// byte, space-separated, control bytes escaped JSON-style.
fn render_sequence(bytes: &[u8]) -> String {
    let mut spaced = String::new();
    for (i, &b) in bytes.iter().enumerate() {
        if i > 0 {
            spaced.push(' ');
        }
        spaced.push(b as char);
    }
    let quoted = serde_json::to_string(&spaced).unwrap();
    quoted[1..quoted.len() - 1].to_string()
}

/// Lossy-decode a text run, truncate it for display, and JSON-quote it.
fn preview_text(run: &[u8]) -> String {
    let text = String::from_utf8_lossy(run);
    let truncated: String = if text.chars().count() > MAX_PREVIEW {
        text.chars().take(MAX_PREVIEW).chain("...".chars()).collect()
    } else {
        text.into_owned()
    };
    serde_json::to_string(&truncated).unwrap()
}
