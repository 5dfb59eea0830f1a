//! Operator-facing error types.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Errors reported to the operator by shell commands.
///
/// Every variant leaves session state unchanged; the command loop prints the
/// message and keeps running.
#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    #[error("Missing argument. Usage: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid argument \"{value}\": expected {expected}")]
    InvalidArgument {
        value: String,
        expected: &'static str,
    },

    #[error("Unknown command: \"{0}\"")]
    UnknownCommand(String),

    #[error("No capture loaded. Use: open <path>")]
    NoCapture,

    #[error("Seek past end (offset {target}, payload is {len} bytes).")]
    SeekPastEnd { target: usize, len: usize },

    #[error("No such stop: %{0}")]
    BookmarkOutOfRange(usize),

    #[error("Failed to read {path}: {source}")]
    CaptureRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Accept failed: {0}")]
    Accept(#[source] io::Error),
}
