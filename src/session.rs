//! Replay orchestration: the operations behind the shell commands.
//!
//! A [`ReplaySession`] owns the loaded capture, the cursor over it, and the
//! observer set. Everything runs on the single control thread; commands never
//! overlap, so there is no locking anywhere.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::broadcast::ClientBroadcaster;
use crate::capture::CapturedSession;
use crate::chunk;
use crate::config::Config;
use crate::error::ScopeError;

/// Seek destination: a raw payload offset or a 1-based bookmark index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekTarget {
    Offset(usize),
    Bookmark(usize),
}

/// The replay engine driven by the command shell.
pub struct ReplaySession {
    capture: Option<CapturedSession>,
    broadcaster: ClientBroadcaster,
    default_delay_ms: u64,
}

impl ReplaySession {
    pub fn new(config: &Config) -> Self {
        Self {
            capture: None,
            broadcaster: ClientBroadcaster::new(config.network.listen_port),
            default_delay_ms: config.replay.delay_ms,
        }
    }

    pub fn capture(&self) -> Option<&CapturedSession> {
        self.capture.as_ref()
    }

    pub fn broadcaster_mut(&mut self) -> &mut ClientBroadcaster {
        &mut self.broadcaster
    }

    /// Load a capture file, replacing any previous one, and preview the first
    /// chunk. A read failure leaves the previous capture in place.
    pub fn open(&mut self, path: &Path) -> Result<(), ScopeError> {
        let raw = fs::read(path).map_err(|source| ScopeError::CaptureRead {
            path: path.to_path_buf(),
            source,
        })?;

        let byte_count = raw.len();
        let (capture, index) = CapturedSession::from_raw(raw, self.default_delay_ms);
        println!("Read {} bytes from {}.", byte_count, path.display());
        if index.missing_end_marker {
            println!("Capture header has no end marker; treating the whole file as payload.");
            warn!(path = %path.display(), "unterminated capture header");
        }
        if !capture.bookmarks().is_empty() {
            println!("Found {} stops in header.", capture.bookmarks().len());
        }
        if capture.is_empty() {
            println!("Capture has no payload.");
            warn!(path = %path.display(), "empty capture payload");
        }
        info!(
            path = %path.display(),
            bytes = byte_count,
            stops = capture.bookmarks().len(),
            "capture loaded"
        );

        self.capture = Some(capture);
        self.reset()
    }

    /// Rewind the cursor to the start and preview the first chunk.
    pub fn reset(&mut self) -> Result<(), ScopeError> {
        let capture = self.capture.as_mut().ok_or(ScopeError::NoCapture)?;
        capture.start = 0;
        capture.end = 0;
        Self::show_next_chunk(capture);
        Ok(())
    }

    /// Broadcast the current chunk and advance, `count` times.
    pub fn step(&mut self, count: usize) -> Result<(), ScopeError> {
        if self.capture.is_none() {
            return Err(ScopeError::NoCapture);
        }
        for _ in 0..count {
            if !self.step_once() {
                break;
            }
        }
        Ok(())
    }

    /// Move by raw byte count instead of chunk boundaries: clamp the current
    /// range to `count` bytes, then step once.
    pub fn byte_step(&mut self, count: usize) -> Result<(), ScopeError> {
        let capture = self.capture.as_mut().ok_or(ScopeError::NoCapture)?;
        let end = (capture.start + count).min(capture.len());
        capture.end = end;
        self.step(1)
    }

    /// Play forward until `target` has been consumed, broadcasting every
    /// intervening chunk in offset order. Seeking backward replays from the
    /// start.
    pub fn seek(&mut self, target: SeekTarget) -> Result<(), ScopeError> {
        let offset = {
            let capture = self.capture.as_ref().ok_or(ScopeError::NoCapture)?;
            let offset = match target {
                SeekTarget::Offset(offset) => offset,
                SeekTarget::Bookmark(index) => {
                    capture
                        .bookmark(index)
                        .ok_or(ScopeError::BookmarkOutOfRange(index))?
                        .offset
                }
            };
            if offset > capture.len() {
                return Err(ScopeError::SeekPastEnd {
                    target: offset,
                    len: capture.len(),
                });
            }
            offset
        };
        debug!(offset, "seeking");

        // Seeking backward requires replaying from the start. The strict
        // comparison keeps a repeated seek to the same offset a no-op.
        if self
            .capture
            .as_ref()
            .map(|capture| offset < capture.start)
            .unwrap_or(false)
        {
            self.reset()?;
        }

        loop {
            let Some(capture) = self.capture.as_ref() else {
                break;
            };
            if capture.at_end() || capture.end > offset {
                break;
            }
            self.step_once();
        }
        Ok(())
    }

    /// List the bookmarks parsed from the capture header.
    pub fn list_stops(&self) -> Result<(), ScopeError> {
        let capture = self.capture.as_ref().ok_or(ScopeError::NoCapture)?;
        if capture.bookmarks().is_empty() {
            println!("No stops in this capture.");
            return Ok(());
        }
        for (i, stop) in capture.bookmarks().iter().enumerate() {
            println!(
                "%{}: offset {}, {} lines, cursor {},{}",
                i + 1,
                stop.offset,
                stop.lines,
                stop.row,
                stop.column
            );
        }
        Ok(())
    }

    /// Set or report the pacing delay for the loaded capture.
    pub fn delay(&mut self, ms: Option<u64>) -> Result<(), ScopeError> {
        let capture = self.capture.as_mut().ok_or(ScopeError::NoCapture)?;
        match ms {
            Some(ms) => {
                capture.delay_ms = ms;
                println!("Delay set to {} ms.", ms);
            }
            None => println!("Delay is {} ms.", capture.delay_ms),
        }
        Ok(())
    }

    /// Wait for observers to connect; see [`ClientBroadcaster::accept_until`].
    pub fn accept(&mut self, count: usize, grow: bool) -> Result<(), ScopeError> {
        self.broadcaster.accept_until(count, grow)
    }

    /// One broadcast-and-advance cycle. Returns false at the end of data.
    fn step_once(&mut self) -> bool {
        let Some(capture) = self.capture.as_mut() else {
            return false;
        };
        if capture.at_end() {
            println!("Already at end of data.");
            return false;
        }
        let (start, end, delay) = (capture.start, capture.end, capture.delay_ms);
        self.broadcaster.send(&capture.payload()[start..end], delay);
        Self::show_next_chunk(capture)
    }

    /// Advance the cursor and print the operator preview line. Returns false
    /// once the payload is exhausted.
    fn show_next_chunk(capture: &mut CapturedSession) -> bool {
        match chunk::advance(capture) {
            Some(chunk) => {
                if chunk.is_unrecognized() {
                    println!("Unable to find end of escape sequence.");
                    debug!(offset = chunk.start(), "classification miss");
                }
                println!("Next up: {}", chunk);
                true
            }
            None => {
                println!("End of data.");
                false
            }
        }
    }
}
