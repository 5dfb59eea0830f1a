//! vtscope - interactive replay scope for debugging terminal emulators.
//!
//! Loads a captured stream of raw terminal output, segments it into chunks
//! (plain text runs and individual escape sequences), and replays those
//! chunks on command to TCP-connected observer terminals, so the same
//! byte-exact session can be compared across emulators.
//!
//! The scope never interprets what an escape sequence *does*; it only finds
//! chunk boundaries and labels each sequence's category.

pub mod broadcast;
pub mod capture;
pub mod chunk;
pub mod classify;
pub mod config;
pub mod error;
pub mod session;
pub mod shell;

pub use config::Config;
pub use error::ScopeError;
pub use session::{ReplaySession, SeekTarget};
