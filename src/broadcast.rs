//! Fan-out delivery of consumed byte ranges to connected observers.
//!
//! Observers connect over plain TCP (loopback only) and receive the raw
//! bytes with no framing, in connection order. A failing observer is dropped
//! without disturbing the others or the in-progress step.

use std::io::{self, Write};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpListener};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::ScopeError;

/// Default TCP port observers connect to (`nc 127.0.0.1 8383`).
pub const DEFAULT_PORT: u16 = 8383;

/// One connected observer: a blocking byte sink plus the label it is
/// reported by. Boxed so tests can attach in-memory sinks.
struct Client {
    sink: Box<dyn Write + Send>,
    label: String,
}

/// The live observer set, in acceptance order.
///
/// Ordinals reported to the operator ("Client #2 disconnected") are 1-based
/// indexes into that order.
pub struct ClientBroadcaster {
    port: u16,
    clients: Vec<Client>,
}

impl ClientBroadcaster {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            clients: Vec::new(),
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Labels of the connected observers, in acceptance order.
    pub fn client_labels(&self) -> Vec<String> {
        self.clients.iter().map(|c| c.label.clone()).collect()
    }

    /// Attach a pre-built sink. The accept loop uses this for TCP
    /// connections; tests use it to observe broadcasts directly.
    pub fn attach(&mut self, sink: Box<dyn Write + Send>, label: impl Into<String>) {
        self.clients.push(Client {
            sink,
            label: label.into(),
        });
    }

    /// Drop every connected observer.
    pub fn clear(&mut self) {
        self.clients.clear();
    }

    /// Block until the requested number of observers are connected.
    ///
    /// With `grow` false the current set is replaced and `count` is the final
    /// size; with `grow` true the current set is kept and `count` more
    /// connections are awaited. Binding happens before the set is touched, so
    /// a failed bind leaves the existing observers attached.
    pub fn accept_until(&mut self, count: usize, grow: bool) -> Result<(), ScopeError> {
        let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, self.port));
        let listener =
            TcpListener::bind(addr).map_err(|source| ScopeError::Bind { addr, source })?;

        if !grow {
            self.clear();
        }
        let goal = self.clients.len() + count;
        println!("Listening on {}", addr);

        while self.clients.len() < goal {
            println!("Waiting for client {}/{}...", self.clients.len() + 1, goal);
            let (stream, peer) = listener.accept().map_err(ScopeError::Accept)?;
            println!("Remote connected by {}", peer);
            debug!(%peer, "observer connected");
            self.attach(Box::new(stream), peer.to_string());
        }

        Ok(())
    }

    /// Relay `bytes` to every observer.
    ///
    /// Observers are visited in reverse index order so a failed write can be
    /// removed in-loop; the remaining observers still receive the full range.
    /// A non-zero delay sends one byte at a time, sleeping between sends, to
    /// simulate live typing. Pacing affects wall-clock only, never content or
    /// ordering.
    pub fn send(&mut self, bytes: &[u8], delay_ms: u64) {
        if bytes.is_empty() || self.clients.is_empty() {
            return;
        }

        if delay_ms == 0 {
            for idx in (0..self.clients.len()).rev() {
                let result = write_range(&mut self.clients[idx].sink, bytes);
                if let Err(err) = result {
                    self.drop_client(idx, &err);
                }
            }
            return;
        }

        let pause = Duration::from_millis(delay_ms);
        for (sent, byte) in bytes.iter().enumerate() {
            for idx in (0..self.clients.len()).rev() {
                let result = write_range(&mut self.clients[idx].sink, std::slice::from_ref(byte));
                if let Err(err) = result {
                    self.drop_client(idx, &err);
                }
            }
            if sent + 1 < bytes.len() {
                thread::sleep(pause);
            }
        }
    }

    fn drop_client(&mut self, idx: usize, err: &io::Error) {
        let client = self.clients.remove(idx);
        println!("Client #{} ({}) disconnected: {}", idx + 1, client.label, err);
        warn!(client = %client.label, %err, "dropping failed observer");
    }
}

fn write_range<W: Write + ?Sized>(sink: &mut W, bytes: &[u8]) -> io::Result<()> {
    sink.write_all(bytes)?;
    sink.flush()
}
