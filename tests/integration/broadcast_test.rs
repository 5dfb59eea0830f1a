//! Live TCP tests for the accept loop and fan-out delivery.
//!
//! Each test uses its own port so they can run in parallel.

use std::io::{self, Read};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use crate::helpers::capture_file;
use vtscope::{Config, ReplaySession, ScopeError};

fn session_on_port(port: u16) -> ReplaySession {
    let mut config = Config::default();
    config.network.listen_port = port;
    ReplaySession::new(&config)
}

/// Connect to the scope from a background thread, retrying until the
/// listener is up. `accept_until` blocks the test thread, so the connection
/// has to come from somewhere else.
fn connect_soon(port: u16) -> thread::JoinHandle<TcpStream> {
    thread::spawn(move || {
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        for _ in 0..200 {
            if let Ok(stream) = TcpStream::connect(addr) {
                return stream;
            }
            thread::sleep(Duration::from_millis(10));
        }
        panic!("listener never came up on port {}", port);
    })
}

#[test]
fn accepted_observers_receive_broadcast_bytes() {
    let mut session = session_on_port(18483);
    let file = capture_file(b"\x1b[31mHello");
    session.open(file.path()).unwrap();

    let first = connect_soon(18483);
    let second = connect_soon(18483);
    session.accept(2, false).unwrap();
    assert_eq!(session.broadcaster_mut().client_count(), 2);

    session.step(1).unwrap();

    for pending in [first, second] {
        let mut stream = pending.join().unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let mut buf = [0u8; 5];
        stream.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"\x1b[31m");
    }
}

#[test]
fn grow_accept_keeps_existing_observers_in_order() {
    let mut session = session_on_port(18484);
    session
        .broadcaster_mut()
        .attach(Box::new(io::sink()), "first");
    session
        .broadcaster_mut()
        .attach(Box::new(io::sink()), "second");

    let pending = connect_soon(18484);
    session.accept(1, true).unwrap();
    let _stream = pending.join().unwrap();

    let labels = session.broadcaster_mut().client_labels();
    assert_eq!(labels.len(), 3);
    assert_eq!(&labels[..2], &["first".to_string(), "second".to_string()]);
}

#[test]
fn failed_bind_leaves_existing_observers_attached() {
    let busy = TcpListener::bind(("127.0.0.1", 18485)).unwrap();

    let mut session = session_on_port(18485);
    session
        .broadcaster_mut()
        .attach(Box::new(io::sink()), "kept");

    let err = session.accept(1, false).unwrap_err();
    assert!(matches!(err, ScopeError::Bind { .. }));
    assert_eq!(session.broadcaster_mut().client_count(), 1);

    drop(busy);
}
