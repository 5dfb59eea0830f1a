use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use vtscope::shell;
use vtscope::{Config, ReplaySession};

/// Interactive replay scope for debugging terminal emulators.
///
/// Loads a captured terminal session and plays it back, chunk by chunk, to
/// observer terminals connected over TCP (`nc 127.0.0.1 8383`).
#[derive(Parser)]
#[command(name = "vtscope", version, about)]
struct Cli {
    /// Capture file to open before the shell starts.
    capture: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load();
    let mut session = ReplaySession::new(&config);

    // A failed open is reported like the shell command would report it; the
    // loop still starts so the operator can retry.
    if let Some(path) = cli.capture {
        if let Err(err) = session.open(&path) {
            println!("{}", err);
        }
    }

    let interactive = atty::is(atty::Stream::Stdin);
    shell::run(&mut session, io::stdin().lock(), interactive).context("command loop failed")
}
