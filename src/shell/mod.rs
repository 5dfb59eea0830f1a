//! The interactive command loop.
//!
//! Reads one command per line, maps it to a [`ReplaySession`] operation, and
//! prints the result. Errors are reported and the loop keeps going; only
//! `exit` or end of input leaves it.

mod command;

pub use command::{parse, Command};

use std::io::{self, BufRead, Write};

use crate::session::ReplaySession;

const PROMPT: &str = "vtscope> ";

/// Run the command loop until `exit` or end of input.
///
/// The prompt is only printed when `interactive` is set (stdin is a TTY);
/// piped input runs silently. A blank line repeats the previous command line
/// verbatim, and end of input behaves like `exit` was typed.
pub fn run(session: &mut ReplaySession, input: impl BufRead, interactive: bool) -> io::Result<()> {
    let mut lines = input.lines();
    let mut last_line = String::new();

    loop {
        if interactive {
            print!("{}", PROMPT);
            io::stdout().flush()?;
        }

        let Some(line) = lines.next().transpose()? else {
            println!("exit");
            return Ok(());
        };

        let line = if line.trim().is_empty() {
            last_line.clone()
        } else {
            line
        };

        if !dispatch(session, &line) {
            return Ok(());
        }

        last_line = line;
    }
}

/// Parse and execute one command line. Returns false once the loop should
/// stop.
fn dispatch(session: &mut ReplaySession, line: &str) -> bool {
    let command = match command::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return true,
        Err(err) => {
            println!("{}", err);
            return true;
        }
    };

    let result = match command {
        Command::Open(path) => session.open(&path),
        Command::Reset => session.reset(),
        Command::Step(count) => session.step(count),
        Command::ByteStep(count) => session.byte_step(count),
        Command::Seek(target) => session.seek(target),
        Command::Stops => session.list_stops(),
        Command::Accept { count, grow } => session.accept(count, grow),
        Command::Delay(ms) => session.delay(ms),
        Command::Exit => return false,
    };

    if let Err(err) = result {
        println!("{}", err);
    }
    true
}
