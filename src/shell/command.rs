//! Command-line parsing for the interactive shell.
//!
//! Verbs are a closed set, matched case-sensitively. Parsing is separate
//! from execution so argument errors never touch session state.

use std::path::PathBuf;

use crate::error::ScopeError;
use crate::session::SeekTarget;

/// One parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(PathBuf),
    Reset,
    Step(usize),
    ByteStep(usize),
    Seek(SeekTarget),
    Stops,
    Accept { count: usize, grow: bool },
    Delay(Option<u64>),
    Exit,
}

/// Parse one command line. Returns `None` for blank input, which the loop
/// treats as "repeat the previous line".
pub fn parse(line: &str) -> Result<Option<Command>, ScopeError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let command = match verb {
        "open" => {
            let path = arg.ok_or(ScopeError::MissingArgument("open <path>"))?;
            Command::Open(PathBuf::from(path))
        }
        "reset" => Command::Reset,
        "step" => Command::Step(optional_count(arg)?),
        "bstep" => Command::ByteStep(optional_count(arg)?),
        "seek" => {
            let arg = arg.ok_or(ScopeError::MissingArgument("seek <offset> | seek %<stop>"))?;
            let target = match arg.strip_prefix('%') {
                Some(index) => SeekTarget::Bookmark(parse_number(index, "a stop index")?),
                None => SeekTarget::Offset(parse_number(arg, "a byte offset")?),
            };
            Command::Seek(target)
        }
        "stops" => Command::Stops,
        "accept" => {
            let arg = arg.ok_or(ScopeError::MissingArgument("accept <n> | accept +<n>"))?;
            match arg.strip_prefix('+') {
                Some(more) => Command::Accept {
                    count: parse_number(more, "a client count")?,
                    grow: true,
                },
                None => Command::Accept {
                    count: parse_number(arg, "a client count")?,
                    grow: false,
                },
            }
        }
        "delay" => Command::Delay(arg.map(|ms| parse_number(ms, "milliseconds")).transpose()?),
        "exit" => Command::Exit,
        other => return Err(ScopeError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

fn optional_count(arg: Option<&str>) -> Result<usize, ScopeError> {
    arg.map(|n| parse_number(n, "a count")).transpose().map(|n| n.unwrap_or(1))
}

fn parse_number<T: std::str::FromStr>(value: &str, expected: &'static str) -> Result<T, ScopeError> {
    value.parse().map_err(|_| ScopeError::InvalidArgument {
        value: value.to_string(),
        expected,
    })
}
