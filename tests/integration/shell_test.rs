//! CLI tests driving the binary over piped stdin.

use assert_cmd::Command;
use predicates::prelude::*;

use crate::helpers::capture_file;

fn vtscope() -> Command {
    Command::cargo_bin("vtscope").unwrap()
}

#[test]
fn version_flag_prints_and_exits() {
    vtscope()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vtscope"));
}

#[test]
fn stepping_through_a_capture_prints_the_chunk_walk() {
    let file = capture_file(b"\x1b[31mHello\x1b[0m");
    let input = format!("open {}\nstep\nstep\nstep\nstep\nexit\n", file.path().display());

    vtscope()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Read 14 bytes from"))
        .stdout(predicate::str::contains("Next up: offset 0, CSI [ 3 1 m"))
        .stdout(predicate::str::contains("Next up: offset 5, 5 chars: \"Hello\""))
        .stdout(predicate::str::contains("Next up: offset 10, CSI [ 0 m"))
        .stdout(predicate::str::contains("End of data."))
        .stdout(predicate::str::contains("Already at end of data."));
}

#[test]
fn capture_argument_is_opened_before_the_loop() {
    let file = capture_file(b"Hello");

    vtscope()
        .arg(file.path())
        .write_stdin("exit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Read 5 bytes from"))
        .stdout(predicate::str::contains("Next up: offset 0, 5 chars: \"Hello\""));
}

#[test]
fn blank_line_repeats_the_previous_command() {
    let file = capture_file(b"\x1b[31mHello\x1b[0m");
    let input = format!("open {}\nstep\n\nexit\n", file.path().display());

    // The blank line re-runs `step`, landing on the third chunk.
    vtscope()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Next up: offset 10, CSI [ 0 m"));
}

#[test]
fn unknown_command_is_reported_and_loop_continues() {
    vtscope()
        .write_stdin("bogus\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command: \"bogus\""));
}

#[test]
fn end_of_input_behaves_like_exit() {
    vtscope()
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("exit"));
}

#[test]
fn stops_and_bookmark_seek_use_the_header() {
    let file = capture_file(
        b"@@ HEADER_START\n\
          @@ OFFSET:5 LINES:1 CURSOR:0,5\n\
          @@ HEADER_END\n\
          Hi\x1b[0mWorld",
    );
    let input = format!("open {}\nstops\nseek %1\nseek %2\nexit\n", file.path().display());

    vtscope()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 stops in header."))
        .stdout(predicate::str::contains("%1: offset 5, 1 lines, cursor 0,5"))
        .stdout(predicate::str::contains("Next up: offset 2, CSI [ 0 m"))
        .stdout(predicate::str::contains("No such stop: %2"));
}

#[test]
fn seek_past_end_is_reported_without_moving() {
    let file = capture_file(b"Hello");
    let input = format!("open {}\nseek 99\nexit\n", file.path().display());

    vtscope()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Seek past end (offset 99, payload is 5 bytes).",
        ));
}

#[test]
fn unterminated_header_falls_back_to_raw_payload() {
    let file = capture_file(b"@@ HEADER_START\nabc");
    let input = format!("open {}\nexit\n", file.path().display());

    vtscope()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Capture header has no end marker; treating the whole file as payload.",
        ))
        .stdout(predicate::str::contains("Read 19 bytes from"));
}

#[test]
fn commands_without_a_capture_are_user_errors() {
    vtscope()
        .write_stdin("step\ndelay 10\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No capture loaded. Use: open <path>"));
}
