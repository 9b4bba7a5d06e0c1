//! Marquee - Command-line tool for composing and rendering LED sign artwork

use std::process::ExitCode;

use marquee::cli;

fn main() -> ExitCode {
    cli::run()
}
