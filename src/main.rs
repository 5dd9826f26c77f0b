//! Binary entrypoint for the `rosport` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Recording is handled in commands::dispatch via ROSPORT_RECORD=<file>.
    match rosport::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("rosport: {err:#}");
            ExitCode::FAILURE
        }
    }
}
