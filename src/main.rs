//! qsee - terminal viewer for quantum chemistry input decks

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = qsee::cli::run() {
        eprintln!("Error: {e:#}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
