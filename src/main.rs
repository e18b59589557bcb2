//! career-span - career duration calculator

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = career_span::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
