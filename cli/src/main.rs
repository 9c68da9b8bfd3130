//! Binary entrypoint for fontinfo-cli

use std::process::ExitCode;

use fontinfo_cli::RunOutcome;

fn main() -> ExitCode {
    match fontinfo_cli::run() {
        Ok(RunOutcome::Written { .. }) => ExitCode::SUCCESS,
        Ok(RunOutcome::Cancelled) => ExitCode::from(130),
        Err(err) => {
            eprintln!("error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
