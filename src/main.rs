use std::process::ExitCode;

fn main() -> ExitCode {
    match netsis::runner::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}
