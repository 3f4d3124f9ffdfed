use std::process::ExitCode;

fn main() -> ExitCode {
    match subsetter::apps::run_verify_subset(std::env::args().skip(1)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
