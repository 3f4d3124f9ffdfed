use std::process::ExitCode;

fn main() -> ExitCode {
    match subsetter::apps::run_create_subset(std::env::args().skip(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
