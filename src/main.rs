use std::process::ExitCode;

fn main() -> ExitCode {
    livingdoc::cli::run()
}
