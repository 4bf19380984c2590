//! Entry point for the quickdupe CLI.

use clap::Parser;
use quickdupe::{cli::Cli, error::ExitCode};

fn main() {
    let cli = Cli::parse();

    match quickdupe::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            eprintln!("[{}] Error: {:#}", ExitCode::GeneralError.code_prefix(), err);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    }
}
