use clap::Parser;
use crossrank::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
