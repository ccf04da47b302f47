use clap::Parser;
use trendcast::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
