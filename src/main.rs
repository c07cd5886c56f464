use clap::Parser;
use signaldesk::cli::{Cli, run};
use signaldesk::logging::init_logging;

fn main() -> std::process::ExitCode {
    init_logging();
    run(Cli::parse())
}
