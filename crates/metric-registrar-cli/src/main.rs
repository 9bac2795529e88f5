use clap::Parser;
use std::process::ExitCode;

mod cf;
mod cli;
mod config;
mod handlers;
mod hints;
mod logging;
mod style;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose);

    let settings = config::Settings::from_cli(&cli);
    match handlers::run(&cli.command, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{} {e}", style::CROSS);
            ExitCode::FAILURE
        }
    }
}
