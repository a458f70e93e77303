mod cli;
mod commands;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use ngscrape_logging::scrape_error;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(&cli.log_destination(), cli.debug);

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            scrape_error!("{err:#}");
            eprintln!("ngscrape: {err:#}");
            ExitCode::FAILURE
        }
    }
}
