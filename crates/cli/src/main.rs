use std::process::ExitCode;

use clap::Parser;
use env_logger::init;
use readify_font_cli::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    init();
    match Cli::parse().command.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
