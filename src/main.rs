use clap::Parser;
use markguard::cli::{Cli, EXIT_ERROR, Output};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let quiet = cli.quiet;

    match cli.run().await {
        Ok(code) => code,
        Err(err) => {
            Output::new(quiet).error(&format!("{err:#}"));
            ExitCode::from(EXIT_ERROR)
        }
    }
}
