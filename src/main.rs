mod calc;
mod commands;
mod weather;

use std::process::ExitCode;

use benri_core::{App, AppError};
use clap::Parser;

use commands::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {} ({})", e.user_message(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    benri_core::init()?;

    let mut app = App::new(cli.config.as_deref())?;
    app.initialize()?;

    let result = match &cli.command {
        Commands::Calc(args) => calc::run(app.config(), args),
        Commands::Weather(command) => weather::run(&app, command).await,
    };

    app.shutdown()?;
    result
}
