mod commands;
mod config;
mod error;
mod prompt;
mod render;

use std::process::ExitCode;

use clap::Parser;
use client::Client;

use crate::{
    commands::Cli,
    error::{AppError, Result},
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = config::load(&cli.global)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "finman_cli={level},client={level}",
            level = settings.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    let client = Client::builder()
        .base_url(&settings.base_url)
        .timeout(settings.timeout())
        .session_path(&settings.session_path)
        .build()?;

    let needs_session = cli.command.needs_session();
    match commands::run(&client, cli.command).await {
        Err(AppError::Client(err)) if needs_session && err.is_unauthorized() => {
            tracing::debug!("server rejected the stored credentials: {err}");
            if let Err(err) = client.session().clear().await {
                tracing::warn!("failed to clear session: {err}");
            }
            Err(AppError::NotLoggedIn)
        }
        other => other,
    }
}
