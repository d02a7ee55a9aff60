mod auth;
mod cli;
mod error;
mod models;
mod status;
mod webapi;

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use log::{error, info};
use status::ExitStatus;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    info!("Starting web API probe");

    let status = match cli.execute().await {
        Ok(status) => status,
        Err(e) => {
            error!("{e:#}");
            println!("{} - {e}", ExitStatus::Unknown.label());
            ExitStatus::Unknown
        }
    };

    ExitCode::from(status.code())
}
