// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Hitstand CLI client.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::{fs, io, path::PathBuf, time::Duration};

use hitstand_core::{
    Config,
    client::{ADVICE_URL, TOKEN_URL},
};

pub mod terminal;

#[derive(Debug, Parser)]
struct Cli {
    /// The advice endpoint url.
    #[clap(long, default_value = ADVICE_URL)]
    advice_url: String,
    /// The token endpoint url.
    #[clap(long, default_value = TOKEN_URL)]
    token_url: String,
    /// The directory for the saved hands and token.
    #[clap(long, short)]
    data_dir: Option<PathBuf>,
    /// Minimum milliseconds between two consults.
    #[clap(long, default_value_t = 3000)]
    delay_ms: u64,
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch and save a new API token.
    Install,
    /// Print the saved hands and their totals.
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config {
        advice_url: cli.advice_url,
        token_url: cli.token_url,
        request_delay: Duration::from_millis(cli.delay_ms),
        data_dir: cli.data_dir,
    };

    let data_dir = config.data_dir()?;
    config.data_dir = Some(data_dir.clone());

    // The interactive terminal owns the screen, send logs to a file.
    let mut logger = env_logger::builder();
    logger
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .parse_default_env();

    if cli.command.is_none() {
        fs::create_dir_all(&data_dir)?;
        let log_path = data_dir.join("hitstand.log");
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Cannot open log file {}", log_path.display()))?;
        logger.target(env_logger::Target::Pipe(Box::new(file)));
    }

    logger.init();

    info!("Starting with config: {config:?}");

    let client = config.http_client();
    let mut session = config.open_session()?;

    match cli.command {
        Some(Command::Install) => {
            session.refresh_token(&client).await?;
            println!("Token saved");
        }
        Some(Command::Show) => {
            terminal::print_hands(&mut io::stdout(), &session)?;
        }
        None => {
            // Fetch the token the first time the client runs.
            session.ensure_token(&client).await;
            terminal::run(session, client).await?;
        }
    }

    Ok(())
}
