use std::{process::ExitCode, sync::Arc, time::Instant};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Text};
use tracing::debug;
use weather_alert_core::{
    AutocompleteController, Config, Key, LookupKind, Session, UiState,
};

use crate::{output, suggest::CitySuggester};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-alert", version, about = "Weather alert client")]
pub struct Cli {
    /// Override the configured API base URL, e.g. http://127.0.0.1:5000
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the backend API location.
    Configure,

    /// Show current weather for a city.
    Weather {
        /// City name.
        city: String,
    },

    /// Show current weather and the 5-day forecast for a city.
    Forecast {
        /// City name.
        city: String,
    },

    /// List recent searches.
    Recent {
        /// Look up the current weather for the N-th recent city (1-based).
        #[arg(long)]
        select: Option<usize>,
    },

    /// Show catalog suggestions for a partial city or country name.
    Suggest {
        query: String,
    },

    /// Search interactively with autocomplete until cancelled.
    Search {
        /// Fetch the forecast instead of current conditions.
        #[arg(long)]
        forecast: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let mut config = Config::load()?;
        if let Some(url) = &self.base_url {
            config.set_api_base_url(url)?;
        }
        debug!(command = ?self.command, base_url = %config.api_base_url, "running command");

        match self.command {
            Command::Configure => configure(config),
            Command::Weather { city } => lookup(&config, LookupKind::Current, &city).await,
            Command::Forecast { city } => lookup(&config, LookupKind::Forecast, &city).await,
            Command::Recent { select } => recent(&config, select).await,
            Command::Suggest { query } => {
                let mut controller = AutocompleteController::new(Arc::new(config.catalog()));
                controller.input(query);
                print!("{}", output::dropdown(&controller.dropdown()));
                Ok(ExitCode::SUCCESS)
            }
            Command::Search { forecast } => {
                let kind = if forecast { LookupKind::Forecast } else { LookupKind::Current };
                search(&config, kind).await
            }
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<ExitCode> {
    let url = Text::new("API base URL:")
        .with_default(&config.api_base_url)
        .prompt()
        .context("Failed to read API base URL")?;
    config.set_api_base_url(&url)?;

    let current_timeout =
        config.request_timeout_secs.map(|s| s.to_string()).unwrap_or_default();
    let timeout = Text::new("Request timeout in seconds (blank for none):")
        .with_default(&current_timeout)
        .prompt()
        .context("Failed to read request timeout")?;

    config.request_timeout_secs = match timeout.trim() {
        "" => None,
        secs => Some(
            secs.parse()
                .map_err(|_| anyhow!("Invalid timeout '{secs}': expected a whole number of seconds"))?,
        ),
    };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(ExitCode::SUCCESS)
}

async fn lookup(config: &Config, kind: LookupKind, city: &str) -> anyhow::Result<ExitCode> {
    let mut session = Session::from_config(config)?;
    session.lookup(kind, city).await;
    output::print_session(&session);
    Ok(exit_code(session.state()))
}

async fn recent(config: &Config, select: Option<usize>) -> anyhow::Result<ExitCode> {
    let mut session = Session::from_config(config)?;

    let Some(n) = select else {
        print!("{}", output::recent(&session.recent_chips()));
        return Ok(ExitCode::SUCCESS);
    };

    let index = n.checked_sub(1).ok_or_else(|| anyhow!("Recent cities are numbered from 1"))?;
    if session.select_recent(index).await.is_none() {
        return Err(anyhow!("No recent city #{n}.\nHint: run `weather-alert recent` to list them."));
    }

    output::print_session(&session);
    Ok(exit_code(session.state()))
}

async fn search(config: &Config, kind: LookupKind) -> anyhow::Result<ExitCode> {
    let mut session = Session::from_config(config)?;
    let suggester = CitySuggester::new(session.autocomplete().clone());

    println!("Recent searches:");
    print!("{}", output::recent(&session.recent_chips()));

    loop {
        session.expire_error(Instant::now());
        let city = match Text::new("City:")
            .with_autocomplete(suggester.clone())
            .with_help_message("↑↓ to move, tab to complete, enter to search, esc to quit")
            .prompt()
        {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        session.focus();
        session.input(&city);
        match kind {
            // Enter with nothing selected looks up the raw text.
            LookupKind::Current => {
                session.key(Key::Enter).await;
            }
            LookupKind::Forecast => {
                session.lookup(kind, &city).await;
            }
        }
        session.blur_outside();

        output::print_session(&session);
    }

    Ok(ExitCode::SUCCESS)
}

fn exit_code(state: &UiState) -> ExitCode {
    if state.error().is_some() { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}
