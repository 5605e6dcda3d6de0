use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forecast_core::{
    BoardState, Config, ConnectivityGate, ForecastBoard, ForecastService, StaticConnectivity,
    fetcher::{fetcher_from_config, openweather::DEFAULT_BASE_URL},
};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Multi-day weather forecast CLI")]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and endpoint.
    Configure,

    /// Show the forecast for a location.
    Show {
        /// "city[,country-code]", e.g. "London,uk".
        query: String,

        /// Print the forecast as JSON instead of a table.
        #[arg(long)]
        json: bool,

        /// Skip the network reachability check.
        #[arg(long)]
        assume_online: bool,
    },

    /// Search forecasts interactively. Each query loads in the background
    /// and results are printed as they arrive.
    Search {
        /// Skip the network reachability check.
        #[arg(long)]
        assume_online: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { query, json, assume_online } => show(&query, json, assume_online).await,
            Command::Search { assume_online } => search(assume_online).await,
        }
    }
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Logs go to stderr so `show --json` output stays machine-readable.
/// `RUST_LOG` wins over `-v` when set.
pub fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter_from_verbosity(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_service(assume_online: bool) -> Result<ForecastService> {
    let config = Config::load()?;
    let fetcher = fetcher_from_config(&config)?;

    let gate: Arc<dyn ConnectivityGate> = if assume_online {
        Arc::new(StaticConnectivity::ONLINE)
    } else {
        Arc::new(config.route_probe())
    };

    Ok(ForecastService::new(gate, Arc::new(fetcher)))
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let current_url = config.base_url().to_string();
    let base_url = Text::new("API base URL:")
        .with_default(&current_url)
        .prompt()
        .context("Failed to read API base URL")?;
    let base_url = base_url.trim();
    config.base_url = (base_url != DEFAULT_BASE_URL).then(|| base_url.to_string());

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

async fn show(query: &str, json: bool, assume_online: bool) -> Result<()> {
    let service = build_service(assume_online)?;
    let forecast = service.load_forecast(query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&forecast)?);
    } else {
        print!("{}", output::render_table(query, &forecast));
    }

    Ok(())
}

async fn search(assume_online: bool) -> Result<()> {
    let board = ForecastBoard::new(build_service(assume_online)?);

    let mut updates = board.subscribe();
    let printer = tokio::spawn(async move {
        let mut shown = BoardState::default();
        while updates.changed().await.is_ok() {
            let current = updates.borrow_and_update().clone();
            if let Some(text) = output::render_update(&shown, &current) {
                print!("{text}");
            }
            shown = current;
        }
    });

    loop {
        let input = tokio::task::spawn_blocking(|| {
            Text::new("City[,country-code]:")
                .with_help_message("empty line or Esc to quit")
                .prompt()
        })
        .await?;

        let query = match input {
            Ok(query) => query,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read query"),
        };

        let query = query.trim();
        if query.is_empty() {
            break;
        }

        debug!(%query, "Submitting forecast query");
        // Detached: the board publishes the result whenever it arrives.
        drop(board.submit(query));
    }

    printer.abort();
    Ok(())
}
