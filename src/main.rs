mod app;
mod cli;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;
mod store;

use anyhow::Context as _;
use app::App;
use clap::Parser as _;
use cli::{Cli, Commands};
use config::Config;
use datasources::{TelemetrySource, WeatherSource};
use db::Database;
use logic::Advisor;
use models::SettingsUpdate;
use serde::Serialize;
use std::sync::Arc;
use store::{
    HistoryLedger, InMemoryLedger, InMemorySettingsStore, PersistentSettings, SettingsStore,
    ZoneRegistry,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let mut cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.take().unwrap_or(Commands::Recommend);

    let config = match command {
        Commands::Init => {
            let (config, path) = Config::setup_interactive().context("interactive setup failed")?;
            tracing::info!(path = %path.display(), "Configuration written");
            config
        }
        _ => load_config(&cli)?,
    };

    let registry =
        ZoneRegistry::new(config.zones.clone()).context("invalid zone configuration")?;

    let (settings, ledger): (Arc<dyn SettingsStore>, Arc<dyn HistoryLedger>) = if cli.ephemeral {
        tracing::info!("Using in-memory settings and history");
        (
            Arc::new(InMemorySettingsStore::new(config.settings.clone())),
            Arc::new(InMemoryLedger::new()),
        )
    } else {
        let path = Config::db_path(cli.data_dir.as_ref())?;
        let db = Database::open(&path)
            .with_context(|| format!("failed to open database at {}", path.display()))?;
        tracing::info!(path = %db.path().display(), "Using irrigation database");
        (
            Arc::new(PersistentSettings::new(db.clone(), config.settings.clone())),
            Arc::new(db),
        )
    };

    let advisor = Advisor::new(
        TelemetrySource::from_config(&config.telemetry),
        WeatherSource::from_config(&config.weather),
        config.provider_timeout(),
    );
    let app = App::new(registry, settings, ledger, advisor);

    match command {
        Commands::Recommend => print_json(&app.recommendation().await?)?,
        Commands::Zones => print_json(&app.zones()?)?,
        Commands::Settings(args) => {
            let update = SettingsUpdate::from(args);
            if update.is_empty() {
                print_json(&app.settings()?)?
            } else {
                print_json(
                    &app.update_settings(&update)
                        .context("settings were not changed")?,
                )?
            }
        }
        Commands::Start { zones, duration } => print_json(
            &app.start_irrigation(&zones, duration)
                .context("irrigation was not started")?,
        )?,
        Commands::History { days } => print_json(&app.history(days)?)?,
        Commands::Usage => print_json(&app.usage_report()?)?,
        Commands::Rules => {
            let rules: Vec<RuleInfo> = app
                .rules()
                .into_iter()
                .map(|(id, name)| RuleInfo { id, name })
                .collect();
            print_json(&rules)?
        }
        Commands::Init | Commands::Check => {
            let status = app.check_connections().await;
            print_json(&status)?;
            if !status.all_connected() {
                eprintln!("Some data sources are unreachable; recommendations will fall back to estimates.");
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct RuleInfo {
    id: &'static str,
    name: &'static str,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    if cli.config.is_none() && !Config::exists(None) {
        tracing::warn!(
            "No config file found - using the default zones with simulated sensors and weather. Run `irrigation-advisor init` to create one."
        );
        return Ok(Config::default());
    }

    Config::load(cli.config.clone()).context("failed to load configuration")
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
