use crate::models::SettingsUpdate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "irrigation-advisor",
    version,
    about = "Irrigation decisions from soil telemetry and weather"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Keep settings and history in memory for this run only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the current irrigation recommendation (default)
    Recommend,
    /// List zones with their last irrigation and whether they are running
    Zones,
    /// Show settings, or change them when any flag is given
    Settings(SettingsArgs),
    /// Record a manual irrigation run
    Start {
        /// Zone id to water; repeat or comma-separate for several
        #[arg(short, long = "zone", required = true, value_delimiter = ',')]
        zones: Vec<u32>,
        /// Run length in minutes
        #[arg(long)]
        duration: f64,
    },
    /// Show the most recent irrigation runs
    History {
        #[arg(long, default_value_t = 7)]
        days: usize,
    },
    /// Today's water use compared with yesterday and the past week
    Usage,
    /// List the decision rules in evaluation order
    Rules,
    /// Re-run interactive setup
    Init,
    /// Validate config and test connections
    Check,
}

#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    #[arg(long)]
    pub auto_mode: Option<bool>,
    /// Irrigate below this soil moisture (%)
    #[arg(long)]
    pub moisture_threshold: Option<f64>,
    /// Heat stress above this air temperature (°C)
    #[arg(long)]
    pub temperature_threshold: Option<f64>,
    /// Daily water ceiling in litres
    #[arg(long)]
    pub max_daily_water: Option<f64>,
    #[arg(long)]
    pub conservation_mode: Option<bool>,
}

impl From<SettingsArgs> for SettingsUpdate {
    fn from(args: SettingsArgs) -> Self {
        SettingsUpdate {
            auto_mode: args.auto_mode,
            moisture_threshold_pct: args.moisture_threshold,
            temperature_threshold_c: args.temperature_threshold,
            max_daily_water_liters: args.max_daily_water,
            conservation_mode: args.conservation_mode,
        }
    }
}
