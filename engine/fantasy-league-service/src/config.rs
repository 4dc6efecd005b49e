//! Configuration management for the fantasy league service

use anyhow::{Context, Result};
use league_service::LeagueConfig;
use scoring_engine::{BonusRules, ScoringConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use transfer_service::TransferConfig;

/// Main service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub data: DataConfig,
    pub logging: LoggingConfig,
    pub scoring: ScoringConfig,
    pub transfers: TransferConfig,
    pub leagues: LeagueConfig,
}

/// Where the scraper drops its JSON output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub data_dir: PathBuf,
    pub players_file: String,
    pub teams_file: String,
    pub stats_file: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            players_file: "players.json".to_string(),
            teams_file: "teams.json".to_string(),
            stats_file: "stats.json".to_string(),
        }
    }
}

impl DataConfig {
    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join(&self.players_file)
    }

    pub fn teams_path(&self) -> PathBuf {
        self.data_dir.join(&self.teams_file)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.data_dir.join(&self.stats_file)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

/// Load configuration. With a file, the file is the base; without one, each
/// component reads its own environment variables. `FANTASY_*` variables
/// override either way.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig> {
    dotenv::dotenv().ok();

    let mut config = match path {
        Some(path) => {
            tracing::debug!("Loading configuration from file: {:?}", path);
            load_from_file(path)?
        }
        None => load_component_defaults()?,
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config)?;

    Ok(config)
}

/// Read a TOML configuration file. Missing keys take their defaults.
pub fn load_from_file(path: &Path) -> Result<ServiceConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path).format(config::FileFormat::Toml).required(true))
        .build()
        .with_context(|| format!("Failed to read configuration file: {:?}", path))?;

    settings
        .try_deserialize::<ServiceConfig>()
        .with_context(|| format!("Invalid configuration in {:?}", path))
}

fn load_component_defaults() -> Result<ServiceConfig> {
    Ok(ServiceConfig {
        scoring: ScoringConfig::from_env().context("Invalid scoring configuration")?,
        transfers: TransferConfig::from_env().context("Invalid transfer configuration")?,
        leagues: LeagueConfig::from_env().context("Invalid league configuration")?,
        ..ServiceConfig::default()
    })
}

/// Apply `FANTASY_*` overrides using `lookup` to read variables
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(level) = lookup("FANTASY_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Some(format) = lookup("FANTASY_LOG_FORMAT") {
        config.logging.format = format;
    }

    if let Some(data_dir) = lookup("FANTASY_DATA_DIR") {
        config.data.data_dir = PathBuf::from(data_dir);
    }

    if let Some(enabled) = lookup("FANTASY_BONUSES_ENABLED") {
        let enabled: bool = enabled.parse().context("Invalid FANTASY_BONUSES_ENABLED")?;
        config.scoring.rules.bonuses = enabled.then(BonusRules::default);
    }

    if let Some(fallback) = lookup("FANTASY_VICE_CAPTAIN_FALLBACK") {
        config.scoring.vice_captain_fallback =
            fallback.parse().context("Invalid FANTASY_VICE_CAPTAIN_FALLBACK")?;
    }

    if let Some(hours) = lookup("FANTASY_OFFER_TTL_HOURS") {
        config.transfers.offer_ttl_hours = hours.parse().context("Invalid FANTASY_OFFER_TTL_HOURS")?;
    }

    if let Some(open) = lookup("FANTASY_TRANSFER_WINDOW_OPEN") {
        config.transfers.window_open = open.parse().context("Invalid FANTASY_TRANSFER_WINDOW_OPEN")?;
    }

    if let Some(max) = lookup("FANTASY_LEAGUE_MAX_PARTICIPANTS") {
        config.leagues.default_max_participants =
            max.parse().context("Invalid FANTASY_LEAGUE_MAX_PARTICIPANTS")?;
    }

    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &ServiceConfig) -> Result<()> {
    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow::anyhow!("Invalid log level: {}", config.logging.level)),
    }

    match config.logging.format.as_str() {
        "json" | "pretty" => {}
        _ => return Err(anyhow::anyhow!("Invalid log format: {}", config.logging.format)),
    }

    for (name, value) in [
        ("players_file", &config.data.players_file),
        ("teams_file", &config.data.teams_file),
        ("stats_file", &config.data.stats_file),
    ] {
        if value.trim().is_empty() {
            return Err(anyhow::anyhow!("data.{} must not be empty", name));
        }
    }

    config.scoring.validate().context("Invalid scoring configuration")?;
    config.transfers.validate().context("Invalid transfer configuration")?;
    config.leagues.validate().context("Invalid league configuration")?;

    Ok(())
}

/// Write configuration as TOML
pub fn save_config(config: &ServiceConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write configuration file: {:?}", path))
}
