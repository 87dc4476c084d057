//! Football player performance dataset builder
//!
//! Aggregates raw per-match event logs into per-player, per-season statistics
//! and prepares the market-value, injury, and sentiment tables that downstream
//! modeling merges them with.

pub mod aggregate;
pub mod data;
pub mod enrich;
pub mod export;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchId(pub i64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Composite season key built from competition and season names.
///
/// Not unique across differently-named inputs; treated as opaque.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeasonLabel(String);

impl SeasonLabel {
    /// Build the label from its two parts, e.g. `"Premier League_2019/2020"`.
    pub fn new(competition_name: &str, season_name: &str) -> Self {
        SeasonLabel(format!("{}_{}", competition_name, season_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeasonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of one accumulator row: a player within a season.
///
/// The derived ordering (player name, then season) is the output table order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerSeasonKey {
    pub player_name: String,
    pub season: SeasonLabel,
}

impl PlayerSeasonKey {
    pub fn new(player_name: &str, season: &SeasonLabel) -> Self {
        PlayerSeasonKey {
            player_name: player_name.to_string(),
            season: season.clone(),
        }
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed document {path}: {source}")]
    MalformedFile {
        path: String,
        source: serde_json::Error,
    },

    #[error("Event file name is not an integer match id: {0}")]
    BadEventFilename(String),

    #[error("Missing column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ScoutError>;

/// Application configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub aggregate: AggregateConfig,
    pub sentiment: SentimentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory of match-metadata documents (scanned recursively)
    pub matches_dir: String,
    /// Directory of per-match event documents named `<match_id>.json`
    pub events_dir: String,
    /// Directory that pipeline artifacts are written to
    pub output_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateConfig {
    /// Skip unreadable event files instead of aborting the run
    pub skip_malformed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Valence lexicon file (`token<TAB>valence` lines)
    pub lexicon_path: String,
    /// Compound score at or above which a text counts as positive
    pub positive_threshold: f64,
    /// Compound score at or below which a text counts as negative
    pub negative_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: DataConfig {
                matches_dir: "data/matches".to_string(),
                events_dir: "data/events".to_string(),
                output_dir: "out".to_string(),
            },
            aggregate: AggregateConfig {
                skip_malformed: false,
            },
            sentiment: SentimentConfig {
                lexicon_path: "data/vader_lexicon.txt".to_string(),
                positive_threshold: 0.05,
                negative_threshold: -0.05,
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScoutError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| ScoutError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ScoutError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
