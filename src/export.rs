//! Output sink
//!
//! Sorts the finished accumulator table into its deterministic output order
//! and serializes it to CSV. Diagnostics stay out of the table; the CLI
//! reports them separately.

use crate::aggregate::PlayerSeasonStats;
use crate::{PlayerSeasonKey, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// One row of the aggregated performance table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsRow {
    pub player_name: String,
    pub season: String,
    pub matches_played: u32,
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
    pub xg: f64,
    pub passes: u32,
    pub pass_completed: u32,
    pub tackles: u32,
    pub interceptions: u32,
    pub dribbles_completed: u32,
    pub minutes_played: u32,
    pub pass_accuracy: f64,
}

impl StatsRow {
    fn new(key: &PlayerSeasonKey, stats: &PlayerSeasonStats) -> Self {
        StatsRow {
            player_name: key.player_name.clone(),
            season: key.season.to_string(),
            matches_played: stats.matches_played,
            goals: stats.goals,
            assists: stats.assists,
            shots: stats.shots,
            xg: stats.xg,
            passes: stats.passes,
            pass_completed: stats.pass_completed,
            tackles: stats.tackles,
            interceptions: stats.interceptions,
            dribbles_completed: stats.dribbles_completed,
            minutes_played: stats.minutes_played,
            pass_accuracy: stats.pass_accuracy(),
        }
    }
}

/// Materialize the table as rows sorted by (player name, season)
pub fn sorted_rows(table: &HashMap<PlayerSeasonKey, PlayerSeasonStats>) -> Vec<StatsRow> {
    let mut keys: Vec<&PlayerSeasonKey> = table.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|key| StatsRow::new(key, &table[key]))
        .collect()
}

/// Write the table to `path`; returns the number of rows written
pub fn write_stats_csv<P: AsRef<Path>>(
    path: P,
    table: &HashMap<PlayerSeasonKey, PlayerSeasonStats>,
) -> Result<usize> {
    let rows = sorted_rows(table);
    let mut writer = csv::Writer::from_path(path)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(rows.len())
}
