//! Market-value table preparation
//!
//! Joins the Transfermarkt-style CSV exports (players, valuations,
//! appearances, games, competitions, transfers) into one row per player per
//! season: summed appearance stats, the latest market valuation of the
//! season, summed transfer fees, and the player's age.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::enrich::read_rows;
use crate::Result;

/// Input file locations for the market stage
#[derive(Debug, Clone)]
pub struct MarketPaths {
    pub players: PathBuf,
    pub valuations: PathBuf,
    pub appearances: PathBuf,
    pub games: PathBuf,
    pub competitions: PathBuf,
    pub transfers: PathBuf,
}

impl MarketPaths {
    /// Conventional file names inside one dataset directory
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        MarketPaths {
            players: dir.join("players.csv"),
            valuations: dir.join("player_valuations.csv"),
            appearances: dir.join("appearances.csv"),
            games: dir.join("games.csv"),
            competitions: dir.join("competitions.csv"),
            transfers: dir.join("transfers.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct PlayerRow {
    player_id: i64,
    name: String,
    date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
struct ValuationRow {
    player_id: i64,
    date: NaiveDate,
    market_value_in_eur: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct AppearanceRow {
    player_id: i64,
    game_id: i64,
    minutes_played: Option<u32>,
    goals: Option<u32>,
    assists: Option<u32>,
    yellow_cards: Option<u32>,
    red_cards: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
struct GameRow {
    game_id: i64,
    season: i32,
    competition_id: String,
    date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
struct CompetitionRow {
    competition_id: String,
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct TransferRow {
    player_id: i64,
    transfer_date: Option<NaiveDate>,
    transfer_fee: Option<f64>,
}

/// One row of market_values.csv
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRow {
    pub player_id: i64,
    pub player_name: String,
    /// Season start year (2019 means the 2019/2020 season)
    pub season: i32,
    pub minutes_played: u32,
    pub goals: u32,
    pub assists: u32,
    pub yellow_cards: u32,
    pub red_cards: u32,
    /// Competition of the player's earliest game that season
    pub competition_name: String,
    pub market_value_in_eur: f64,
    pub transfer_fee: f64,
    pub age: i32,
}

/// Diagnostics for one market-stage run
#[derive(Debug, Clone, Default)]
pub struct MarketReport {
    pub appearances_read: usize,
    /// Appearances referencing a game id absent from games.csv
    pub appearances_unmatched: usize,
    pub rows: usize,
}

/// Map a calendar date to its European season start year.
///
/// July through December belong to the season starting that year; January
/// through June to the season started the year before.
pub fn season_start_year(date: NaiveDate) -> i32 {
    if date.month() >= 7 {
        date.year()
    } else {
        date.year() - 1
    }
}

#[derive(Debug, Default)]
struct PerfAgg {
    minutes_played: u32,
    goals: u32,
    assists: u32,
    yellow_cards: u32,
    red_cards: u32,
    /// Earliest (date, game id, competition id) seen, for the competition column
    first_game: Option<(NaiveDate, i64, String)>,
}

/// Build market_values.csv from the input tables; returns run diagnostics.
pub fn build_market_table<P: AsRef<Path>>(paths: &MarketPaths, out: P) -> Result<MarketReport> {
    let players: Vec<PlayerRow> = read_rows(&paths.players)?;
    let valuations: Vec<ValuationRow> = read_rows(&paths.valuations)?;
    let appearances: Vec<AppearanceRow> = read_rows(&paths.appearances)?;
    let games: Vec<GameRow> = read_rows(&paths.games)?;
    let competitions: Vec<CompetitionRow> = read_rows(&paths.competitions)?;
    let transfers: Vec<TransferRow> = read_rows(&paths.transfers)?;

    let mut report = MarketReport {
        appearances_read: appearances.len(),
        ..MarketReport::default()
    };

    let games_by_id: HashMap<i64, &GameRow> = games.iter().map(|g| (g.game_id, g)).collect();
    let competition_names: HashMap<&str, &str> = competitions
        .iter()
        .map(|c| (c.competition_id.as_str(), c.name.as_str()))
        .collect();
    let players_by_id: HashMap<i64, &PlayerRow> =
        players.iter().map(|p| (p.player_id, p)).collect();

    // Appearance stats per (player, season)
    let mut perf: HashMap<(i64, i32), PerfAgg> = HashMap::new();
    for row in &appearances {
        let Some(game) = games_by_id.get(&row.game_id) else {
            report.appearances_unmatched += 1;
            continue;
        };
        let agg = perf.entry((row.player_id, game.season)).or_default();
        agg.minutes_played += row.minutes_played.unwrap_or(0);
        agg.goals += row.goals.unwrap_or(0);
        agg.assists += row.assists.unwrap_or(0);
        agg.yellow_cards += row.yellow_cards.unwrap_or(0);
        agg.red_cards += row.red_cards.unwrap_or(0);

        // Undated games sort after every dated one
        let candidate = (
            game.date.unwrap_or(NaiveDate::MAX),
            game.game_id,
            game.competition_id.clone(),
        );
        match &agg.first_game {
            Some(first) if (first.0, first.1) <= (candidate.0, candidate.1) => {}
            _ => agg.first_game = Some(candidate),
        }
    }

    // Latest valuation per (player, season); later input rows win on date ties
    let mut latest_valuation: HashMap<(i64, i32), (NaiveDate, f64)> = HashMap::new();
    for row in &valuations {
        let key = (row.player_id, season_start_year(row.date));
        match latest_valuation.get(&key) {
            Some((date, _)) if *date > row.date => {}
            _ => {
                latest_valuation.insert(key, (row.date, row.market_value_in_eur));
            }
        }
    }

    // Transfer fee sums per (player, season); undatable transfers are dropped
    let mut transfer_fees: HashMap<(i64, i32), f64> = HashMap::new();
    for row in &transfers {
        let Some(date) = row.transfer_date else {
            continue;
        };
        *transfer_fees
            .entry((row.player_id, season_start_year(date)))
            .or_default() += row.transfer_fee.unwrap_or(0.0);
    }

    let mut keys: Vec<(i64, i32)> = perf.keys().copied().collect();
    keys.sort();

    let mut writer = csv::Writer::from_path(out.as_ref())?;
    for key in keys {
        let (player_id, season) = key;
        // Market value is the target downstream; seasons without one are dropped
        let Some((_, market_value)) = latest_valuation.get(&key) else {
            continue;
        };
        let Some(player) = players_by_id.get(&player_id) else {
            continue;
        };
        let Some(birth) = player.date_of_birth else {
            continue;
        };
        let age = season - birth.year();
        if !(15..=45).contains(&age) {
            continue;
        }

        let agg = &perf[&key];
        let competition_name = agg
            .first_game
            .as_ref()
            .map(|(_, _, id)| {
                competition_names
                    .get(id.as_str())
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| id.clone())
            })
            .unwrap_or_default();

        writer.serialize(MarketRow {
            player_id,
            player_name: player.name.clone(),
            season,
            minutes_played: agg.minutes_played,
            goals: agg.goals,
            assists: agg.assists,
            yellow_cards: agg.yellow_cards,
            red_cards: agg.red_cards,
            competition_name,
            market_value_in_eur: *market_value,
            transfer_fee: transfer_fees.get(&key).copied().unwrap_or(0.0),
            age,
        })?;
        report.rows += 1;
    }
    writer.flush()?;

    log::info!(
        "Market table: {} rows from {} appearances ({} without a game)",
        report.rows,
        report.appearances_read,
        report.appearances_unmatched
    );
    Ok(report)
}
