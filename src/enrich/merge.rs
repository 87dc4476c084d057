//! Table merge
//!
//! Left-joins the market-value, injury, and sentiment tables onto the
//! aggregated performance table by normalized player name. Performance rows
//! are never dropped; absent enrichment fields fill with 0.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::enrich::injuries::InjuryRow;
use crate::enrich::market::MarketRow;
use crate::enrich::sentiment::SentimentRow;
use crate::enrich::{normalize_name, read_rows};
use crate::export::StatsRow;
use crate::Result;

/// Input artifact locations for the merge stage
#[derive(Debug, Clone)]
pub struct MergePaths {
    pub performance: PathBuf,
    pub market: PathBuf,
    pub injuries: PathBuf,
    pub sentiment: PathBuf,
}

/// One row of final_merged_dataset.csv
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedRow {
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
    /// Age from the market table's latest season; 0 when unknown
    pub age: i32,
    pub market_value_eur: f64,
    pub total_days_injured: f64,
    pub season_days_injured: f64,
    pub injury_count: u32,
    pub injury_risk_score: f64,
    pub sentiment_score: f64,
    pub positive_mentions: u32,
    pub negative_mentions: u32,
    pub injury_risk: f64,
    pub log_market_value: f64,
}

/// Diagnostics for one merge run
#[derive(Debug, Clone, Default)]
pub struct MergeReport {
    pub rows: usize,
    pub with_market: usize,
    pub with_injuries: usize,
    pub with_sentiment: usize,
}

#[derive(Default)]
struct InjuryAgg {
    total_days: f64,
    season_days: f64,
    count: u32,
    risk_sum: f64,
}

/// Build final_merged_dataset.csv; returns run diagnostics.
pub fn merge_tables<P: AsRef<Path>>(paths: &MergePaths, out: P) -> Result<MergeReport> {
    let performance: Vec<StatsRow> = read_rows(&paths.performance)?;
    let market: Vec<MarketRow> = read_rows(&paths.market)?;
    let injuries: Vec<InjuryRow> = read_rows(&paths.injuries)?;
    let sentiment: Vec<SentimentRow> = read_rows(&paths.sentiment)?;

    // Latest market season per player
    let mut market_by_player: HashMap<String, &MarketRow> = HashMap::new();
    for row in &market {
        let key = normalize_name(&row.player_name);
        match market_by_player.get(&key) {
            Some(existing) if existing.season > row.season => {}
            _ => {
                market_by_player.insert(key, row);
            }
        }
    }

    // Injury history summed per player across seasons
    let mut injuries_by_player: HashMap<String, InjuryAgg> = HashMap::new();
    for row in &injuries {
        let agg = injuries_by_player
            .entry(normalize_name(&row.player_name))
            .or_default();
        agg.total_days += row.total_days_injured;
        agg.season_days += row.season_days_injured;
        agg.count += 1;
        agg.risk_sum += row.injury_risk_score;
    }

    let sentiment_by_player: HashMap<String, &SentimentRow> = sentiment
        .iter()
        .map(|row| (normalize_name(&row.player_name), row))
        .collect();

    let mut rows = Vec::with_capacity(performance.len());
    let mut report = MergeReport::default();
    for perf in &performance {
        let player = normalize_name(&perf.player_name);

        let market = market_by_player.get(&player);
        let injury = injuries_by_player.get(&player);
        let sentiment = sentiment_by_player.get(&player);
        report.with_market += market.is_some() as usize;
        report.with_injuries += injury.is_some() as usize;
        report.with_sentiment += sentiment.is_some() as usize;

        let age = market.map(|m| m.age).unwrap_or(0);
        let market_value_eur = market.map(|m| m.market_value_in_eur).unwrap_or(0.0);
        let total_days_injured = injury.map(|i| i.total_days).unwrap_or(0.0);

        rows.push(MergedRow {
            player_name: player,
            season: perf.season.clone(),
            matches_played: perf.matches_played,
            goals: perf.goals,
            assists: perf.assists,
            shots: perf.shots,
            xg: perf.xg,
            passes: perf.passes,
            pass_completed: perf.pass_completed,
            tackles: perf.tackles,
            interceptions: perf.interceptions,
            dribbles_completed: perf.dribbles_completed,
            minutes_played: perf.minutes_played,
            pass_accuracy: perf.pass_accuracy,
            age,
            market_value_eur,
            total_days_injured,
            season_days_injured: injury.map(|i| i.season_days).unwrap_or(0.0),
            injury_count: injury.map(|i| i.count).unwrap_or(0),
            injury_risk_score: injury
                .map(|i| i.risk_sum / i.count as f64)
                .unwrap_or(0.0),
            sentiment_score: sentiment.map(|s| s.sentiment_score).unwrap_or(0.0),
            positive_mentions: sentiment.map(|s| s.positive_mentions).unwrap_or(0),
            negative_mentions: sentiment.map(|s| s.negative_mentions).unwrap_or(0),
            injury_risk: total_days_injured / (age as f64 + 1.0),
            log_market_value: market_value_eur.ln_1p(),
        });
    }

    rows.sort_by(|a, b| (&a.player_name, &a.season).cmp(&(&b.player_name, &b.season)));

    let mut writer = csv::Writer::from_path(out.as_ref())?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    report.rows = rows.len();
    log::info!(
        "Merged {} rows ({} with market value, {} with injuries, {} with sentiment)",
        report.rows,
        report.with_market,
        report.with_injuries,
        report.with_sentiment
    );
    Ok(report)
}
