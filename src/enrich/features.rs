//! Model feature engineering
//!
//! Derives the model-ready columns from the merged longitudinal table:
//! year-over-year market-value movement, per-90-minute rates, availability,
//! and sentiment trend. Every ratio is guarded so zero minutes or a first
//! season never leak inf/NaN into the output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::enrich::merge::MergedRow;
use crate::enrich::read_rows;
use crate::Result;

/// Epsilon keeping the percentage-change denominator away from zero
const PCT_EPSILON: f64 = 1e-5;
/// Clip bounds for the percentage change, for stability against tiny bases
const PCT_CLIP: (f64, f64) = (-1.0, 5.0);

/// One row of final_modeling_features.csv
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRow {
    pub player_name: String,
    pub season: String,
    pub age: i32,
    pub market_value_eur: f64,
    pub market_value_yoy_change: f64,
    pub market_value_yoy_pct_change: f64,
    pub minutes_played: u32,
    pub goal_involvement_per_90: f64,
    pub defensive_actions_per_90: f64,
    pub pass_accuracy: f64,
    pub season_days_injured: f64,
    pub injury_risk_score: f64,
    pub availability_index: f64,
    pub sentiment_score: f64,
    pub sentiment_yoy_change: f64,
}

/// Diagnostics for one feature run
#[derive(Debug, Clone, Default)]
pub struct FeatureReport {
    pub rows: usize,
    pub players: usize,
}

fn per_90(actions: f64, minutes: u32) -> f64 {
    if minutes == 0 {
        0.0
    } else {
        actions / (minutes as f64 / 90.0)
    }
}

fn feature_row(row: &MergedRow, previous: Option<&MergedRow>) -> FeatureRow {
    let yoy_change = previous
        .map(|prev| row.market_value_eur - prev.market_value_eur)
        .unwrap_or(0.0);
    let pct_change = (yoy_change / (row.market_value_eur - yoy_change + PCT_EPSILON))
        .clamp(PCT_CLIP.0, PCT_CLIP.1);

    FeatureRow {
        player_name: row.player_name.clone(),
        season: row.season.clone(),
        age: row.age,
        market_value_eur: row.market_value_eur,
        market_value_yoy_change: yoy_change,
        market_value_yoy_pct_change: pct_change,
        minutes_played: row.minutes_played,
        goal_involvement_per_90: per_90((row.goals + row.assists) as f64, row.minutes_played),
        defensive_actions_per_90: per_90(
            (row.tackles + row.interceptions) as f64,
            row.minutes_played,
        ),
        pass_accuracy: row.pass_accuracy,
        season_days_injured: row.season_days_injured,
        injury_risk_score: row.injury_risk_score,
        availability_index: (1.0 - row.season_days_injured / 365.0).clamp(0.0, 1.0),
        sentiment_score: row.sentiment_score,
        sentiment_yoy_change: previous
            .map(|prev| row.sentiment_score - prev.sentiment_score)
            .unwrap_or(0.0),
    }
}

/// Build final_modeling_features.csv from the merged dataset; returns run
/// diagnostics.
pub fn build_feature_table<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    out: Q,
) -> Result<FeatureReport> {
    let merged: Vec<MergedRow> = read_rows(&input)?;

    // Season-ordered history per player; year-over-year columns difference
    // consecutive seasons of the same player
    let mut by_player: BTreeMap<String, Vec<MergedRow>> = BTreeMap::new();
    for row in merged {
        by_player.entry(row.player_name.clone()).or_default().push(row);
    }

    let mut report = FeatureReport {
        players: by_player.len(),
        ..FeatureReport::default()
    };

    let mut writer = csv::Writer::from_path(out.as_ref())?;
    for history in by_player.values_mut() {
        history.sort_by(|a, b| a.season.cmp(&b.season));
        for i in 0..history.len() {
            let previous = if i > 0 { Some(&history[i - 1]) } else { None };
            writer.serialize(feature_row(&history[i], previous))?;
            report.rows += 1;
        }
    }
    writer.flush()?;

    log::info!(
        "Feature table: {} rows over {} players",
        report.rows,
        report.players
    );
    Ok(report)
}
