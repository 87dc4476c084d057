//! Injury table preparation
//!
//! Cleans a per-player-season injury export and derives the fixed weighted
//! injury risk score. Headers are matched case-insensitively and absent
//! numeric cells default to 0; the risk score is min-max normalized over the
//! whole table so it always lands in [0, 1].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::{Result, ScoutError};

/// One row of injuries.csv
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjuryRow {
    pub player_name: String,
    pub start_year: i32,
    pub age: f64,
    pub season_days_injured: f64,
    pub season_days_injured_prev_season: f64,
    pub total_days_injured: f64,
    pub cumulative_days_injured: f64,
    pub injury_days_per_game: f64,
    pub injury_trend: f64,
    pub severe_season_injury: u8,
    pub injury_risk_score: f64,
}

/// Diagnostics for one injury-stage run
#[derive(Debug, Clone, Default)]
pub struct InjuryReport {
    pub rows: usize,
}

const REQUIRED_COLUMNS: [&str; 9] = [
    "player_name",
    "start_year",
    "age",
    "season_days_injured",
    "season_days_injured_prev_season",
    "total_days_injured",
    "cumulative_days_injured",
    "significant_injury_prev_season",
    "season_games_played",
];

/// Days injured in a season above which it counts as a severe injury season
const SEVERE_SEASON_DAYS: f64 = 60.0;

fn column_indices(
    headers: &csv::StringRecord,
    file: &Path,
) -> Result<HashMap<String, usize>> {
    let map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect();

    for column in REQUIRED_COLUMNS {
        if !map.contains_key(column) {
            return Err(ScoutError::MissingColumn {
                file: file.display().to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(map)
}

fn num(record: &csv::StringRecord, columns: &HashMap<String, usize>, column: &str) -> Result<f64> {
    let cell = record.get(columns[column]).unwrap_or("").trim();
    if cell.is_empty() {
        return Ok(0.0);
    }
    cell.parse().map_err(|_| {
        ScoutError::Parse(format!("Invalid number '{}' in column {}", cell, column))
    })
}

/// Build injuries.csv from the raw injury dataset; returns run diagnostics.
pub fn build_injury_table<P: AsRef<Path>, Q: AsRef<Path>>(input: P, out: Q) -> Result<InjuryReport> {
    let input = input.as_ref();
    let mut reader = csv::Reader::from_path(input)?;
    let columns = column_indices(reader.headers()?, input)?;

    let mut rows = Vec::new();
    let mut raw_scores = Vec::new();
    for record in reader.records() {
        let record = record?;
        let season_days = num(&record, &columns, "season_days_injured")?;
        let prev_season_days = num(&record, &columns, "season_days_injured_prev_season")?;
        let total_days = num(&record, &columns, "total_days_injured")?;
        let cumulative_days = num(&record, &columns, "cumulative_days_injured")?;
        let significant_prev = num(&record, &columns, "significant_injury_prev_season")?;
        let games_played = num(&record, &columns, "season_games_played")?;

        let injury_trend = season_days - prev_season_days;
        let long_term_ratio = cumulative_days / (total_days + 1.0);

        raw_scores.push(
            0.35 * season_days
                + 0.25 * injury_trend
                + 0.20 * significant_prev
                + 0.20 * long_term_ratio,
        );

        let start_year = record.get(columns["start_year"]).unwrap_or("").trim();
        rows.push(InjuryRow {
            player_name: record
                .get(columns["player_name"])
                .unwrap_or("")
                .trim()
                .to_string(),
            start_year: start_year.parse().map_err(|_| {
                ScoutError::Parse(format!("Invalid start_year '{}'", start_year))
            })?,
            age: num(&record, &columns, "age")?,
            season_days_injured: season_days,
            season_days_injured_prev_season: prev_season_days,
            total_days_injured: total_days,
            cumulative_days_injured: cumulative_days,
            injury_days_per_game: season_days / (games_played + 1.0),
            injury_trend,
            severe_season_injury: if season_days > SEVERE_SEASON_DAYS { 1 } else { 0 },
            injury_risk_score: 0.0,
        });
    }

    // Min-max normalize the risk score; a constant column scores 0 for
    // everyone instead of dividing by zero
    let min = raw_scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    for (row, raw) in rows.iter_mut().zip(&raw_scores) {
        row.injury_risk_score = if max > min { (raw - min) / (max - min) } else { 0.0 };
    }

    let mut writer = csv::Writer::from_path(out.as_ref())?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    log::info!("Injury table: {} rows", rows.len());
    Ok(InjuryReport { rows: rows.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "Player_Name,Start_Year,Age,BMI,Season_Days_Injured,\
                          Season_Days_Injured_Prev_Season,Total_Days_Injured,\
                          Cumulative_Days_Injured,Significant_Injury_Prev_Season,\
                          Season_Games_Played";

    fn run(body: &str) -> (Vec<InjuryRow>, InjuryReport) {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("dataset.csv");
        let out = dir.path().join("injuries.csv");
        fs::write(&input, format!("{}\n{}", HEADER, body)).unwrap();

        let report = build_injury_table(&input, &out).unwrap();
        let mut reader = csv::Reader::from_path(&out).unwrap();
        let rows = reader.deserialize().map(|r| r.unwrap()).collect();
        (rows, report)
    }

    #[test]
    fn test_derived_columns() {
        let (rows, report) = run(
            "Ward,2019,27,23.1,80,20,150,300,1,19\n\
             Mason,2019,24,22.0,10,30,40,50,0,9\n",
        );
        assert_eq!(report.rows, 2);

        let ward = &rows[0];
        assert_eq!(ward.injury_trend, 60.0);
        assert_eq!(ward.injury_days_per_game, 4.0);
        assert_eq!(ward.severe_season_injury, 1);

        let mason = &rows[1];
        assert_eq!(mason.injury_trend, -20.0);
        assert_eq!(mason.injury_days_per_game, 1.0);
        assert_eq!(mason.severe_season_injury, 0);

        // Min-max over two rows puts one at each end
        assert_eq!(ward.injury_risk_score, 1.0);
        assert_eq!(mason.injury_risk_score, 0.0);
    }

    #[test]
    fn test_empty_numeric_cells_default_to_zero() {
        let (rows, _) = run("Ward,2019,27,,,,,,,\n");
        let ward = &rows[0];
        assert_eq!(ward.season_days_injured, 0.0);
        assert_eq!(ward.injury_trend, 0.0);
        // games_played 0 still divides safely
        assert_eq!(ward.injury_days_per_game, 0.0);
    }

    #[test]
    fn test_constant_scores_normalize_to_zero() {
        let (rows, _) = run(
            "Ward,2019,27,23.1,10,10,20,20,0,10\n\
             Mason,2019,24,22.0,10,10,20,20,0,10\n",
        );
        assert!(rows.iter().all(|r| r.injury_risk_score == 0.0));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("dataset.csv");
        fs::write(&input, "player_name,age\nWard,27\n").unwrap();

        let err = build_injury_table(&input, dir.path().join("out.csv")).unwrap_err();
        match err {
            ScoutError::MissingColumn { column, .. } => assert_eq!(column, "start_year"),
            other => panic!("expected MissingColumn, got {}", other),
        }
    }
}
