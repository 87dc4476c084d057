//! End-to-end pipeline tests over real files

use footscout::aggregate::EventAggregator;
use footscout::data::{loader, MatchSeasonIndex};
use footscout::enrich::features::build_feature_table;
use footscout::enrich::merge::{merge_tables, MergePaths};
use footscout::export;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_event_fixtures(root: &Path) {
    let matches_dir = root.join("matches");
    let events_dir = root.join("events");
    fs::create_dir_all(matches_dir.join("2")).unwrap();
    fs::create_dir_all(&events_dir).unwrap();

    // Metadata split across two documents, one nested a level deeper
    fs::write(
        matches_dir.join("2019.json"),
        r#"[{"match_id": 101,
             "season": {"season_name": "2019/2020"},
             "competition": {"competition_name": "PremierLeague"}}]"#,
    )
    .unwrap();
    fs::write(
        matches_dir.join("2").join("more.json"),
        r#"[{"match_id": 102,
             "season": {"season_name": "2019/2020"},
             "competition": {"competition_name": "PremierLeague"}},
            {"match_id": 103}]"#,
    )
    .unwrap();

    fs::write(
        events_dir.join("101.json"),
        r#"[
            {"type": {"name": "Shot"}, "player": {"name": "Alice"}, "minute": 23,
             "shot": {"statsbomb_xg": 0.2, "outcome": {"name": "Goal"}}},
            {"type": {"name": "Pass"}, "player": {"name": "Alice"}, "minute": 30,
             "pass": {"goal_assist": true}},
            {"type": {"name": "Interception"}, "player": {"name": "Bob"}, "minute": 45},
            {"type": {"name": "Half End"}}
        ]"#,
    )
    .unwrap();
    fs::write(
        events_dir.join("102.json"),
        r#"[
            {"type": {"name": "Pass"}, "player": {"name": "Alice"}, "minute": 77,
             "pass": {"outcome": {"name": "Incomplete"}}}
        ]"#,
    )
    .unwrap();
    // No metadata maps match 999
    fs::write(
        events_dir.join("999.json"),
        r#"[{"type": {"name": "Shot"}, "player": {"name": "Ghost"},
             "shot": {"statsbomb_xg": 0.9, "outcome": {"name": "Goal"}}}]"#,
    )
    .unwrap();
}

fn run_aggregate(root: &Path, out: &Path) -> footscout::aggregate::RunReport {
    let records = loader::load_match_records(root.join("matches")).unwrap();
    let index = MatchSeasonIndex::build(&records);
    assert_eq!(index.len(), 2);

    let mut aggregator = EventAggregator::new(&index);
    aggregator.process_dir(root.join("events"), false).unwrap();
    let (table, report) = aggregator.finish();
    export::write_stats_csv(out, &table).unwrap();
    report
}

#[test]
fn aggregate_end_to_end() {
    let dir = TempDir::new().unwrap();
    write_event_fixtures(dir.path());

    let out = dir.path().join("statsbomb.csv");
    let report = run_aggregate(dir.path(), &out);

    assert_eq!(report.event_files_processed, 3);
    assert_eq!(report.matches_skipped, 1);
    assert_eq!(report.rows, 2);

    let text = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    // Alice: appeared in both mapped matches, one goal, one assist, one of
    // two passes completed, latest minute 77
    assert_eq!(
        lines[1],
        "Alice,PremierLeague_2019/2020,2,1,1,1,0.2,2,1,0,0,0,77,0.5"
    );
    // Bob: a single interception, no passes, accuracy safely 0
    assert_eq!(
        lines[2],
        "Bob,PremierLeague_2019/2020,1,0,0,0,0.0,0,0,0,1,0,45,0.0"
    );
}

#[test]
fn aggregate_is_deterministic() {
    let dir = TempDir::new().unwrap();
    write_event_fixtures(dir.path());

    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    run_aggregate(dir.path(), &first);
    run_aggregate(dir.path(), &second);

    assert_eq!(
        fs::read_to_string(first).unwrap(),
        fs::read_to_string(second).unwrap()
    );
}

#[test]
fn malformed_event_file_aborts_by_default() {
    let dir = TempDir::new().unwrap();
    write_event_fixtures(dir.path());
    fs::write(dir.path().join("events").join("100.json"), "{broken").unwrap();

    let records = loader::load_match_records(dir.path().join("matches")).unwrap();
    let index = MatchSeasonIndex::build(&records);
    let mut aggregator = EventAggregator::new(&index);
    let err = aggregator.process_dir(dir.path().join("events"), false);
    assert!(err.is_err());
}

#[test]
fn malformed_event_file_skipped_in_lenient_mode() {
    let dir = TempDir::new().unwrap();
    write_event_fixtures(dir.path());
    // Sorts before the valid files, so the rest must still be merged
    fs::write(dir.path().join("events").join("100.json"), "{broken").unwrap();

    let records = loader::load_match_records(dir.path().join("matches")).unwrap();
    let index = MatchSeasonIndex::build(&records);
    let mut aggregator = EventAggregator::new(&index);
    aggregator.process_dir(dir.path().join("events"), true).unwrap();
    let (table, report) = aggregator.finish();

    assert_eq!(report.event_files_processed, 4);
    assert_eq!(report.rows, 2);
    assert_eq!(table.len(), 2);
}

#[test]
fn merge_and_features_consume_aggregate_output() {
    let dir = TempDir::new().unwrap();
    write_event_fixtures(dir.path());

    let performance = dir.path().join("statsbomb.csv");
    run_aggregate(dir.path(), &performance);

    let market = dir.path().join("market_values.csv");
    fs::write(
        &market,
        "player_id,player_name,season,minutes_played,goals,assists,yellow_cards,\
         red_cards,competition_name,market_value_in_eur,transfer_fee,age\n\
         1,ALICE,2019,2500,12,4,1,0,Premier League,50000000,0,24\n",
    )
    .unwrap();

    let injuries = dir.path().join("injuries.csv");
    fs::write(
        &injuries,
        "player_name,start_year,age,season_days_injured,\
         season_days_injured_prev_season,total_days_injured,\
         cumulative_days_injured,injury_days_per_game,injury_trend,\
         severe_season_injury,injury_risk_score\n\
         alice,2019,24,73,0,73,73,3.0,73,1,0.6\n",
    )
    .unwrap();

    let sentiment = dir.path().join("sentiment.csv");
    fs::write(
        &sentiment,
        "player_name,sentiment_score,positive_mentions,negative_mentions,tweet_count\n\
         alice,0.25,12,3,20\n",
    )
    .unwrap();

    let merged = dir.path().join("final_merged_dataset.csv");
    let report = merge_tables(
        &MergePaths {
            performance,
            market,
            injuries,
            sentiment,
        },
        &merged,
    )
    .unwrap();
    assert_eq!(report.rows, 2);
    assert_eq!(report.with_market, 1);

    let features = dir.path().join("final_modeling_features.csv");
    let feature_report = build_feature_table(&merged, &features).unwrap();
    assert_eq!(feature_report.rows, 2);
    assert_eq!(feature_report.players, 2);

    let text = fs::read_to_string(&features).unwrap();
    let alice = text.lines().nth(1).unwrap();
    let fields: Vec<&str> = alice.split(',').collect();
    assert_eq!(fields[0], "alice");
    // market_value_eur flows through the merge
    assert_eq!(fields[3], "50000000.0");
    // availability index: 1 - 73/365 = 0.8
    assert_eq!(fields[12], "0.8");
}
