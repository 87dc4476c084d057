//! Football player dataset builder CLI
//!
//! One subcommand per pipeline stage, from raw event logs to the final
//! modeling feature table.

use clap::{Parser, Subcommand};
use footscout::{Config, Result};

#[derive(Parser)]
#[command(name = "footscout")]
#[command(about = "Build player performance datasets from match event data", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate per-match event logs into player-season statistics
    Aggregate {
        /// Match-metadata directory (defaults to config)
        #[arg(long)]
        matches_dir: Option<String>,
        /// Event-document directory (defaults to config)
        #[arg(long)]
        events_dir: Option<String>,
        /// Output CSV path (defaults to <output_dir>/statsbomb.csv)
        #[arg(long)]
        out: Option<String>,
        /// Skip unreadable event files instead of aborting
        #[arg(long)]
        skip_malformed: bool,
    },
    /// Prepare the market-value table from Transfermarkt CSV exports
    Market {
        /// Directory holding players.csv, player_valuations.csv, appearances.csv,
        /// games.csv, competitions.csv and transfers.csv
        data_dir: String,
        /// Output CSV path (defaults to <output_dir>/market_values.csv)
        #[arg(long)]
        out: Option<String>,
    },
    /// Clean the injury dataset and compute injury risk scores
    Injuries {
        /// Raw injury dataset CSV
        input: String,
        /// Output CSV path (defaults to <output_dir>/injuries.csv)
        #[arg(long)]
        out: Option<String>,
    },
    /// Score tweets against the valence lexicon and aggregate per player
    Sentiment {
        /// Tweets CSV with player_name and text columns
        input: String,
        /// Lexicon file path (defaults to config)
        #[arg(long)]
        lexicon: Option<String>,
        /// Output CSV path (defaults to <output_dir>/sentiment.csv)
        #[arg(long)]
        out: Option<String>,
    },
    /// Merge performance, market, injury and sentiment tables
    Merge {
        /// Performance table (defaults to <output_dir>/statsbomb.csv)
        #[arg(long)]
        performance: Option<String>,
        /// Market-value table (defaults to <output_dir>/market_values.csv)
        #[arg(long)]
        market: Option<String>,
        /// Injury table (defaults to <output_dir>/injuries.csv)
        #[arg(long)]
        injuries: Option<String>,
        /// Sentiment table (defaults to <output_dir>/sentiment.csv)
        #[arg(long)]
        sentiment: Option<String>,
        /// Output CSV path (defaults to <output_dir>/final_merged_dataset.csv)
        #[arg(long)]
        out: Option<String>,
    },
    /// Derive model-ready features from the merged dataset
    Features {
        /// Merged dataset (defaults to <output_dir>/final_merged_dataset.csv)
        #[arg(long)]
        input: Option<String>,
        /// Output CSV path (defaults to <output_dir>/final_modeling_features.csv)
        #[arg(long)]
        out: Option<String>,
    },
    /// Initialize a new project with default config
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Run command
    let result = match cli.command {
        Commands::Aggregate {
            matches_dir,
            events_dir,
            out,
            skip_malformed,
        } => commands::aggregate(&config, matches_dir, events_dir, out, skip_malformed),
        Commands::Market { data_dir, out } => commands::market(&config, &data_dir, out),
        Commands::Injuries { input, out } => commands::injuries(&config, &input, out),
        Commands::Sentiment {
            input,
            lexicon,
            out,
        } => commands::sentiment(&config, &input, lexicon, out),
        Commands::Merge {
            performance,
            market,
            injuries,
            sentiment,
            out,
        } => commands::merge(&config, performance, market, injuries, sentiment, out),
        Commands::Features { input, out } => commands::features(&config, input, out),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use footscout::aggregate::EventAggregator;
    use footscout::data::{loader, MatchSeasonIndex};
    use footscout::enrich::market::{build_market_table, MarketPaths};
    use footscout::enrich::merge::{merge_tables, MergePaths};
    use footscout::enrich::{features, injuries, sentiment};
    use footscout::export;
    use std::path::{Path, PathBuf};

    /// Default artifact location inside the configured output directory
    fn artifact(config: &Config, name: &str, explicit: Option<String>) -> PathBuf {
        explicit
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new(&config.data.output_dir).join(name))
    }

    fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all(&config.data.matches_dir)?;
        std::fs::create_dir_all(&config.data.events_dir)?;
        std::fs::create_dir_all(&config.data.output_dir)?;
        println!("Created data and output directories");

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!("  2. Drop match metadata and event documents under data/");
        println!("  3. Run 'footscout aggregate' to build the performance table");
        println!("  4. Run 'footscout merge' once the other tables are prepared");

        Ok(())
    }

    pub fn aggregate(
        config: &Config,
        matches_dir: Option<String>,
        events_dir: Option<String>,
        out: Option<String>,
        skip_malformed: bool,
    ) -> Result<()> {
        let matches_dir = matches_dir.unwrap_or_else(|| config.data.matches_dir.clone());
        let events_dir = events_dir.unwrap_or_else(|| config.data.events_dir.clone());
        let out = artifact(config, "statsbomb.csv", out);
        let skip_malformed = skip_malformed || config.aggregate.skip_malformed;

        println!("Building match-season index from {}...", matches_dir);
        let records = loader::load_match_records(&matches_dir)?;
        let index = MatchSeasonIndex::build(&records);
        println!("Total matches mapped: {}", index.len());
        if index.is_empty() {
            println!("Warning: no matches mapped. Check the metadata directory.");
        }

        println!("Processing event files from {}...", events_dir);
        let mut aggregator = EventAggregator::new(&index);
        aggregator.process_dir(&events_dir, skip_malformed)?;
        let (table, report) = aggregator.finish();

        ensure_parent(&out)?;
        let rows = export::write_stats_csv(&out, &table)?;

        println!("Event files read: {}", report.event_files_processed);
        println!(
            "Matches skipped (no season info): {}",
            report.matches_skipped
        );
        println!("Wrote {} player-season rows to {}", rows, out.display());

        Ok(())
    }

    pub fn market(config: &Config, data_dir: &str, out: Option<String>) -> Result<()> {
        let out = artifact(config, "market_values.csv", out);
        ensure_parent(&out)?;

        println!("Building market-value table from {}...", data_dir);
        let report = build_market_table(&MarketPaths::in_dir(data_dir), &out)?;

        println!("Appearances read: {}", report.appearances_read);
        if report.appearances_unmatched > 0 {
            println!(
                "Appearances without a matching game: {}",
                report.appearances_unmatched
            );
        }
        println!("Wrote {} player-season rows to {}", report.rows, out.display());

        Ok(())
    }

    pub fn injuries(config: &Config, input: &str, out: Option<String>) -> Result<()> {
        let out = artifact(config, "injuries.csv", out);
        ensure_parent(&out)?;

        println!("Cleaning injury dataset {}...", input);
        let report = injuries::build_injury_table(input, &out)?;
        println!("Wrote {} rows to {}", report.rows, out.display());

        Ok(())
    }

    pub fn sentiment(
        config: &Config,
        input: &str,
        lexicon: Option<String>,
        out: Option<String>,
    ) -> Result<()> {
        let out = artifact(config, "sentiment.csv", out);
        ensure_parent(&out)?;

        let mut sentiment_config = config.sentiment.clone();
        if let Some(lexicon) = lexicon {
            sentiment_config.lexicon_path = lexicon;
        }

        println!("Scoring tweets from {}...", input);
        let report = sentiment::build_sentiment_table(input, &sentiment_config, &out)?;

        println!("Tweets scored: {}", report.tweets);
        println!(
            "Sentiment distribution: {} positive / {} neutral / {} negative",
            report.positive, report.neutral, report.negative
        );
        println!("Wrote {} player rows to {}", report.players, out.display());

        Ok(())
    }

    pub fn merge(
        config: &Config,
        performance: Option<String>,
        market: Option<String>,
        injuries: Option<String>,
        sentiment: Option<String>,
        out: Option<String>,
    ) -> Result<()> {
        let paths = MergePaths {
            performance: artifact(config, "statsbomb.csv", performance),
            market: artifact(config, "market_values.csv", market),
            injuries: artifact(config, "injuries.csv", injuries),
            sentiment: artifact(config, "sentiment.csv", sentiment),
        };
        let out = artifact(config, "final_merged_dataset.csv", out);
        ensure_parent(&out)?;

        println!("Merging tables...");
        let report = merge_tables(&paths, &out)?;

        println!("Rows merged: {}", report.rows);
        println!(
            "  with market value: {}, with injuries: {}, with sentiment: {}",
            report.with_market, report.with_injuries, report.with_sentiment
        );
        println!("Wrote {}", out.display());

        Ok(())
    }

    pub fn features(config: &Config, input: Option<String>, out: Option<String>) -> Result<()> {
        let input = artifact(config, "final_merged_dataset.csv", input);
        let out = artifact(config, "final_modeling_features.csv", out);
        ensure_parent(&out)?;

        println!("Deriving model features from {}...", input.display());
        let report = features::build_feature_table(&input, &out)?;

        println!(
            "Wrote {} feature rows over {} players to {}",
            report.rows,
            report.players,
            out.display()
        );

        Ok(())
    }
}
