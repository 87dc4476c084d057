//! Tweet sentiment preparation
//!
//! Normalizes tweet text, scores it against a valence lexicon, classifies
//! each tweet, and aggregates per player: mean compound score plus counts of
//! positive and negative mentions.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::enrich::normalize_name;
use crate::{Result, ScoutError, SentimentConfig};

/// Normalization constant for the compound score, matching the VADER
/// convention: compound = sum / sqrt(sum² + 15)
const COMPOUND_ALPHA: f64 = 15.0;

/// Valence lexicon loaded from a `token<TAB>valence` file
pub struct Lexicon {
    valence: HashMap<String, f64>,
}

impl Lexicon {
    /// Load a lexicon file. Blank and `#`-prefixed lines are skipped, as are
    /// lines whose valence field does not parse (the stock lexicon carries
    /// trailing rating fields, which are ignored).
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;

        let mut valence = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(3, '\t');
            let (Some(token), Some(score)) = (parts.next(), parts.next()) else {
                continue;
            };
            match score.trim().parse::<f64>() {
                Ok(score) => {
                    valence.insert(token.to_lowercase(), score);
                }
                Err(_) => log::debug!("Skipping lexicon line: {}", line),
            }
        }

        if valence.is_empty() {
            return Err(ScoutError::Parse(format!(
                "Lexicon {} contains no usable entries",
                path.display()
            )));
        }
        Ok(Lexicon { valence })
    }

    pub fn len(&self) -> usize {
        self.valence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valence.is_empty()
    }

    /// Compound score in (-1, 1) for already-cleaned text.
    ///
    /// Tokens outside the lexicon contribute nothing, so unknown or empty
    /// text scores exactly 0.
    pub fn compound(&self, text: &str) -> f64 {
        let sum: f64 = text
            .split_whitespace()
            .filter_map(|token| self.valence.get(token))
            .sum();
        sum / (sum * sum + COMPOUND_ALPHA).sqrt()
    }
}

/// Tweet text normalizer: strips URLs, @-mentions, and everything outside
/// letters and whitespace, then lowercases.
pub struct TextCleaner {
    url: Regex,
    mention: Regex,
    non_alpha: Regex,
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCleaner {
    pub fn new() -> Self {
        TextCleaner {
            url: Regex::new(r"http\S+").unwrap(),
            mention: Regex::new(r"@\w+").unwrap(),
            non_alpha: Regex::new(r"[^A-Za-z\s]").unwrap(),
        }
    }

    pub fn clean(&self, text: &str) -> String {
        let text = self.url.replace_all(text, "");
        let text = self.mention.replace_all(&text, "");
        let text = self.non_alpha.replace_all(&text, "");
        text.to_lowercase()
    }
}

/// Tweet classification by compound score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentClass {
    Positive,
    Neutral,
    Negative,
}

pub fn classify(compound: f64, config: &SentimentConfig) -> SentimentClass {
    if compound >= config.positive_threshold {
        SentimentClass::Positive
    } else if compound <= config.negative_threshold {
        SentimentClass::Negative
    } else {
        SentimentClass::Neutral
    }
}

/// One row of sentiment.csv
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentRow {
    pub player_name: String,
    /// Mean compound score over the player's tweets
    pub sentiment_score: f64,
    pub positive_mentions: u32,
    pub negative_mentions: u32,
    pub tweet_count: u32,
}

/// Diagnostics for one sentiment-stage run
#[derive(Debug, Clone, Default)]
pub struct SentimentReport {
    pub tweets: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub players: usize,
}

#[derive(Default)]
struct PlayerAgg {
    compound_sum: f64,
    positive: u32,
    negative: u32,
    tweets: u32,
}

/// Build sentiment.csv from a tweets CSV (`player_name` and `text` columns);
/// returns run diagnostics.
pub fn build_sentiment_table<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    config: &SentimentConfig,
    out: Q,
) -> Result<SentimentReport> {
    let input = input.as_ref();
    let lexicon = Lexicon::load(&config.lexicon_path)?;
    log::info!("Loaded lexicon with {} entries", lexicon.len());

    let mut reader = csv::Reader::from_path(input)?;
    let headers = reader.headers()?;
    let mut player_idx = None;
    let mut text_idx = None;
    for (i, header) in headers.iter().enumerate() {
        match header.trim().to_lowercase().as_str() {
            "player_name" => player_idx = Some(i),
            "text" => text_idx = Some(i),
            _ => {}
        }
    }
    let (Some(player_idx), Some(text_idx)) = (player_idx, text_idx) else {
        let column = if player_idx.is_none() { "player_name" } else { "text" };
        return Err(ScoutError::MissingColumn {
            file: input.display().to_string(),
            column: column.to_string(),
        });
    };

    let cleaner = TextCleaner::new();
    let mut report = SentimentReport::default();
    let mut players: HashMap<String, PlayerAgg> = HashMap::new();

    for record in reader.records() {
        let record = record?;
        let player = normalize_name(record.get(player_idx).unwrap_or(""));
        if player.is_empty() {
            continue;
        }
        let compound = lexicon.compound(&cleaner.clean(record.get(text_idx).unwrap_or("")));

        report.tweets += 1;
        let agg = players.entry(player).or_default();
        agg.compound_sum += compound;
        agg.tweets += 1;
        match classify(compound, config) {
            SentimentClass::Positive => {
                report.positive += 1;
                agg.positive += 1;
            }
            SentimentClass::Negative => {
                report.negative += 1;
                agg.negative += 1;
            }
            SentimentClass::Neutral => report.neutral += 1,
        }
    }

    let mut names: Vec<&String> = players.keys().collect();
    names.sort();
    report.players = names.len();

    let mut writer = csv::Writer::from_path(out.as_ref())?;
    for name in names {
        let agg = &players[name];
        writer.serialize(SentimentRow {
            player_name: name.clone(),
            sentiment_score: agg.compound_sum / agg.tweets as f64,
            positive_mentions: agg.positive,
            negative_mentions: agg.negative,
            tweet_count: agg.tweets,
        })?;
    }
    writer.flush()?;

    log::info!(
        "Sentiment table: {} players from {} tweets ({} positive / {} neutral / {} negative)",
        report.players,
        report.tweets,
        report.positive,
        report.neutral,
        report.negative
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_config(dir: &Path) -> SentimentConfig {
        let lexicon_path = dir.join("lexicon.txt");
        fs::write(
            &lexicon_path,
            "# token\tvalence\tstddev\tratings\n\
             great\t3.1\t0.5\t[3,3,4]\n\
             good\t1.9\t0.4\t[2,2,2]\n\
             awful\t-2.9\t0.6\t[-3,-3,-2]\n\
             broken\tn/a\n",
        )
        .unwrap();
        SentimentConfig {
            lexicon_path: lexicon_path.display().to_string(),
            positive_threshold: 0.05,
            negative_threshold: -0.05,
        }
    }

    #[test]
    fn test_lexicon_load_skips_unusable_lines() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        let lexicon = Lexicon::load(&config.lexicon_path).unwrap();
        assert_eq!(lexicon.len(), 3);
    }

    #[test]
    fn test_compound_bounds_and_neutral_zero() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        let lexicon = Lexicon::load(&config.lexicon_path).unwrap();

        let positive = lexicon.compound("great good");
        assert!(positive > 0.0 && positive < 1.0);

        let negative = lexicon.compound("awful");
        assert!(negative < 0.0 && negative > -1.0);

        assert_eq!(lexicon.compound(""), 0.0);
        assert_eq!(lexicon.compound("entirely unknown words"), 0.0);
    }

    #[test]
    fn test_text_cleaner() {
        let cleaner = TextCleaner::new();
        assert_eq!(
            cleaner.clean("GREAT goal by @kane!! #THFC https://t.co/abc123"),
            "great goal by  thfc ",
        );
    }

    #[test]
    fn test_build_sentiment_table_aggregates_per_player() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());

        let input = dir.path().join("tweets.csv");
        fs::write(
            &input,
            "player_name,text,lang\n\
             Kane,great great goal,en\n\
             KANE ,awful miss,en\n\
             Son,good,en\n\
             ,orphan tweet,en\n",
        )
        .unwrap();

        let out = dir.path().join("sentiment.csv");
        let report = build_sentiment_table(&input, &config, &out).unwrap();

        assert_eq!(report.tweets, 3);
        assert_eq!(report.positive, 2);
        assert_eq!(report.negative, 1);
        assert_eq!(report.players, 2);

        let mut reader = csv::Reader::from_path(&out).unwrap();
        let rows: Vec<SentimentRow> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);

        // Sorted by normalized name; "Kane" and "KANE " collapse to one row
        assert_eq!(rows[0].player_name, "kane");
        assert_eq!(rows[0].tweet_count, 2);
        assert_eq!(rows[0].positive_mentions, 1);
        assert_eq!(rows[0].negative_mentions, 1);

        assert_eq!(rows[1].player_name, "son");
        assert_eq!(rows[1].positive_mentions, 1);
    }

    #[test]
    fn test_missing_text_column() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        let input = dir.path().join("tweets.csv");
        fs::write(&input, "player_name,body\nKane,hello\n").unwrap();

        let err =
            build_sentiment_table(&input, &config, dir.path().join("out.csv")).unwrap_err();
        match err {
            ScoutError::MissingColumn { column, .. } => assert_eq!(column, "text"),
            other => panic!("expected MissingColumn, got {}", other),
        }
    }
}
