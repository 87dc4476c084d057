//! Record loader
//!
//! Enumerates match-metadata documents (each holding an array of match
//! objects) and per-match event documents named `<match_id>.json`. Files are
//! parsed whole before anything is yielded, so a malformed document surfaces
//! before any downstream state has been touched.

use crate::data::events::{EventRecord, RawEvent};
use crate::{MatchId, Result, ScoutError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One match object as serialized in a metadata document
#[derive(Debug, Clone, Deserialize)]
pub struct RawMatch {
    pub match_id: Option<i64>,
    pub season: Option<SeasonRef>,
    pub competition: Option<CompetitionRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonRef {
    pub season_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompetitionRef {
    pub competition_name: Option<String>,
}

/// Read every match-metadata document under `dir`, recursively.
///
/// Metadata documents are the source of the season mapping, so any malformed
/// document here is fatal: without it the index would silently skip every
/// match it covered.
pub fn load_match_records<P: AsRef<Path>>(dir: P) -> Result<Vec<RawMatch>> {
    let mut files = Vec::new();
    collect_json_files(dir.as_ref(), &mut files)?;
    files.sort();

    let mut records = Vec::new();
    for path in files {
        log::debug!("Reading match file: {}", path.display());
        let text = fs::read_to_string(&path)?;
        let matches: Vec<RawMatch> =
            serde_json::from_str(&text).map_err(|e| ScoutError::MalformedFile {
                path: path.display().to_string(),
                source: e,
            })?;
        records.extend(matches);
    }
    Ok(records)
}

fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_json_files(&path, out)?;
        } else if path.extension().map(|e| e == "json").unwrap_or(false) {
            out.push(path);
        }
    }
    Ok(())
}

/// Enumerate event documents in `dir`, ascending by match id.
///
/// The file stem is the integer match identifier; non-JSON files are ignored,
/// a JSON file with a non-integer stem is an error (it means the directory is
/// not an event directory).
pub fn event_files<P: AsRef<Path>>(dir: P) -> Result<Vec<(MatchId, PathBuf)>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_dir() || !path.extension().map(|e| e == "json").unwrap_or(false) {
            continue;
        }
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let id: i64 = stem
            .parse()
            .map_err(|_| ScoutError::BadEventFilename(path.display().to_string()))?;
        files.push((MatchId(id), path));
    }
    files.sort();
    Ok(files)
}

/// Parse one event document into its ordered event sequence.
pub fn load_event_file(path: &Path) -> Result<Vec<EventRecord>> {
    let text = fs::read_to_string(path)?;
    let raw: Vec<RawEvent> =
        serde_json::from_str(&text).map_err(|e| ScoutError::MalformedFile {
            path: path.display().to_string(),
            source: e,
        })?;
    Ok(raw.into_iter().map(EventRecord::from).collect())
}
