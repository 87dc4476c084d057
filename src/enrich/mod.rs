//! Enrichment stages
//!
//! The tabular stages around the core aggregation: market-value preparation,
//! injury cleaning, tweet sentiment, the table merge, and final feature
//! engineering. Every stage reads and writes flat CSV artifacts.

pub mod features;
pub mod injuries;
pub mod market;
pub mod merge;
pub mod sentiment;

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::Result;

/// Player-name key used for cross-table joins: lowercased and trimmed, since
/// the source tables disagree on casing and stray whitespace.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Read a whole CSV artifact into typed rows
pub(crate) fn read_rows<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Lionel Messi "), "lionel messi");
        assert_eq!(normalize_name("KANE"), "kane");
    }
}
