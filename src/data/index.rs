//! Match-season index
//!
//! Maps every known match id to its season label. Built once, in full, before
//! event aggregation starts; read-only afterwards.

use crate::data::loader::RawMatch;
use crate::{MatchId, SeasonLabel};
use std::collections::HashMap;

/// Immutable mapping from match id to season label
#[derive(Debug, Clone, Default)]
pub struct MatchSeasonIndex {
    map: HashMap<MatchId, SeasonLabel>,
}

impl MatchSeasonIndex {
    /// Build the index from all metadata records.
    ///
    /// Records without a match id are ignored. Records missing either the
    /// season or competition name are ignored as well: a season label needs
    /// both parts, and a half-made label would mislabel every stat of every
    /// player in that match.
    pub fn build(records: &[RawMatch]) -> Self {
        let mut map = HashMap::new();
        for record in records {
            let Some(id) = record.match_id else {
                continue;
            };
            let season = record
                .season
                .as_ref()
                .and_then(|s| s.season_name.as_deref());
            let competition = record
                .competition
                .as_ref()
                .and_then(|c| c.competition_name.as_deref());
            if let (Some(season), Some(competition)) = (season, competition) {
                map.insert(MatchId(id), SeasonLabel::new(competition, season));
            }
        }
        MatchSeasonIndex { map }
    }

    /// Season label for a match, if the metadata covered it
    pub fn get(&self, id: MatchId) -> Option<&SeasonLabel> {
        self.map.get(&id)
    }

    /// Number of mapped matches
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{CompetitionRef, SeasonRef};

    fn record(
        match_id: Option<i64>,
        season: Option<&str>,
        competition: Option<&str>,
    ) -> RawMatch {
        RawMatch {
            match_id,
            season: season.map(|s| SeasonRef {
                season_name: Some(s.to_string()),
            }),
            competition: competition.map(|c| CompetitionRef {
                competition_name: Some(c.to_string()),
            }),
        }
    }

    #[test]
    fn test_build_maps_complete_records() {
        let index = MatchSeasonIndex::build(&[
            record(Some(101), Some("2019/2020"), Some("Premier League")),
            record(Some(102), Some("2020/2021"), Some("Premier League")),
        ]);

        assert_eq!(index.len(), 2);
        assert_eq!(
            index.get(MatchId(101)).map(|s| s.as_str()),
            Some("Premier League_2019/2020")
        );
        assert!(index.get(MatchId(999)).is_none());
    }

    #[test]
    fn test_incomplete_records_are_ignored() {
        let index = MatchSeasonIndex::build(&[
            record(None, Some("2019/2020"), Some("Premier League")),
            record(Some(201), None, Some("Premier League")),
            record(Some(202), Some("2019/2020"), None),
        ]);

        assert!(index.is_empty());
    }

    #[test]
    fn test_duplicate_id_keeps_last() {
        let index = MatchSeasonIndex::build(&[
            record(Some(301), Some("2018/2019"), Some("La Liga")),
            record(Some(301), Some("2019/2020"), Some("La Liga")),
        ]);

        assert_eq!(index.len(), 1);
        assert_eq!(
            index.get(MatchId(301)).map(|s| s.as_str()),
            Some("La Liga_2019/2020")
        );
    }
}
