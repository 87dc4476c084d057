//! Event aggregation engine
//!
//! Consumes one match's event sequence at a time and folds it into the
//! per-(player, season) accumulator table. Strictly two-phase: the
//! [`MatchSeasonIndex`] is built in full before the first event file is read
//! and is only ever looked up here, never mutated.

use crate::data::events::EventRecord;
use crate::data::index::MatchSeasonIndex;
use crate::data::loader;
use crate::{MatchId, PlayerSeasonKey, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use super::stats::PlayerSeasonStats;

/// Run diagnostics reported to the operator at completion
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Event files read (including skipped and, in lenient mode, malformed ones)
    pub event_files_processed: usize,
    /// Distinct matches skipped because the index had no season for them
    pub matches_skipped: usize,
    /// Rows in the finished table
    pub rows: usize,
}

/// Accumulates player-season statistics across event files
pub struct EventAggregator<'a> {
    index: &'a MatchSeasonIndex,
    stats: HashMap<PlayerSeasonKey, PlayerSeasonStats>,
    skipped: HashSet<MatchId>,
    files_processed: usize,
}

impl<'a> EventAggregator<'a> {
    pub fn new(index: &'a MatchSeasonIndex) -> Self {
        EventAggregator {
            index,
            stats: HashMap::new(),
            skipped: HashSet::new(),
            files_processed: 0,
        }
    }

    /// Fold one match's ordered event sequence into the table.
    ///
    /// A match with no season mapping contributes nothing and is recorded in
    /// the skipped set. Appearances are tracked in a set local to this call,
    /// so a player's matches_played rises by at most one here no matter how
    /// many events they generated.
    pub fn process_match(&mut self, id: MatchId, events: &[EventRecord]) {
        let Some(season) = self.index.get(id) else {
            log::debug!("No season mapping for match {}, skipping", id);
            self.skipped.insert(id);
            return;
        };

        let mut appeared: HashSet<PlayerSeasonKey> = HashSet::new();

        for event in events {
            let Some(player) = event.player_name.as_deref() else {
                continue;
            };
            let key = PlayerSeasonKey::new(player, season);
            appeared.insert(key.clone());
            self.stats.entry(key).or_default().apply(event);
        }

        for key in appeared {
            if let Some(stats) = self.stats.get_mut(&key) {
                stats.matches_played += 1;
            }
        }
    }

    /// Process every event file under `dir` in ascending match-id order.
    ///
    /// A file is parsed in full before any accumulator is touched, so a
    /// malformed file never damages state merged from earlier files. With
    /// `skip_malformed` the file is logged and passed over; otherwise it
    /// aborts the run.
    pub fn process_dir<P: AsRef<Path>>(&mut self, dir: P, skip_malformed: bool) -> Result<()> {
        for (id, path) in loader::event_files(dir)? {
            self.files_processed += 1;
            let events = match loader::load_event_file(&path) {
                Ok(events) => events,
                Err(e) if skip_malformed => {
                    log::warn!("Skipping event file {}: {}", path.display(), e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            self.process_match(id, &events);
        }
        Ok(())
    }

    /// Consume the aggregator, yielding the finished table and diagnostics.
    pub fn finish(self) -> (HashMap<PlayerSeasonKey, PlayerSeasonStats>, RunReport) {
        let report = RunReport {
            event_files_processed: self.files_processed,
            matches_skipped: self.skipped.len(),
            rows: self.stats.len(),
        };
        (self.stats, report)
    }
}
