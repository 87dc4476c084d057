//! Per-player, per-season statistics accumulation

use crate::data::events::{EventKind, EventRecord};

/// Accumulated statistics for one player in one season
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerSeasonStats {
    /// Distinct matches the player appeared in (at most +1 per match)
    pub matches_played: u32,
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
    /// Summed expected goals over all shots
    pub xg: f64,
    pub passes: u32,
    pub pass_completed: u32,
    pub tackles: u32,
    pub interceptions: u32,
    pub dribbles_completed: u32,
    /// Highest minute observed in any of the player's events; a proxy for
    /// playing time that ignores substitutions
    pub minutes_played: u32,
}

impl PlayerSeasonStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update counters with one event already attributed to this player
    pub fn apply(&mut self, event: &EventRecord) {
        match &event.kind {
            EventKind::Shot { xg, outcome_name } => {
                self.shots += 1;
                self.xg += xg;
                if outcome_name.as_deref() == Some("Goal") {
                    self.goals += 1;
                }
            }
            EventKind::Pass {
                completed,
                goal_assist,
            } => {
                self.passes += 1;
                if *completed {
                    self.pass_completed += 1;
                }
                if *goal_assist {
                    self.assists += 1;
                }
            }
            EventKind::Duel { subtype_name } => {
                if subtype_name.as_deref() == Some("Tackle") {
                    self.tackles += 1;
                }
            }
            // Interceptions count regardless of outcome; dribbles only when
            // complete. The asymmetry matches the source data convention.
            EventKind::Interception => {
                self.interceptions += 1;
            }
            EventKind::Dribble { outcome_name } => {
                if outcome_name.as_deref() == Some("Complete") {
                    self.dribbles_completed += 1;
                }
            }
            EventKind::Other => {}
        }

        if let Some(minute) = event.minute {
            self.minutes_played = self.minutes_played.max(minute);
        }
    }

    /// Completed-pass ratio (0-1); 0 when no passes were recorded
    pub fn pass_accuracy(&self) -> f64 {
        if self.passes == 0 {
            0.0
        } else {
            self.pass_completed as f64 / self.passes as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: EventKind, minute: Option<u32>) -> EventRecord {
        EventRecord {
            player_name: Some("A".to_string()),
            minute,
            kind,
        }
    }

    #[test]
    fn test_shot_accumulation() {
        let mut stats = PlayerSeasonStats::new();
        stats.apply(&event(
            EventKind::Shot {
                xg: 0.2,
                outcome_name: Some("Goal".to_string()),
            },
            Some(10),
        ));
        stats.apply(&event(
            EventKind::Shot {
                xg: 0.05,
                outcome_name: Some("Off T".to_string()),
            },
            Some(40),
        ));
        stats.apply(&event(
            EventKind::Shot {
                xg: 0.0,
                outcome_name: None,
            },
            None,
        ));

        assert_eq!(stats.shots, 3);
        assert_eq!(stats.goals, 1);
        assert!((stats.xg - 0.25).abs() < 1e-9);
        assert_eq!(stats.minutes_played, 40);
    }

    #[test]
    fn test_pass_accumulation() {
        let mut stats = PlayerSeasonStats::new();
        stats.apply(&event(
            EventKind::Pass {
                completed: true,
                goal_assist: false,
            },
            None,
        ));
        stats.apply(&event(
            EventKind::Pass {
                completed: false,
                goal_assist: false,
            },
            None,
        ));
        stats.apply(&event(
            EventKind::Pass {
                completed: true,
                goal_assist: true,
            },
            None,
        ));

        assert_eq!(stats.passes, 3);
        assert_eq!(stats.pass_completed, 2);
        assert_eq!(stats.assists, 1);
        assert!(stats.pass_completed <= stats.passes);
    }

    #[test]
    fn test_duel_counts_tackles_only() {
        let mut stats = PlayerSeasonStats::new();
        stats.apply(&event(
            EventKind::Duel {
                subtype_name: Some("Tackle".to_string()),
            },
            None,
        ));
        stats.apply(&event(
            EventKind::Duel {
                subtype_name: Some("Aerial Lost".to_string()),
            },
            None,
        ));
        stats.apply(&event(EventKind::Duel { subtype_name: None }, None));

        assert_eq!(stats.tackles, 1);
    }

    #[test]
    fn test_interception_unconditional_dribble_conditional() {
        let mut stats = PlayerSeasonStats::new();
        stats.apply(&event(EventKind::Interception, None));
        stats.apply(&event(
            EventKind::Dribble {
                outcome_name: Some("Incomplete".to_string()),
            },
            None,
        ));
        stats.apply(&event(
            EventKind::Dribble {
                outcome_name: Some("Complete".to_string()),
            },
            None,
        ));

        assert_eq!(stats.interceptions, 1);
        assert_eq!(stats.dribbles_completed, 1);
    }

    #[test]
    fn test_minutes_is_max_not_sum() {
        let mut stats = PlayerSeasonStats::new();
        stats.apply(&event(EventKind::Other, Some(60)));
        stats.apply(&event(EventKind::Other, Some(12)));
        stats.apply(&event(EventKind::Other, None));

        assert_eq!(stats.minutes_played, 60);
    }

    #[test]
    fn test_pass_accuracy_zero_guard() {
        let stats = PlayerSeasonStats::new();
        assert_eq!(stats.pass_accuracy(), 0.0);

        let mut stats = PlayerSeasonStats::new();
        stats.apply(&event(
            EventKind::Pass {
                completed: true,
                goal_assist: false,
            },
            None,
        ));
        assert_eq!(stats.pass_accuracy(), 1.0);
        assert!(stats.pass_accuracy() >= 0.0 && stats.pass_accuracy() <= 1.0);
    }
}
