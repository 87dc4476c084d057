//! Per-match event documents
//!
//! StatsBomb-style event objects carry a `type.name` discriminator and a
//! nested payload object per event family. Absence is meaningful on the wire
//! (an absent pass outcome signals a completed pass), so the raw structs keep
//! every field optional and the conversion into [`EventRecord`] applies the
//! documented default policy in one place.

use serde::Deserialize;

/// Wrapper for `{ "name": ... }` references used throughout the documents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameRef {
    pub name: Option<String>,
}

/// One event object exactly as serialized in an event document
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub kind: Option<NameRef>,
    pub player: Option<NameRef>,
    pub minute: Option<u32>,
    pub shot: Option<RawShot>,
    pub pass: Option<RawPass>,
    pub duel: Option<RawDuel>,
    pub dribble: Option<RawDribble>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawShot {
    pub statsbomb_xg: Option<f64>,
    pub outcome: Option<NameRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPass {
    /// Present only when the pass failed; absence signals completion
    pub outcome: Option<serde_json::Value>,
    pub goal_assist: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDuel {
    #[serde(rename = "type")]
    pub kind: Option<NameRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDribble {
    pub outcome: Option<NameRef>,
}

/// One in-match action, possibly attributed to a player
#[derive(Debug, Clone)]
pub struct EventRecord {
    pub player_name: Option<String>,
    pub minute: Option<u32>,
    pub kind: EventKind,
}

/// Typed event payload, one variant per recognized event family.
///
/// Unrecognized type names map to `Other` so new event families in the input
/// stay a no-op instead of an error.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Shot {
        /// Expected-goals contribution; 0 when the document omits it
        xg: f64,
        outcome_name: Option<String>,
    },
    Pass {
        /// True when the wire payload carried no outcome object
        completed: bool,
        goal_assist: bool,
    },
    Duel {
        subtype_name: Option<String>,
    },
    Interception,
    Dribble {
        outcome_name: Option<String>,
    },
    Other,
}

impl From<RawEvent> for EventRecord {
    fn from(raw: RawEvent) -> Self {
        let kind = match raw.kind.as_ref().and_then(|t| t.name.as_deref()) {
            Some("Shot") => {
                let shot = raw.shot.unwrap_or_default();
                EventKind::Shot {
                    xg: shot.statsbomb_xg.unwrap_or(0.0),
                    outcome_name: shot.outcome.and_then(|o| o.name),
                }
            }
            Some("Pass") => {
                let pass = raw.pass.unwrap_or_default();
                EventKind::Pass {
                    completed: pass.outcome.is_none(),
                    goal_assist: pass.goal_assist.unwrap_or(false),
                }
            }
            Some("Duel") => EventKind::Duel {
                subtype_name: raw.duel.and_then(|d| d.kind).and_then(|k| k.name),
            },
            Some("Interception") => EventKind::Interception,
            Some("Dribble") => EventKind::Dribble {
                outcome_name: raw.dribble.and_then(|d| d.outcome).and_then(|o| o.name),
            },
            _ => EventKind::Other,
        };

        EventRecord {
            player_name: raw.player.and_then(|p| p.name),
            minute: raw.minute,
            kind,
        }
    }
}
