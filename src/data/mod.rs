//! Data ingestion and parsing
//!
//! Readers for match-metadata and per-match event documents, and the
//! match-to-season index built from the metadata.

pub mod events;
pub mod index;
pub mod loader;

pub use events::{EventKind, EventRecord};
pub use index::MatchSeasonIndex;
