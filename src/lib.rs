//! Innerlight personalization engine
//!
//! Ingests a user's raw activity history (chakra assessment, journal entries,
//! coach conversation transcripts) and synthesizes one compact
//! `PersonalizationSnapshot` used to tailor coach responses and the
//! dashboard. Deterministic keyword/heuristic analysis only; the HTTP API,
//! chat/LLM integration, and presentation layers live outside this crate.

pub mod aggregator;
pub mod chakra;
pub mod conversation;
pub mod db;
pub mod emotional;
pub mod journey;
pub mod lexicon;
pub mod logging;
pub mod sources;

pub use aggregator::{
    compute_snapshot, format_snapshot_for_prompt, PersonalizationEngine,
    PersonalizationSnapshot, SnapshotState, SourceInputs,
};
pub use chakra::{Chakra, ChakraInsights};
pub use conversation::ConversationHistory;
pub use db::{ChakraProfile, ConversationSession, JournalEntry, Turn, UserRecord};
pub use emotional::{EmotionalState, Mood};
pub use journey::UserJourney;
pub use sources::{SourceReader, SqliteSources};

/// Engine wired to the local SQLite store.
pub type SqliteEngine = PersonalizationEngine<SqliteSources>;

/// Open the local store and the log directory, returning a ready engine.
pub fn init(db_path: &std::path::Path) -> Result<SqliteEngine, Box<dyn std::error::Error>> {
    db::init_database(db_path)?;

    if let Err(e) = logging::init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // Keep last 7 days of logs
    let _ = logging::cleanup_old_logs();

    Ok(PersonalizationEngine::new(SqliteSources))
}
