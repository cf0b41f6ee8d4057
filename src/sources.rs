//! Source readers
//!
//! The aggregator reads a user's raw history through this trait rather than
//! the storage layer directly, so the storage can be swapped (or stubbed in
//! tests). Readers are black boxes that either return already-materialized
//! records or fail; the aggregator turns any failure into that source's
//! empty default.

use crate::db::{self, ChakraProfile, ConversationSession, JournalEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::error::Error;

pub type SourceResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Account creation instant; None for an unknown user.
    async fn account_created_at(&self, user_id: &str) -> SourceResult<Option<DateTime<Utc>>>;

    /// Latest chakra assessment, or None when the user has not taken one.
    async fn chakra_profile(&self, user_id: &str) -> SourceResult<Option<ChakraProfile>>;

    /// Journal entries, most recent first.
    async fn journal_entries(&self, user_id: &str) -> SourceResult<Vec<JournalEntry>>;

    /// Conversation sessions with one coach type.
    async fn conversations(
        &self,
        user_id: &str,
        coach_type: &str,
    ) -> SourceResult<Vec<ConversationSession>>;
}

/// Reader backed by the local SQLite store.
pub struct SqliteSources;

#[async_trait]
impl SourceReader for SqliteSources {
    async fn account_created_at(&self, user_id: &str) -> SourceResult<Option<DateTime<Utc>>> {
        let user = db::get_user(user_id)?;
        match user {
            Some(record) => {
                let created = DateTime::parse_from_rfc3339(&record.created_at)?;
                Ok(Some(created.with_timezone(&Utc)))
            }
            None => Ok(None),
        }
    }

    async fn chakra_profile(&self, user_id: &str) -> SourceResult<Option<ChakraProfile>> {
        Ok(db::get_chakra_profile(user_id)?)
    }

    async fn journal_entries(&self, user_id: &str) -> SourceResult<Vec<JournalEntry>> {
        Ok(db::get_journal_entries(user_id)?)
    }

    async fn conversations(
        &self,
        user_id: &str,
        coach_type: &str,
    ) -> SourceResult<Vec<ConversationSession>> {
        Ok(db::get_sessions(user_id, coach_type)?)
    }
}
