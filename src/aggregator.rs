//! Snapshot aggregator
//!
//! Joins the three source reads, runs the analyzers, and publishes one
//! immutable `PersonalizationSnapshot` per (user, coach type). Computation is
//! a pure function of the fetched inputs plus "now": identical inputs and a
//! frozen clock produce an identical snapshot. Snapshots are recomputed
//! wholesale whenever the input fingerprint changes and swapped into the
//! cache atomically; consumers only ever see `Ready` or `Pending`, never a
//! partially-populated snapshot.

use crate::chakra::{self, ChakraInsights};
use crate::conversation::{self, ConversationHistory};
use crate::db::{ChakraProfile, ConversationSession, JournalEntry};
use crate::emotional::{self, EmotionalState};
use crate::journey::{self, UserJourney};
use crate::logging;
use crate::sources::SourceReader;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

// ============ Snapshot ============

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PersonalizationSnapshot {
    pub user_journey: UserJourney,
    pub emotional_state: EmotionalState,
    // Absent when the user has no chakra assessment; never zero-filled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chakra_insights: Option<ChakraInsights>,
    pub conversation_history: ConversationHistory,
    pub generated_at: DateTime<Utc>,
}

/// What a consumer sees while source fetches are outstanding.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotState {
    Ready(PersonalizationSnapshot),
    Pending,
}

// ============ Inputs ============

/// The three source sets plus the account creation instant, fetched together
/// behind the join barrier. Serialized only to fingerprint identity.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SourceInputs {
    pub created_at: Option<DateTime<Utc>>,
    pub chakra: Option<ChakraProfile>,
    pub entries: Vec<JournalEntry>,
    pub sessions: Vec<ConversationSession>,
}

impl SourceInputs {
    pub fn empty() -> Self {
        Self {
            created_at: None,
            chakra: None,
            entries: Vec::new(),
            sessions: Vec::new(),
        }
    }

    /// Identity of the current input sets; a change here triggers recompute.
    pub fn fingerprint(&self) -> u64 {
        let serialized = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = DefaultHasher::new();
        serialized.hash(&mut hasher);
        hasher.finish()
    }
}

// ============ Pure Computation ============

/// Compute a full snapshot from already-fetched inputs. Pure and
/// deterministic; no locking, no shared state across calls.
pub fn compute_snapshot(inputs: &SourceInputs, now: DateTime<Utc>) -> PersonalizationSnapshot {
    let days_active = inputs
        .created_at
        .map(|created| journey::days_active(created, now))
        .unwrap_or(0);

    let emotional_state = emotional::analyze_entries(&inputs.entries);
    let consistency = emotional::consistency_score(inputs.entries.len(), days_active);
    let chakra_insights = inputs.chakra.as_ref().map(chakra::analyze_profile);
    let conversation_history = conversation::analyze_sessions(&inputs.sessions);
    let user_journey = journey::synthesize(
        days_active,
        inputs.entries.len(),
        conversation_history.session_count,
        consistency,
    );

    PersonalizationSnapshot {
        user_journey,
        emotional_state,
        chakra_insights,
        conversation_history,
        generated_at: now,
    }
}

// ============ Engine ============

struct CachedSnapshot {
    fingerprint: u64,
    snapshot: PersonalizationSnapshot,
}

/// Push-based snapshot engine with an explicit cache keyed by
/// (user, coach type, input fingerprint). One instance serves any number of
/// users; computations for different users are fully independent.
pub struct PersonalizationEngine<S: SourceReader> {
    sources: S,
    cache: Mutex<HashMap<(String, String), CachedSnapshot>>,
}

impl<S: SourceReader> PersonalizationEngine<S> {
    pub fn new(sources: S) -> Self {
        Self {
            sources,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch, compute if the inputs changed, republish, and return the
    /// current snapshot.
    pub async fn get_snapshot(&self, user_id: &str, coach_type: &str) -> PersonalizationSnapshot {
        self.get_snapshot_at(user_id, coach_type, Utc::now()).await
    }

    /// Same as `get_snapshot` with an explicit clock, for deterministic
    /// recomputation.
    pub async fn get_snapshot_at(
        &self,
        user_id: &str,
        coach_type: &str,
        now: DateTime<Utc>,
    ) -> PersonalizationSnapshot {
        let inputs = self.fetch_inputs(user_id, coach_type).await;
        let fingerprint = inputs.fingerprint();
        let key = (user_id.to_string(), coach_type.to_string());

        {
            let cache = self.cache.lock().unwrap();
            if let Some(cached) = cache.get(&key) {
                if cached.fingerprint == fingerprint {
                    logging::log_snapshot(Some(user_id), "Sources unchanged, serving cached snapshot");
                    return cached.snapshot.clone();
                }
            }
        }

        let snapshot = compute_snapshot(&inputs, now);
        logging::log_snapshot(Some(user_id), &format!(
            "Republished snapshot: mood={}, consistency={}, sessions={}, chakra={}",
            snapshot.emotional_state.recent_mood.as_str(),
            snapshot.user_journey.consistency_score,
            snapshot.conversation_history.session_count,
            if snapshot.chakra_insights.is_some() { "present" } else { "absent" },
        ));

        let mut cache = self.cache.lock().unwrap();
        cache.insert(key, CachedSnapshot { fingerprint, snapshot: snapshot.clone() });
        snapshot
    }

    /// Last published snapshot, or Pending when nothing has been computed
    /// for this (user, coach type) yet.
    pub fn peek(&self, user_id: &str, coach_type: &str) -> SnapshotState {
        let cache = self.cache.lock().unwrap();
        match cache.get(&(user_id.to_string(), coach_type.to_string())) {
            Some(cached) => SnapshotState::Ready(cached.snapshot.clone()),
            None => SnapshotState::Pending,
        }
    }

    /// Drop the cached snapshot so the next call recomputes even with an
    /// unchanged fingerprint (e.g. to refresh days-active after midnight).
    pub fn invalidate(&self, user_id: &str, coach_type: &str) {
        let mut cache = self.cache.lock().unwrap();
        cache.remove(&(user_id.to_string(), coach_type.to_string()));
    }

    /// Join barrier over the three source reads (plus the account record).
    /// A failed fetch degrades that source to its empty default; errors
    /// never reach snapshot consumers.
    async fn fetch_inputs(&self, user_id: &str, coach_type: &str) -> SourceInputs {
        let (created, chakra, entries, sessions) = tokio::join!(
            self.sources.account_created_at(user_id),
            self.sources.chakra_profile(user_id),
            self.sources.journal_entries(user_id),
            self.sources.conversations(user_id, coach_type),
        );

        let created_at = created.unwrap_or_else(|e| {
            logging::log_error(Some(user_id), &format!("Account fetch failed, treating as new: {}", e));
            None
        });
        let chakra = chakra.unwrap_or_else(|e| {
            logging::log_error(Some(user_id), &format!("Chakra fetch failed, treating as no profile: {}", e));
            None
        });
        let entries = entries.unwrap_or_else(|e| {
            logging::log_error(Some(user_id), &format!("Journal fetch failed, treating as empty: {}", e));
            Vec::new()
        });
        let sessions = sessions.unwrap_or_else(|e| {
            logging::log_error(Some(user_id), &format!("Conversation fetch failed, treating as empty: {}", e));
            Vec::new()
        });

        logging::log_sources(Some(user_id), &format!(
            "Fetched sources: {} journal entries, {} sessions ({}), chakra {}",
            entries.len(),
            sessions.len(),
            coach_type,
            if chakra.is_some() { "present" } else { "absent" },
        ));

        SourceInputs {
            created_at,
            chakra,
            entries,
            sessions,
        }
    }
}

// ============ Prompt Formatting ============

/// Render a snapshot for injection into a coach prompt. The coach layer
/// itself lives outside this crate; this is its view of the data.
pub fn format_snapshot_for_prompt(snapshot: &PersonalizationSnapshot) -> String {
    let mut parts = Vec::new();

    parts.push(format!(
        "Day {} of their journey. Recent mood: {}.",
        snapshot.user_journey.days_active,
        snapshot.emotional_state.recent_mood.as_str()
    ));

    if !snapshot.emotional_state.dominant_emotions.is_empty() {
        parts.push(format!(
            "Dominant emotions: {}",
            snapshot.emotional_state.dominant_emotions.join(", ")
        ));
    }
    if !snapshot.emotional_state.recurring_themes.is_empty() {
        parts.push(format!(
            "Often writes about: {}",
            snapshot.emotional_state.recurring_themes.join(", ")
        ));
    }

    if let Some(chakra) = &snapshot.chakra_insights {
        parts.push(format!(
            "Energy balance {}%: strongest {}, needs attention {}",
            chakra.overall_balance, chakra.strongest_chakra, chakra.primary_imbalance
        ));
    }

    let history = &snapshot.conversation_history;
    if history.session_count > 0 {
        parts.push(format!("{} coaching sessions so far.", history.session_count));
        if !history.last_topics.is_empty() {
            parts.push(format!("Recent topics: {}", history.last_topics.join(", ")));
        }
        if !history.current_challenges.is_empty() {
            parts.push(format!("Working through: {}", history.current_challenges.join(", ")));
        }
        if !history.breakthroughs.is_empty() {
            parts.push(format!("Breakthroughs: {}", history.breakthroughs.join(", ")));
        }
    }

    if !snapshot.user_journey.achievements.is_empty() {
        parts.push(format!(
            "Achievements: {}",
            snapshot.user_journey.achievements.join(", ")
        ));
    }
    if !snapshot.user_journey.growth_areas.is_empty() {
        parts.push(format!(
            "Growth areas: {}",
            snapshot.user_journey.growth_areas.join(", ")
        ));
    }

    parts.join("\n")
}
