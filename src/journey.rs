//! Consistency & achievement synthesizer
//!
//! Combines days active, journaling cadence, and the analyzer outputs into
//! the user-journey block: a consistency score, up to three achievement tags,
//! and up to three growth-area recommendations. Achievement and growth rules
//! are evaluated independently; both lists can be empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MAX_ACHIEVEMENTS: usize = 3;
const MAX_GROWTH_AREAS: usize = 3;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserJourney {
    pub days_active: i64,
    pub consistency_score: u8, // 0-100
    pub achievements: Vec<String>,
    pub growth_areas: Vec<String>,
}

/// Whole days since account creation, never negative.
pub fn days_active(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created_at).num_days().max(0)
}

/// Build the journey block from already-computed inputs.
pub fn synthesize(
    days_active: i64,
    entry_count: usize,
    session_count: usize,
    consistency_score: u8,
) -> UserJourney {
    // Fixed priority order, truncated after evaluation
    let mut achievements = Vec::new();
    if entry_count > 5 {
        achievements.push("committed journalist".to_string());
    }
    if session_count > 3 {
        achievements.push("active in coaching".to_string());
    }
    if consistency_score > 70 {
        achievements.push("highly consistent practice".to_string());
    }
    if days_active > 30 {
        achievements.push("30+ days on healing journey".to_string());
    }
    achievements.truncate(MAX_ACHIEVEMENTS);

    let mut growth_areas = Vec::new();
    if entry_count == 0 {
        growth_areas.push("establishing journaling practice".to_string());
    }
    if session_count == 0 {
        growth_areas.push("beginning coaching conversations".to_string());
    }
    if consistency_score < 30 {
        growth_areas.push("building consistency".to_string());
    }
    growth_areas.truncate(MAX_GROWTH_AREAS);

    UserJourney {
        days_active,
        consistency_score,
        achievements,
        growth_areas,
    }
}
