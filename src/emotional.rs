//! Emotional-signal analyzer
//!
//! Reads the most recent journal entries and derives a mood classification,
//! dominant emotion tags, and recurring themes via the lexicon tables. Also
//! owns the journaling consistency score, which the journey synthesizer
//! consumes. Pure functions over already-fetched entries; no NLU, keyword
//! presence only.

use crate::db::JournalEntry;
use crate::lexicon;
use serde::{Deserialize, Serialize};

/// How many recent entries feed the analysis.
const RECENT_ENTRY_WINDOW: usize = 10;

/// Consistency expects at most one entry per day, capped at a 30-day window.
const CONSISTENCY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Positive,
    Challenging,
    Neutral,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Positive => "positive",
            Mood::Challenging => "challenging",
            Mood::Neutral => "neutral",
        }
    }

    pub fn from_str(s: &str) -> Option<Mood> {
        match s.to_lowercase().as_str() {
            "positive" => Some(Mood::Positive),
            "challenging" => Some(Mood::Challenging),
            "neutral" => Some(Mood::Neutral),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EmotionalState {
    pub recent_mood: Mood,
    pub dominant_emotions: Vec<String>,
    pub recurring_themes: Vec<String>,
}

impl EmotionalState {
    pub fn empty() -> Self {
        Self {
            recent_mood: Mood::Neutral,
            dominant_emotions: Vec::new(),
            recurring_themes: Vec::new(),
        }
    }
}

/// Analyze the journal, most recent entries first.
pub fn analyze_entries(entries: &[JournalEntry]) -> EmotionalState {
    if entries.is_empty() {
        return EmotionalState::empty();
    }

    let recent = &entries[..entries.len().min(RECENT_ENTRY_WINDOW)];

    // Two logical corpora: entry body text, and gratitude phrases
    let body: String = recent
        .iter()
        .map(|e| e.content.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let gratitude: String = recent
        .iter()
        .flat_map(|e| e.gratitude.iter())
        .map(|g| g.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    let combined = format!("{} {}", body, gratitude);

    // Positive words are counted across both corpora; challenging words only
    // against body text, so a gratitude list never reads as distress
    let positive_count = lexicon::count_present(&combined, lexicon::POSITIVE_WORDS);
    let challenging_count = lexicon::count_present(&body, lexicon::CHALLENGING_WORDS);

    // Hysteresis band of width 1: near-ties stay neutral
    let recent_mood = if positive_count > challenging_count + 1 {
        Mood::Positive
    } else if challenging_count > positive_count + 1 {
        Mood::Challenging
    } else {
        Mood::Neutral
    };

    let mut dominant_emotions = Vec::new();
    if positive_count > 2 {
        dominant_emotions.push("gratitude".to_string());
        dominant_emotions.push("joy".to_string());
    }
    if challenging_count > 2 {
        dominant_emotions.push("processing challenges".to_string());
    }
    if lexicon::contains_any(&body, lexicon::SPIRITUAL_MARKERS) {
        dominant_emotions.push("spiritual seeking".to_string());
    }

    let mut recurring_themes = Vec::new();
    lexicon::apply_rules(&combined, lexicon::THEME_RULES, &mut recurring_themes);

    EmotionalState {
        recent_mood,
        dominant_emotions,
        recurring_themes,
    }
}

/// 0-100 measure of how close journaling frequency is to a daily-since-signup
/// expectation. The denominator floors at 1 so a brand-new account with one
/// entry scores 100 instead of being penalized.
pub fn consistency_score(entry_count: usize, days_active: i64) -> u8 {
    let expected = days_active.clamp(0, CONSISTENCY_WINDOW_DAYS);
    let ratio = entry_count as f64 / expected.max(1) as f64 * 100.0;
    ratio.min(100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(content: &str, gratitude: &[&str]) -> JournalEntry {
        JournalEntry {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.to_string(),
            gratitude: gratitude.iter().map(|g| g.to_string()).collect(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_empty_journal_is_neutral() {
        let state = analyze_entries(&[]);
        assert_eq!(state.recent_mood, Mood::Neutral);
        assert!(state.dominant_emotions.is_empty());
        assert!(state.recurring_themes.is_empty());
    }

    #[test]
    fn test_grateful_and_at_peace_is_positive() {
        // positive count 2 ("grateful", "peace"), challenging 0: 2 > 0 + 1
        let entries = [entry("I felt grateful and at peace today", &[])];
        let state = analyze_entries(&entries);
        assert_eq!(state.recent_mood, Mood::Positive);
        // needs > 2 positives to add dominant emotion tags
        assert!(state.dominant_emotions.is_empty());
        assert!(state.recurring_themes.is_empty());
    }

    #[test]
    fn test_near_tie_stays_neutral() {
        // one positive, no challenging: 1 > 0 + 1 is false
        let entries = [entry("Feeling calm this morning", &[])];
        assert_eq!(analyze_entries(&entries).recent_mood, Mood::Neutral);

        // two challenging, one positive: 2 > 1 + 1 is false
        let entries = [entry("happy but sad and worried", &[])];
        assert_eq!(analyze_entries(&entries).recent_mood, Mood::Neutral);
    }

    #[test]
    fn test_challenging_mood() {
        let entries = [entry("sad, angry and frustrated all week", &[])];
        assert_eq!(analyze_entries(&entries).recent_mood, Mood::Challenging);
    }

    #[test]
    fn test_gratitude_counts_positive_only() {
        // "stressed" in a gratitude phrase must not count as challenging
        let entries = [entry("an ordinary day", &["less stressed than before", "joy", "love", "calm"])];
        let state = analyze_entries(&entries);
        assert_eq!(state.recent_mood, Mood::Positive);
        assert_eq!(
            state.dominant_emotions,
            vec!["gratitude".to_string(), "joy".to_string()]
        );
    }

    #[test]
    fn test_dominant_emotions_are_additive() {
        let entries = [entry(
            "happy and excited but also sad, worried and stressed; meditation helped. \
             so much love and joy underneath",
            &[],
        )];
        let state = analyze_entries(&entries);
        assert_eq!(
            state.dominant_emotions,
            vec![
                "gratitude".to_string(),
                "joy".to_string(),
                "processing challenges".to_string(),
                "spiritual seeking".to_string(),
            ]
        );
    }

    #[test]
    fn test_recurring_themes() {
        let entries = [
            entry("my relationship with my family has shifted", &[]),
            entry("new goal at work", &[]),
        ];
        let state = analyze_entries(&entries);
        assert_eq!(
            state.recurring_themes,
            vec![
                "relationships".to_string(),
                "career".to_string(),
                "family dynamics".to_string(),
                "personal goals".to_string(),
            ]
        );
    }

    #[test]
    fn test_only_recent_entries_are_read() {
        let mut entries = vec![entry("nothing in particular", &[]); RECENT_ENTRY_WINDOW];
        entries.push(entry("joy love happy excited", &[]));
        // the emotional entry is 11th, outside the window
        assert_eq!(analyze_entries(&entries).recent_mood, Mood::Neutral);
    }

    #[test]
    fn test_consistency_floors_denominator() {
        // day 1, one entry: expected floors at 1, 1/1 -> 100
        assert_eq!(consistency_score(1, 0), 100);
        // 6 entries within 3 days: capped at 100
        assert_eq!(consistency_score(6, 3), 100);
    }

    #[test]
    fn test_consistency_caps_window_at_30_days() {
        // 15 entries over 60 days: expected = 30, 15/30 -> 50
        assert_eq!(consistency_score(15, 60), 50);
    }

    #[test]
    fn test_consistency_zero_entries() {
        assert_eq!(consistency_score(0, 10), 0);
    }

    #[test]
    fn test_consistency_rounds() {
        // 1/3 -> 33.33 -> 33
        assert_eq!(consistency_score(1, 3), 33);
        // 2/3 -> 66.67 -> 67
        assert_eq!(consistency_score(2, 3), 67);
    }
}
