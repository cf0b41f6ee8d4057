//! Conversation-pattern analyzer
//!
//! Summarizes coaching history for one coach type: session count plus topic,
//! challenge, and breakthrough tags mined from what the user (not the coach)
//! said. The classifiers are independent, so one message can land in several
//! categories at once.

use crate::db::ConversationSession;
use crate::lexicon;
use serde::{Deserialize, Serialize};

const MAX_TOPICS: usize = 3;
const MAX_BREAKTHROUGHS: usize = 2;
const MAX_CHALLENGES: usize = 2;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConversationHistory {
    pub session_count: usize,
    pub last_topics: Vec<String>,
    pub breakthroughs: Vec<String>,
    pub current_challenges: Vec<String>,
}

impl ConversationHistory {
    pub fn empty() -> Self {
        Self {
            session_count: 0,
            last_topics: Vec::new(),
            breakthroughs: Vec::new(),
            current_challenges: Vec::new(),
        }
    }
}

/// Analyze sessions already filtered to a single coach type by the caller.
pub fn analyze_sessions(sessions: &[ConversationSession]) -> ConversationHistory {
    if sessions.is_empty() {
        return ConversationHistory::empty();
    }

    let mut topics = Vec::new();
    let mut challenges = Vec::new();
    let mut breakthroughs = Vec::new();

    for session in sessions {
        for turn in &session.turns {
            if turn.role != "user" {
                continue;
            }
            let message = turn.content.to_lowercase();
            lexicon::apply_rules(&message, lexicon::TOPIC_RULES, &mut topics);
            lexicon::apply_rules(&message, lexicon::CHALLENGE_RULES, &mut challenges);
            lexicon::apply_rules(&message, lexicon::BREAKTHROUGH_RULES, &mut breakthroughs);
        }
    }

    topics.truncate(MAX_TOPICS);
    breakthroughs.truncate(MAX_BREAKTHROUGHS);
    challenges.truncate(MAX_CHALLENGES);

    ConversationHistory {
        session_count: sessions.len(),
        last_topics: topics,
        breakthroughs,
        current_challenges: challenges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Turn;

    fn session(turns: &[(&str, &str)]) -> ConversationSession {
        ConversationSession {
            id: uuid::Uuid::new_v4().to_string(),
            coach_type: "inner_child".to_string(),
            turns: turns
                .iter()
                .map(|(role, content)| Turn {
                    role: role.to_string(),
                    content: content.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_no_sessions_is_empty() {
        let history = analyze_sessions(&[]);
        assert_eq!(history.session_count, 0);
        assert!(history.last_topics.is_empty());
        assert!(history.breakthroughs.is_empty());
        assert!(history.current_challenges.is_empty());
    }

    #[test]
    fn test_single_message_hits_multiple_categories() {
        let sessions = [session(&[(
            "user",
            "I finally realized I've been stuck in old patterns",
        )])];
        let history = analyze_sessions(&sessions);
        assert_eq!(history.session_count, 1);
        assert_eq!(history.breakthroughs, vec!["new awareness".to_string()]);
        assert_eq!(history.current_challenges, vec!["feeling stuck".to_string()]);
    }

    #[test]
    fn test_coach_turns_are_ignored() {
        let sessions = [session(&[
            ("coach", "Tell me about your childhood and what triggers you"),
            ("user", "Mostly I think about my purpose"),
        ])];
        let history = analyze_sessions(&sessions);
        assert_eq!(history.last_topics, vec!["life purpose".to_string()]);
    }

    #[test]
    fn test_topics_dedupe_and_truncate() {
        let sessions = [
            session(&[("user", "my childhood keeps coming up")]),
            session(&[("user", "I noticed a shadow side, a real trigger")]),
            session(&[("user", "childhood again, and my calling")]),
            session(&[("user", "also my relationship")]),
        ];
        let history = analyze_sessions(&sessions);
        assert_eq!(history.session_count, 4);
        // four candidate topics, deduped first-seen, capped at 3
        assert_eq!(
            history.last_topics,
            vec![
                "inner child work".to_string(),
                "shadow integration".to_string(),
                "life purpose".to_string(),
            ]
        );
    }

    #[test]
    fn test_challenge_cap() {
        let sessions = [session(&[
            ("user", "I feel stuck and I struggle daily"),
            ("user", "so afraid of what comes next"),
            ("user", "still stuck"),
        ])];
        let history = analyze_sessions(&sessions);
        assert_eq!(
            history.current_challenges,
            vec!["feeling stuck".to_string(), "working with fear".to_string()]
        );
    }
}
