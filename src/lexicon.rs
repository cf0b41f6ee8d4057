// Classification tables for the personalization engine
// Every keyword-presence heuristic lives here as an enumerated table so the
// vocabulary can be tested and extended without touching aggregation logic.

/// Positive emotion words, matched against journal body text plus gratitude phrases.
/// "peace" deliberately covers "peaceful" via substring matching.
pub const POSITIVE_WORDS: &[&str] = &[
    "happy",
    "grateful",
    "peace",
    "joy",
    "love",
    "excited",
    "calm",
];

/// Challenging emotion words, matched against journal body text only.
pub const CHALLENGING_WORDS: &[&str] = &[
    "sad",
    "angry",
    "frustrated",
    "anxious",
    "worried",
    "stressed",
];

/// Markers that indicate a contemplative practice, regardless of mood.
pub const SPIRITUAL_MARKERS: &[&str] = &["meditation", "spiritual"];

/// A keyword-presence rule: if any keyword appears, the tag applies.
pub struct TagRule {
    pub keywords: &'static [&'static str],
    pub tag: &'static str,
}

/// Recurring journal themes.
pub const THEME_RULES: &[TagRule] = &[
    TagRule { keywords: &["relationship"], tag: "relationships" },
    TagRule { keywords: &["work", "job"], tag: "career" },
    TagRule { keywords: &["family"], tag: "family dynamics" },
    TagRule { keywords: &["goal", "dream"], tag: "personal goals" },
];

/// Coaching conversation topics.
pub const TOPIC_RULES: &[TagRule] = &[
    TagRule { keywords: &["childhood", "inner child"], tag: "inner child work" },
    TagRule { keywords: &["shadow", "trigger"], tag: "shadow integration" },
    TagRule { keywords: &["purpose", "calling"], tag: "life purpose" },
    TagRule { keywords: &["relationship"], tag: "relationships" },
];

/// Current challenges surfacing in coaching conversations.
pub const CHALLENGE_RULES: &[TagRule] = &[
    TagRule { keywords: &["stuck", "struggle"], tag: "feeling stuck" },
    TagRule { keywords: &["fear", "afraid"], tag: "working with fear" },
];

/// Breakthrough moments in coaching conversations.
pub const BREAKTHROUGH_RULES: &[TagRule] = &[
    TagRule { keywords: &["insight", "realized"], tag: "new awareness" },
    TagRule { keywords: &["better", "improved"], tag: "positive change" },
];

/// True if any of the keywords appears in the (already lower-cased) text.
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

/// Count how many distinct keywords appear in the text (presence, not frequency).
pub fn count_present(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text.contains(*kw)).count()
}

/// Apply a rule table to a message, pushing matched tags into `out`.
/// Tags are deduplicated preserving first-seen order.
pub fn apply_rules(text: &str, rules: &[TagRule], out: &mut Vec<String>) {
    for rule in rules {
        if contains_any(text, rule.keywords) && !out.iter().any(|t| t == rule.tag) {
            out.push(rule.tag.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_is_presence_not_frequency() {
        // "joy" three times still counts once
        let text = "joy joy joy";
        assert_eq!(count_present(text, POSITIVE_WORDS), 1);
    }

    #[test]
    fn test_peace_covers_peaceful() {
        assert!(contains_any("feeling peaceful today", POSITIVE_WORDS));
        assert!(contains_any("at peace with it", POSITIVE_WORDS));
    }

    #[test]
    fn test_apply_rules_dedupes_first_seen() {
        let mut tags = Vec::new();
        apply_rules("my relationship with work", THEME_RULES, &mut tags);
        apply_rules("relationship again", THEME_RULES, &mut tags);
        assert_eq!(tags, vec!["relationships".to_string(), "career".to_string()]);
    }

    #[test]
    fn test_rules_are_independent() {
        let mut topics = Vec::new();
        let mut challenges = Vec::new();
        let mut breakthroughs = Vec::new();
        let msg = "i finally realized i've been stuck in old patterns";
        apply_rules(msg, TOPIC_RULES, &mut topics);
        apply_rules(msg, CHALLENGE_RULES, &mut challenges);
        apply_rules(msg, BREAKTHROUGH_RULES, &mut breakthroughs);
        assert!(topics.is_empty());
        assert_eq!(challenges, vec!["feeling stuck".to_string()]);
        assert_eq!(breakthroughs, vec!["new awareness".to_string()]);
    }
}
