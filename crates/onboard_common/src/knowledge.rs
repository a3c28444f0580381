//! QA knowledge base: topic -> trigger keywords, answer, references.
//!
//! Entry order matters. The resolver picks the first matching entry, so
//! `all_entries` always returns entries in declaration order.

use crate::error::{OnboardError, Result};
use crate::knowledge_data::{BUILTIN_KNOWLEDGE, COMPLEXITY_WORDS, EXCEPTION_WORDS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse trust level attached to an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One topic's keyword-to-answer binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub topic: String,
    /// Case-insensitive substring triggers (stored lowercased)
    pub keywords: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(alias = "confidence")]
    pub base_confidence: Confidence,
}

impl KnowledgeEntry {
    pub fn new(
        topic: impl Into<String>,
        keywords: &[&str],
        answer: impl Into<String>,
        references: &[&str],
        base_confidence: Confidence,
    ) -> Self {
        Self {
            topic: topic.into(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            answer: answer.into(),
            references: references.iter().map(|r| r.to_string()).collect(),
            base_confidence,
        }
    }

    /// True if any keyword occurs in an already-lowercased question
    pub fn matches(&self, normalized_question: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && normalized_question.contains(k.as_str()))
    }

    fn normalize(mut self) -> Self {
        self.keywords = self.keywords.iter().map(|k| k.to_lowercase()).collect();
        self
    }
}

/// Read-only, ordered knowledge base
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn builtin() -> Self {
        let entries = BUILTIN_KNOWLEDGE
            .iter()
            .map(|row| {
                KnowledgeEntry::new(
                    row.topic,
                    row.keywords,
                    row.answer,
                    row.references,
                    Confidence::High,
                )
            })
            .collect();
        Self { entries }
    }

    /// Build from explicit entries. Topics must be unique.
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.topic.as_str()) {
                return Err(OnboardError::Knowledge(format!(
                    "duplicate topic '{}'",
                    entry.topic
                )));
            }
            if entry.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(OnboardError::Knowledge(format!(
                    "topic '{}' has no keywords",
                    entry.topic
                )));
            }
        }

        Ok(Self {
            entries: entries.into_iter().map(KnowledgeEntry::normalize).collect(),
        })
    }

    /// Load an ordered list of entries from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let entries: Vec<KnowledgeEntry> = serde_yaml::from_str(yaml)?;
        Self::from_entries(entries)
    }

    /// Entries in declaration order
    pub fn all_entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn get(&self, topic: &str) -> Option<&KnowledgeEntry> {
        self.entries.iter().find(|e| e.topic == topic)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Words that force a matched answer down to low confidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceRules {
    /// Signals that the asker is in an exceptional situation
    pub exception_words: Vec<String>,
    /// Signals conditional or branching questions
    pub complexity_words: Vec<String>,
}

impl ConfidenceRules {
    pub fn new(exception_words: &[&str], complexity_words: &[&str]) -> Self {
        let lower = |words: &[&str]| words.iter().map(|w| w.to_lowercase()).collect();
        Self {
            exception_words: lower(exception_words),
            complexity_words: lower(complexity_words),
        }
    }

    pub fn has_exception(&self, normalized_question: &str) -> bool {
        contains_any(normalized_question, &self.exception_words)
    }

    pub fn has_complexity(&self, normalized_question: &str) -> bool {
        contains_any(normalized_question, &self.complexity_words)
    }

    pub fn should_downgrade(&self, normalized_question: &str) -> bool {
        self.has_exception(normalized_question) || self.has_complexity(normalized_question)
    }
}

impl Default for ConfidenceRules {
    fn default() -> Self {
        Self::new(EXCEPTION_WORDS, COMPLEXITY_WORDS)
    }
}

fn contains_any(haystack: &str, words: &[String]) -> bool {
    words
        .iter()
        .any(|w| !w.is_empty() && haystack.contains(w.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let kb = KnowledgeBase::builtin();
        let topics: Vec<&str> = kb.all_entries().iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(
            topics,
            vec!["attendance", "leave", "address", "onboarding", "training", "benefits"]
        );
    }

    #[test]
    fn test_keywords_are_lowercased() {
        let kb = KnowledgeBase::builtin();
        let leave = kb.get("leave").unwrap();
        assert!(leave.keywords.contains(&"pto".to_string()));
        assert!(leave.matches("how much pto do i get?"));
    }

    #[test]
    fn test_entry_matches_substring() {
        let entry = KnowledgeEntry::new("x", &["Clock"], "a", &[], Confidence::High);
        assert!(entry.matches("where do i clock in"));
        assert!(!entry.matches("where do i sign in"));
    }

    #[test]
    fn test_empty_keyword_never_matches() {
        let entry = KnowledgeEntry::new("x", &["", "vpn"], "a", &[], Confidence::High);
        assert!(!entry.matches("hello"));
        assert!(entry.matches("vpn access"));
    }

    #[test]
    fn test_rules_default() {
        let rules = ConfidenceRules::default();
        assert!(rules.has_exception("is there a special rule"));
        assert!(rules.has_exception("特別な休暇"));
        assert!(rules.has_complexity("場合によって"));
        assert!(rules.has_complexity("depending on the team"));
        assert!(!rules.should_downgrade("how do i apply for leave"));
    }

    #[test]
    fn test_from_yaml_normalizes_keywords() {
        let yaml = r#"
- topic: parking
  keywords: ["Parking", "駐車"]
  answer: "Ask facilities."
  references: ["[Facilities](https://example.com/facilities)"]
  confidence: low
"#;
        let kb = KnowledgeBase::from_yaml_str(yaml).unwrap();
        let entry = kb.get("parking").unwrap();
        assert_eq!(entry.keywords, vec!["parking", "駐車"]);
        assert_eq!(entry.base_confidence, Confidence::Low);
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let a = KnowledgeEntry::new("dup", &["a"], "a", &[], Confidence::High);
        let b = KnowledgeEntry::new("dup", &["b"], "b", &[], Confidence::High);
        assert!(KnowledgeBase::from_entries(vec![a, b]).is_err());
    }

    #[test]
    fn test_from_entries_rejects_keywordless_topic() {
        let a = KnowledgeEntry::new("empty", &[" "], "a", &[], Confidence::High);
        assert!(KnowledgeBase::from_entries(vec![a]).is_err());
    }
}
