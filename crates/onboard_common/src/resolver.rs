//! Question resolver: keyword matching with confidence downgrade.
//!
//! 1. Lowercase the question.
//! 2. Take the first knowledge entry (declaration order) with a keyword that
//!    occurs in the question.
//! 3. Exception or complexity words anywhere in the question force `low`.
//! 4. `low` answers carry the `escalate` suggestion.
//!
//! No input makes the resolver fail; an unmatched question gets a fixed
//! "cannot answer" result that asks for escalation.

use crate::knowledge::{Confidence, ConfidenceRules, KnowledgeBase};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Answer returned when no topic matches
pub const NO_ANSWER_TEXT: &str = "申し訳ございませんが、ご質問の内容について確実な回答を提供できません。\n\n人事部門にエスカレートして、適切な対応をさせていただきます。";

/// Follow-up the caller should offer alongside an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestedAction {
    Escalate,
}

impl fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Escalate => write!(f, "escalate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaResult {
    pub answer_text: String,
    pub confidence: Confidence,
    pub references: Vec<String>,
    pub suggested_actions: BTreeSet<SuggestedAction>,
    /// Topic of the matched entry; `None` when nothing matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl QaResult {
    fn no_match() -> Self {
        Self {
            answer_text: NO_ANSWER_TEXT.to_string(),
            confidence: Confidence::Low,
            references: Vec::new(),
            suggested_actions: BTreeSet::from([SuggestedAction::Escalate]),
            topic: None,
        }
    }

    /// Whether the caller must offer an escalation action
    pub fn needs_escalation(&self) -> bool {
        self.confidence == Confidence::Low || !self.suggested_actions.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct QuestionResolver {
    knowledge: Arc<KnowledgeBase>,
    rules: ConfidenceRules,
}

impl QuestionResolver {
    pub fn new(knowledge: Arc<KnowledgeBase>, rules: ConfidenceRules) -> Self {
        Self { knowledge, rules }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn resolve(&self, question: &str) -> QaResult {
        let normalized = question.to_lowercase();

        let Some(entry) = self
            .knowledge
            .all_entries()
            .iter()
            .find(|e| e.matches(&normalized))
        else {
            debug!("No topic matched; escalation suggested");
            return QaResult::no_match();
        };

        let confidence = if self.rules.should_downgrade(&normalized) {
            Confidence::Low
        } else {
            entry.base_confidence
        };

        let mut suggested_actions = BTreeSet::new();
        if confidence == Confidence::Low {
            suggested_actions.insert(SuggestedAction::Escalate);
        }

        debug!("Matched topic {} ({})", entry.topic, confidence);

        QaResult {
            answer_text: entry.answer.clone(),
            confidence,
            references: entry.references.clone(),
            suggested_actions,
            topic: Some(entry.topic.clone()),
        }
    }
}

impl Default for QuestionResolver {
    fn default() -> Self {
        Self::new(Arc::new(KnowledgeBase::builtin()), ConfidenceRules::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeEntry;

    #[test]
    fn test_base_confidence_low_entry() {
        let kb = KnowledgeBase::from_entries(vec![KnowledgeEntry::new(
            "visa",
            &["visa"],
            "Contact mobility.",
            &[],
            Confidence::Low,
        )])
        .unwrap();
        let resolver = QuestionResolver::new(Arc::new(kb), ConfidenceRules::default());

        let result = resolver.resolve("VISA renewal");
        assert_eq!(result.confidence, Confidence::Low);
        assert!(result.suggested_actions.contains(&SuggestedAction::Escalate));
        assert_eq!(result.answer_text, "Contact mobility.");
    }

    #[test]
    fn test_empty_rules_never_downgrade() {
        let resolver = QuestionResolver::new(
            Arc::new(KnowledgeBase::builtin()),
            ConfidenceRules::new(&[], &[]),
        );
        let result = resolver.resolve("attendance in a special case");
        assert_eq!(result.confidence, Confidence::High);
        assert!(!result.needs_escalation());
    }

    #[test]
    fn test_empty_question() {
        let result = QuestionResolver::default().resolve("");
        assert_eq!(result.topic, None);
        assert!(result.needs_escalation());
    }

    #[test]
    fn test_suggested_action_serializes_lowercase() {
        let json = serde_json::to_string(&SuggestedAction::Escalate).unwrap();
        assert_eq!(json, "\"escalate\"");
    }
}
