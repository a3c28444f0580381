//! Ticket types for HR escalations.
//!
//! A low-confidence chat answer can be escalated by the user, which opens a
//! ticket for a human in HR. The resolver never creates tickets itself.

use crate::error::{OnboardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Question recorded when a chat-platform escalation carries no text
pub const FALLBACK_QUESTION: &str = "Escalated from Slack";

/// Channel the escalation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketSource {
    #[default]
    Web,
    Slack,
}

impl TicketSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Slack => "slack",
        }
    }
}

impl fmt::Display for TicketSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketSource {
    type Err = OnboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "web" => Ok(Self::Web),
            "slack" => Ok(Self::Slack),
            other => Err(OnboardError::UnknownValue {
                kind: "ticket source",
                value: other.to_string(),
            }),
        }
    }
}

/// Ticket status in the HR queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Waiting for HR
    #[default]
    Open,
    /// Handled by HR
    Resolved,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Resolved => "RESOLVED",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = OnboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "OPEN" => Ok(Self::Open),
            "RESOLVED" => Ok(Self::Resolved),
            other => Err(OnboardError::UnknownValue {
                kind: "ticket status",
                value: other.to_string(),
            }),
        }
    }
}

/// What the caller hands over when the user presses "Escalate to HR"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EscalationRequest {
    #[serde(default)]
    pub source: TicketSource,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub user_ref: Option<String>,
    #[serde(default)]
    pub channel_ref: Option<String>,
}

impl EscalationRequest {
    pub fn web(question: impl Into<String>) -> Self {
        Self {
            source: TicketSource::Web,
            question: question.into(),
            user_ref: None,
            channel_ref: None,
        }
    }

    /// Question text to store; chat-platform escalations may arrive without one
    pub fn question_text(&self) -> Result<String> {
        let q = self.question.trim();
        if !q.is_empty() {
            return Ok(q.to_string());
        }
        match self.source {
            TicketSource::Slack => Ok(FALLBACK_QUESTION.to_string()),
            TicketSource::Web => Err(OnboardError::MissingField("question")),
        }
    }
}

/// A stored HR ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub created_at: String,
    pub source: TicketSource,
    pub question: String,
    pub user_ref: Option<String>,
    pub channel_ref: Option<String>,
    pub status: TicketStatus,
}

impl Ticket {
    /// First eight characters of the id, as shown to users
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    pub fn is_open(&self) -> bool {
        self.status == TicketStatus::Open
    }

    /// Acknowledgement shown to the user who escalated
    pub fn confirmation(&self) -> String {
        format!(
            "✅ Escalated to HR. Ticket #{} created. HR will follow up soon.",
            self.short_id()
        )
    }
}
