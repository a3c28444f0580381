//! Presentation-agnostic message blocks.
//!
//! Modelled on chat-platform block layouts so the same structure can be shown
//! in the web chat or forwarded to a chat platform unchanged.

use crate::resolver::QaResult;
use crate::ticket::Ticket;
use serde::{Deserialize, Serialize};

/// Label on the escalation button
pub const ESCALATE_LABEL: &str = "Escalate to HR";

/// Where a block list will be displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Web,
    ChatPlatform,
}

impl Surface {
    /// Action id the escalation button reports back
    pub fn escalate_action_id(&self) -> &'static str {
        match self {
            Self::Web => "escalate",
            Self::ChatPlatform => "escalate_to_hr",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    Mrkdwn { text: String },
    PlainText { text: String },
}

impl TextObject {
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Mrkdwn { text } | Self::PlainText { text } => text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Default,
    Primary,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionElement {
    Button {
        text: TextObject,
        action_id: String,
        value: String,
        style: ButtonStyle,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section { text: TextObject },
    Context { elements: Vec<TextObject> },
    Divider,
    Actions { elements: Vec<ActionElement> },
}

impl Block {
    pub fn section(text: impl Into<String>) -> Self {
        Self::Section {
            text: TextObject::mrkdwn(text),
        }
    }

    pub fn context(elements: &[String]) -> Self {
        Self::Context {
            elements: elements.iter().map(TextObject::mrkdwn).collect(),
        }
    }

    pub fn escalate_button(surface: Surface) -> Self {
        Self::Actions {
            elements: vec![ActionElement::Button {
                text: TextObject::plain(ESCALATE_LABEL),
                action_id: surface.escalate_action_id().to_string(),
                value: "escalate".to_string(),
                style: ButtonStyle::Danger,
            }],
        }
    }

    /// True if this is an actions block offering escalation
    pub fn is_escalation(&self) -> bool {
        match self {
            Self::Actions { elements } => elements.iter().any(|e| match e {
                ActionElement::Button { action_id, .. } => action_id.starts_with("escalate"),
            }),
            _ => false,
        }
    }
}

/// Echo of the user's own message
pub fn user_message(text: &str) -> Vec<Block> {
    vec![Block::section(format!("*You:*\n{}", text))]
}

/// Render a QA result: answer, references, then escalation if needed
pub fn bot_response(result: &QaResult, surface: Surface) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(3);

    let text = match surface {
        Surface::Web => format!("*HR Bot:*\n{}", result.answer_text),
        Surface::ChatPlatform => result.answer_text.clone(),
    };
    blocks.push(Block::section(text));

    if !result.references.is_empty() {
        blocks.push(Block::context(&[references_text(&result.references)]));
    }

    if result.needs_escalation() {
        blocks.push(Block::escalate_button(surface));
    }

    blocks
}

/// Notice posted to the HR channel when a ticket is opened
pub fn escalation_notice(ticket: &Ticket, dashboard_url: Option<&str>) -> Vec<Block> {
    let user = ticket
        .user_ref
        .as_deref()
        .map(|u| format!("<@{}>", u))
        .unwrap_or_else(|| "-".to_string());
    let channel = ticket
        .channel_ref
        .as_deref()
        .map(|c| format!("<#{}>", c))
        .unwrap_or_else(|| "-".to_string());

    let mut blocks = vec![Block::section(format!(
        "*Ticket ID:* {}\n*Source:* {}\n*User:* {}\n*Channel:* {}\n*Question:* {}",
        ticket.short_id(),
        ticket.source,
        user,
        channel,
        ticket.question
    ))];

    if let Some(url) = dashboard_url {
        blocks.push(Block::context(&[format!(
            "View all tickets: <{}/tickets|Web Dashboard>",
            url.trim_end_matches('/')
        )]));
    }

    blocks
}

fn references_text(references: &[String]) -> String {
    let lines: Vec<String> = references.iter().map(|r| format!("• {}", r)).collect();
    format!("📚 *References:*\n{}", lines.join("\n"))
}
