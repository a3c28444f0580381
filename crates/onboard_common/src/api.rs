//! Request and response bodies for the onboardd HTTP API.

use crate::blocks::Block;
use crate::catalog::Plan;
use crate::generator::GeneratedTask;
use crate::onboarding::{OnboardingRecord, TaskRecord};
use crate::reminders::ReminderMessage;
use crate::resolver::QaResult;
use crate::ticket::Ticket;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub templates: usize,
    pub knowledge_topics: usize,
    pub chat_delivery: bool,
}

/// Onboarding request with its tasks and the plan preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingDetail {
    pub onboarding: OnboardingRecord,
    pub tasks: Vec<TaskRecord>,
    pub plan: Plan,
    pub template_used: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub tasks: Vec<GeneratedTask>,
    pub plan: Plan,
    pub template_used: String,
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersResponse {
    pub today: chrono::NaiveDate,
    pub tasks: Vec<TaskRecord>,
    /// Messages produced by a reminder run (empty for a plain listing)
    #[serde(default)]
    pub messages: Vec<ReminderMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// Chat-platform channel to deliver the answer to, if any
    #[serde(default)]
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub result: QaResult,
    pub escalate: bool,
    pub user_blocks: Vec<Block>,
    pub bot_blocks: Vec<Block>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalateResponse {
    pub ticket: Ticket,
    pub message: String,
}
