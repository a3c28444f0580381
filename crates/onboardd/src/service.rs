//! Onboarding, reminder and escalation workflows.
//!
//! Handlers stay thin; everything that touches more than one table or
//! collaborator lives here.

use crate::server::AppState;
use onboard_common::api::{AskResponse, OnboardingDetail, PreviewResponse, RemindersResponse};
use onboard_common::blocks::{bot_response, user_message, Surface};
use onboard_common::reminders::ReminderMessage;
use onboard_common::{
    EscalationRequest, NewOnboarding, OnboardError, OnboardingRecord, OnboardingStatus,
    TaskRecord, Ticket, TicketStatus,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced by the workflows
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    Invalid(#[from] OnboardError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ServiceError {
    fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

// ============================================================================
// Onboarding lifecycle
// ============================================================================

pub fn create_onboarding(state: &AppState, req: NewOnboarding) -> ServiceResult<OnboardingRecord> {
    let req = req.validated()?;
    let created_at = state.clock.now().to_rfc3339();
    let record = state.store.create_onboarding(&req, &created_at)?;
    info!(
        "Onboarding {} created for {} ({}/{})",
        record.id, record.employee_name, record.role, record.grade
    );
    Ok(record)
}

pub fn get_onboarding(state: &AppState, id: &str) -> ServiceResult<OnboardingRecord> {
    state
        .store
        .get_onboarding(id)?
        .ok_or_else(|| ServiceError::not_found("onboarding", id))
}

/// Record, stored tasks and a fresh preview of the plan
pub fn detail(state: &AppState, id: &str) -> ServiceResult<OnboardingDetail> {
    let onboarding = get_onboarding(state, id)?;
    let tasks = state.store.list_tasks(id)?;
    let preview = state.generator.generate(
        &onboarding.role,
        &onboarding.grade,
        onboarding.start_date,
        &onboarding.language,
    );

    Ok(OnboardingDetail {
        onboarding,
        tasks,
        plan: preview.plan,
        template_used: preview.template_key,
    })
}

/// Approve a pending request and materialize its tasks.
///
/// Anything not PENDING is left untouched, so repeated approvals never
/// duplicate tasks. The status change and the task rows commit together.
pub fn approve(state: &AppState, id: &str) -> ServiceResult<OnboardingDetail> {
    let record = get_onboarding(state, id)?;
    if !record.is_pending() {
        debug!("Onboarding {} is {}; approve ignored", id, record.status);
        return detail(state, id);
    }

    let generation = state.generator.generate(
        &record.role,
        &record.grade,
        record.start_date,
        &record.language,
    );
    let rows = record.materialize(&generation.tasks);
    let Some(tasks) = state.store.approve_with_tasks(id, &rows)? else {
        debug!("Onboarding {} approved concurrently", id);
        return detail(state, id);
    };
    info!(
        "Onboarding {} approved: {} tasks from {}",
        id,
        tasks.len(),
        generation.template_key
    );

    detail(state, id)
}

/// Reject a pending request with a reason
pub fn reject(state: &AppState, id: &str, reason: &str) -> ServiceResult<OnboardingRecord> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(OnboardError::MissingField("reason").into());
    }

    let record = get_onboarding(state, id)?;
    if !record.is_pending() {
        debug!("Onboarding {} is {}; reject ignored", id, record.status);
        return Ok(record);
    }

    if state
        .store
        .transition_pending(id, OnboardingStatus::Rejected, Some(reason))?
    {
        info!("Onboarding {} rejected", id);
    }
    get_onboarding(state, id)
}

pub fn toggle_task(state: &AppState, id: &str) -> ServiceResult<TaskRecord> {
    let task = state
        .store
        .toggle_task(id)?
        .ok_or_else(|| ServiceError::not_found("task", id))?;
    debug!("Task {} done={}", task.id, task.is_done);
    Ok(task)
}

pub fn preview(
    state: &AppState,
    role: &str,
    grade: &str,
    start_date: chrono::NaiveDate,
    language: &str,
) -> PreviewResponse {
    let generation = state.generator.generate(role, grade, start_date, language);
    PreviewResponse {
        tasks: generation.tasks,
        plan: generation.plan,
        template_used: generation.template_key,
        language: generation.language,
    }
}

// ============================================================================
// Reminders
// ============================================================================

/// Tasks inside the reminder window around today
pub fn reminders(state: &AppState) -> ServiceResult<RemindersResponse> {
    let today = state.clock.today();
    let (start, end) = state.reminders.window(today);
    Ok(RemindersResponse {
        today,
        tasks: state.store.tasks_due_between(start, end)?,
        messages: Vec::new(),
    })
}

/// Build reminders for tasks due at each lead time and stamp them.
///
/// A task already reminded today is skipped, so running twice in one day
/// yields no new messages.
pub fn run_reminders(state: &AppState) -> ServiceResult<RemindersResponse> {
    let now = state.clock.now();
    let today = now.date_naive();
    let stamp = now.to_rfc3339();

    let mut messages: Vec<ReminderMessage> = Vec::new();
    for target in state.reminders.target_dates(today) {
        for task in state.store.open_tasks_due_on(target)? {
            if !state.reminders.is_due_for_reminder(&task, today) {
                continue;
            }
            state.store.mark_reminded(&task.id, &stamp)?;
            messages.push(ReminderMessage::for_task(&task));
        }
    }
    info!("Reminder run for {}: {} messages", today, messages.len());

    let mut listing = reminders(state)?;
    listing.messages = messages;
    Ok(listing)
}

// ============================================================================
// Chat and escalation
// ============================================================================

/// Answer a question and render it for the web surface.
///
/// With a channel and enabled delivery the chat-platform rendering is also
/// posted, without waiting for the platform.
pub fn ask(state: &AppState, question: &str, channel: Option<&str>) -> AskResponse {
    let result = state.resolver.resolve(question);
    debug!(
        "Resolved question: topic={:?} confidence={}",
        result.topic, result.confidence
    );

    if let Some(channel) = channel.filter(|_| state.delivery.is_enabled()) {
        let delivery = Arc::clone(&state.delivery);
        let channel = channel.to_string();
        let blocks = bot_response(&result, Surface::ChatPlatform);
        tokio::spawn(async move {
            if let Err(e) = delivery.deliver_response(&channel, &blocks).await {
                warn!("Failed to deliver answer to {}: {:#}", channel, e);
            }
        });
    }

    AskResponse {
        escalate: result.needs_escalation(),
        user_blocks: user_message(question),
        bot_blocks: bot_response(&result, Surface::Web),
        result,
    }
}

/// Open a ticket and announce it to HR in the background
pub fn escalate(state: &AppState, req: &EscalationRequest) -> ServiceResult<Ticket> {
    let question = req.question_text()?;
    let created_at = state.clock.now().to_rfc3339();
    let ticket = state.store.create_ticket(
        req.source,
        &question,
        req.user_ref.as_deref(),
        req.channel_ref.as_deref(),
        &created_at,
    )?;
    info!("Ticket {} opened from {}", ticket.id, ticket.source);

    if state.delivery.is_enabled() {
        let delivery = Arc::clone(&state.delivery);
        let announced = ticket.clone();
        tokio::spawn(async move {
            if let Err(e) = delivery.notify_escalation(&announced).await {
                warn!("Failed to notify HR about ticket {}: {:#}", announced.id, e);
            }
        });
    }

    Ok(ticket)
}

pub fn list_tickets(state: &AppState) -> ServiceResult<Vec<Ticket>> {
    Ok(state.store.list_tickets()?)
}

pub fn resolve_ticket(state: &AppState, id: &str) -> ServiceResult<Ticket> {
    if !state.store.set_ticket_status(id, TicketStatus::Resolved)? {
        return Err(ServiceError::not_found("ticket", id));
    }
    info!("Ticket {} resolved", id);
    state
        .store
        .get_ticket(id)?
        .ok_or_else(|| ServiceError::not_found("ticket", id))
}
