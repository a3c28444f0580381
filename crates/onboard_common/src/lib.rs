//! Shared types and engines for the onboarding tracker.
//!
//! The core is four pure pieces over read-only data: the template catalog,
//! the task generator, the QA knowledge base and the question resolver.
//! Everything else here is plain records shared by the daemon and the CLI.

pub mod api;
pub mod blocks;
pub mod catalog;
mod catalog_data;
pub mod clock;
pub mod error;
pub mod generator;
pub mod knowledge;
mod knowledge_data;
pub mod onboarding;
pub mod reminders;
pub mod resolver;
pub mod ticket;

pub use catalog::{
    template_key, DayPlan, Plan, TaskOwner, TaskSpec, TemplateCatalog, TemplateEntry,
    TemplateVariant, DEFAULT_LANGUAGE, DEFAULT_TEMPLATE_KEY,
};
pub use error::OnboardError;
pub use generator::{GeneratedTask, Generation, TaskGenerator};
pub use knowledge::{Confidence, ConfidenceRules, KnowledgeBase, KnowledgeEntry};
pub use onboarding::{NewOnboarding, OnboardingRecord, OnboardingStatus, TaskRecord};
pub use resolver::{QaResult, QuestionResolver, SuggestedAction};
pub use ticket::{EscalationRequest, Ticket, TicketSource, TicketStatus};

/// Crate version, shared by the daemon health endpoint and the CLI
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default daemon address
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
