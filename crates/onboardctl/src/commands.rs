//! Command implementations for onboardctl

use crate::client::OnboardClient;
use crate::output;
use anyhow::{Context, Result};
use onboard_common::clock::parse_date;
use onboard_common::{
    EscalationRequest, NewOnboarding, TaskGenerator, TemplateCatalog, TicketSource,
};
use owo_colors::OwoColorize;
use std::path::Path;
use std::sync::Arc;

/// Fields for `onboardctl create`
pub struct CreateArgs {
    pub employee: String,
    pub manager: String,
    pub role: String,
    pub grade: String,
    pub start: String,
    pub lang: String,
}

pub async fn status(client: &OnboardClient, url: &str) -> Result<()> {
    let health = client.health().await?;
    println!("{}", output::health(&health, url));
    Ok(())
}

pub async fn list(client: &OnboardClient) -> Result<()> {
    let records = client.list_onboardings().await?;
    println!("{}", output::onboarding_list(&records));
    Ok(())
}

pub async fn create(client: &OnboardClient, args: CreateArgs) -> Result<()> {
    let req = NewOnboarding {
        employee_name: args.employee,
        manager_name: args.manager,
        role: args.role,
        grade: args.grade,
        start_date: parse_date(&args.start)?,
        language: args.lang,
    };
    let record = client.create_onboarding(&req).await?;
    println!("{} Created onboarding request", "[OK]".green());
    println!("{}", output::onboarding_line(&record));
    Ok(())
}

pub async fn show(client: &OnboardClient, id: &str) -> Result<()> {
    let detail = client.detail(id).await?;
    println!("{}", output::detail(&detail));
    Ok(())
}

pub async fn approve(client: &OnboardClient, id: &str) -> Result<()> {
    let detail = client.approve(id).await?;
    println!("{}", output::detail(&detail));
    Ok(())
}

pub async fn reject(client: &OnboardClient, id: &str, reason: &str) -> Result<()> {
    let record = client.reject(id, reason).await?;
    println!("{}", output::onboarding_line(&record));
    Ok(())
}

pub async fn toggle(client: &OnboardClient, id: &str) -> Result<()> {
    let task = client.toggle_task(id).await?;
    println!("{}", output::task(&task));
    Ok(())
}

pub async fn reminders(client: &OnboardClient, run: bool) -> Result<()> {
    let listing = if run {
        client.run_reminders().await?
    } else {
        client.reminders().await?
    };
    println!("{}", output::reminders(&listing));
    Ok(())
}

pub async fn ask(client: &OnboardClient, question: &str) -> Result<()> {
    let answer = client.ask(question).await?;
    println!("{}", output::answer(&answer));
    Ok(())
}

pub async fn escalate(client: &OnboardClient, question: &str, user: Option<String>) -> Result<()> {
    let req = EscalationRequest {
        source: TicketSource::Web,
        question: question.to_string(),
        user_ref: user,
        channel_ref: None,
    };
    let created = client.escalate(&req).await?;
    println!("{}", created.message);
    Ok(())
}

pub async fn tickets(client: &OnboardClient, open_only: bool) -> Result<()> {
    let mut tickets = client.tickets().await?;
    if open_only {
        tickets.retain(|t| t.is_open());
    }
    println!("{}", output::ticket_list(&tickets));
    Ok(())
}

pub async fn resolve(client: &OnboardClient, id: &str) -> Result<()> {
    let ticket = client.resolve_ticket(id).await?;
    println!("{}", output::ticket_line(&ticket));
    Ok(())
}

/// Generate a checklist locally, without the daemon
pub fn preview(
    role: &str,
    grade: &str,
    start: &str,
    lang: &str,
    templates: Option<&Path>,
) -> Result<()> {
    let catalog = match templates {
        Some(path) => {
            let yaml = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            TemplateCatalog::from_yaml_str(&yaml)
                .with_context(|| format!("Invalid template catalog {}", path.display()))?
        }
        None => TemplateCatalog::builtin(),
    };

    let generation =
        TaskGenerator::new(Arc::new(catalog)).generate(role, grade, parse_date(start)?, lang);
    println!(
        "{}",
        output::preview(
            &generation.template_key,
            &generation.language,
            &generation.tasks,
            &generation.plan
        )
    );
    Ok(())
}
