//! Terminal rendering for onboardctl.
//!
//! Every renderer returns a String so the commands decide where it goes.

use onboard_common::api::{AskResponse, HealthResponse, OnboardingDetail, RemindersResponse};
use onboard_common::reminders::ReminderMessage;
use onboard_common::{
    Confidence, DayPlan, GeneratedTask, OnboardingRecord, OnboardingStatus, Plan, TaskRecord,
    Ticket, TicketStatus,
};
use owo_colors::OwoColorize;
use std::fmt::Write;

const SEPARATOR: &str = "----------------------------------------";

fn status_badge(status: OnboardingStatus) -> String {
    match status {
        OnboardingStatus::Pending => format!("[{}]", status.yellow()),
        OnboardingStatus::Approved => format!("[{}]", status.green()),
        OnboardingStatus::Rejected => format!("[{}]", status.red()),
    }
}

fn ticket_badge(status: TicketStatus) -> String {
    match status {
        TicketStatus::Open => format!("[{}]", status.yellow()),
        TicketStatus::Resolved => format!("[{}]", status.green()),
    }
}

fn checkbox(done: bool) -> String {
    if done {
        format!("[{}]", "x".green())
    } else {
        "[ ]".to_string()
    }
}

pub fn health(h: &HealthResponse, url: &str) -> String {
    let delivery = if h.chat_delivery {
        "enabled".green().to_string()
    } else {
        "disabled".dimmed().to_string()
    };
    format!(
        "{} onboardd v{} at {}\n  uptime:      {}s\n  templates:   {}\n  topics:      {}\n  chat:        {}",
        "[OK]".green(),
        h.version,
        url,
        h.uptime_seconds,
        h.templates,
        h.knowledge_topics,
        delivery
    )
}

pub fn onboarding_line(r: &OnboardingRecord) -> String {
    format!(
        "{} {}  {} (mgr {})  {}/{}  start {}  lang {}",
        status_badge(r.status),
        r.id.dimmed(),
        r.employee_name.bold(),
        r.manager_name,
        r.role,
        r.grade,
        r.start_date,
        r.language
    )
}

pub fn onboarding_list(records: &[OnboardingRecord]) -> String {
    if records.is_empty() {
        return "No onboarding requests.".dimmed().to_string();
    }
    records
        .iter()
        .map(onboarding_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn task_line(t: &TaskRecord) -> String {
    format!(
        "  {} {}  {}  ({})  {}",
        checkbox(t.is_done),
        t.due_date,
        t.title.bold(),
        t.owner,
        t.id.dimmed()
    )
}

fn day_plan(out: &mut String, heading: &str, plan: &DayPlan) {
    let _ = writeln!(out, "  {}", heading.underline());
    let _ = writeln!(out, "    30: {}", plan.day30);
    let _ = writeln!(out, "    60: {}", plan.day60);
    let _ = writeln!(out, "    90: {}", plan.day90);
}

fn plan_section(out: &mut String, plan: &Plan) {
    let _ = writeln!(out, "{}", "30/60/90 plan".bold());
    day_plan(out, "Employee", &plan.employee);
    day_plan(out, "Manager", &plan.manager);
}

pub fn detail(d: &OnboardingDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", onboarding_line(&d.onboarding));
    if let Some(reason) = &d.onboarding.rejection_reason {
        let _ = writeln!(out, "  reason: {}", reason.red());
    }
    let _ = writeln!(out, "  template: {}", d.template_used);
    let _ = writeln!(out, "{}", SEPARATOR.dimmed());

    if d.tasks.is_empty() {
        let _ = writeln!(out, "  {}", "No tasks yet (approve to generate).".dimmed());
    } else {
        for t in &d.tasks {
            let _ = writeln!(out, "{}", task_line(t));
        }
    }
    let _ = writeln!(out, "{}", SEPARATOR.dimmed());
    plan_section(&mut out, &d.plan);
    out.trim_end().to_string()
}

pub fn task(t: &TaskRecord) -> String {
    task_line(t).trim_start().to_string()
}

fn reminder_line(m: &ReminderMessage) -> String {
    format!("  -> {}: {}\n     {}", m.to.bold(), m.title, m.body.dimmed())
}

pub fn reminders(r: &RemindersResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tasks around {}", r.today.to_string().bold());
    if r.tasks.is_empty() {
        let _ = writeln!(out, "  {}", "Nothing due.".dimmed());
    }
    for t in &r.tasks {
        let _ = writeln!(out, "{}", task_line(t));
    }
    if !r.messages.is_empty() {
        let _ = writeln!(out, "{}", SEPARATOR.dimmed());
        let _ = writeln!(out, "Sent {} reminder(s)", r.messages.len());
        for m in &r.messages {
            let _ = writeln!(out, "{}", reminder_line(m));
        }
    }
    out.trim_end().to_string()
}

pub fn answer(a: &AskResponse) -> String {
    let mut out = String::new();
    let badge = match a.result.confidence {
        Confidence::High => "[HIGH]".green().to_string(),
        Confidence::Low => "[LOW]".yellow().to_string(),
    };
    let topic = a.result.topic.as_deref().unwrap_or("-");
    let _ = writeln!(out, "{} topic: {}", badge, topic);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", a.result.answer_text);

    if !a.result.references.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "References:");
        for r in &a.result.references {
            let _ = writeln!(out, "  * {}", r.cyan());
        }
    }
    if a.escalate {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{} Not sure about this one. Run `onboardctl escalate` to ask HR.",
            "[NOTE]".yellow()
        );
    }
    out.trim_end().to_string()
}

pub fn ticket_line(t: &Ticket) -> String {
    format!(
        "{} #{}  {}  {}  {}",
        ticket_badge(t.status),
        t.short_id().bold(),
        t.created_at.dimmed(),
        t.source,
        t.question
    )
}

pub fn ticket_list(tickets: &[Ticket]) -> String {
    if tickets.is_empty() {
        return "No tickets.".dimmed().to_string();
    }
    tickets.iter().map(ticket_line).collect::<Vec<_>>().join("\n")
}

pub fn preview(template: &str, language: &str, tasks: &[GeneratedTask], plan: &Plan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "template: {}  lang: {}", template.bold(), language);
    let _ = writeln!(out, "{}", SEPARATOR.dimmed());
    for t in tasks {
        let _ = writeln!(
            out,
            "  {}  {:<8}  {}\n            {}",
            t.due_date,
            t.owner.as_str(),
            t.title.bold(),
            t.description.dimmed()
        );
    }
    let _ = writeln!(out, "{}", SEPARATOR.dimmed());
    plan_section(&mut out, plan);
    out.trim_end().to_string()
}

pub fn error(message: &str) -> String {
    format!("[ERROR] {}", message.red())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use onboard_common::{QuestionResolver, TaskGenerator};

    fn record(status: OnboardingStatus) -> OnboardingRecord {
        OnboardingRecord {
            id: "abc".to_string(),
            created_at: "2024-01-01T00:00:00+09:00".to_string(),
            employee_name: "Aiko".to_string(),
            manager_name: "Ken".to_string(),
            role: "eng".to_string(),
            grade: "newgrad".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            language: "en".to_string(),
            status,
            rejection_reason: None,
        }
    }

    #[test]
    fn test_onboarding_line() {
        let line = onboarding_line(&record(OnboardingStatus::Approved));
        assert!(line.contains("APPROVED"));
        assert!(line.contains("Aiko"));
        assert!(line.contains("eng/newgrad"));
        assert!(line.contains("2024-01-15"));
    }

    #[test]
    fn test_empty_lists() {
        assert!(onboarding_list(&[]).contains("No onboarding requests."));
        assert!(ticket_list(&[]).contains("No tickets."));
    }

    #[test]
    fn test_answer_suggests_escalation() {
        let result = QuestionResolver::default().resolve("what is the weather");
        let response = AskResponse {
            escalate: result.needs_escalation(),
            user_blocks: Vec::new(),
            bot_blocks: Vec::new(),
            result,
        };
        let text = answer(&response);
        assert!(text.contains("[LOW]"));
        assert!(text.contains("onboardctl escalate"));
    }

    #[test]
    fn test_preview_lists_tasks_and_plan() {
        let gen = TaskGenerator::default().generate(
            "eng",
            "newgrad",
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            "en",
        );
        let text = preview(&gen.template_key, &gen.language, &gen.tasks, &gen.plan);
        assert!(text.contains("eng_newgrad"));
        assert!(text.contains("2024-01-22"));
        assert!(text.contains("Set up dev environment"));
        assert!(text.contains("30/60/90 plan"));
    }
}
