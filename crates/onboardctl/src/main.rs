//! onboardctl - CLI client for the onboarding tracker
//!
//! Talks to onboardd over HTTP. `preview` runs offline.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client::{OnboardClient, URL_ENV};
use onboard_common::{DEFAULT_BIND_ADDR, DEFAULT_LANGUAGE, VERSION};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "onboardctl")]
#[command(about = "HR onboarding tracker - control client", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Daemon URL (default: $ONBOARD_URL or http://127.0.0.1:8000)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show daemon health
    Status,

    /// List onboarding requests, newest first
    List,

    /// Submit a new onboarding request
    Create {
        #[arg(long)]
        employee: String,
        #[arg(long)]
        manager: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        grade: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        #[arg(long, default_value = DEFAULT_LANGUAGE)]
        lang: String,
    },

    /// Show a request with its tasks and 30/60/90 plan
    Show { id: String },

    /// Approve a pending request and generate its tasks
    Approve { id: String },

    /// Reject a pending request
    Reject {
        id: String,
        #[arg(long)]
        reason: String,
    },

    /// Mark a task done, or not done again
    Toggle { task_id: String },

    /// Show tasks due around today
    Reminders {
        /// Send reminders for tasks due at each lead time
        #[arg(long)]
        run: bool,
    },

    /// Ask the HR assistant a question
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Open an HR ticket
    Escalate {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
        /// Who is asking
        #[arg(long)]
        user: Option<String>,
    },

    /// List HR tickets
    Tickets {
        /// Only show open tickets
        #[arg(long)]
        open: bool,
    },

    /// Mark a ticket resolved
    Resolve { id: String },

    /// Preview a generated checklist locally
    Preview {
        #[arg(long)]
        role: String,
        #[arg(long)]
        grade: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        #[arg(long, default_value = DEFAULT_LANGUAGE)]
        lang: String,
        /// YAML template catalog instead of the built-in one
        #[arg(long)]
        templates: Option<PathBuf>,
    },
}

fn daemon_url(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var(URL_ENV).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| format!("http://{}", DEFAULT_BIND_ADDR))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{}", output::error(&format!("{:#}", e)));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let url = daemon_url(cli.url);
    let client = OnboardClient::new(&url)?;

    match cli.command {
        Commands::Status => commands::status(&client, &url).await,
        Commands::List => commands::list(&client).await,
        Commands::Create {
            employee,
            manager,
            role,
            grade,
            start,
            lang,
        } => {
            let args = commands::CreateArgs {
                employee,
                manager,
                role,
                grade,
                start,
                lang,
            };
            commands::create(&client, args).await
        }
        Commands::Show { id } => commands::show(&client, &id).await,
        Commands::Approve { id } => commands::approve(&client, &id).await,
        Commands::Reject { id, reason } => commands::reject(&client, &id, &reason).await,
        Commands::Toggle { task_id } => commands::toggle(&client, &task_id).await,
        Commands::Reminders { run } => commands::reminders(&client, run).await,
        Commands::Ask { question } => commands::ask(&client, &question.join(" ")).await,
        Commands::Escalate { question, user } => {
            commands::escalate(&client, &question.join(" "), user).await
        }
        Commands::Tickets { open } => commands::tickets(&client, open).await,
        Commands::Resolve { id } => commands::resolve(&client, &id).await,
        Commands::Preview {
            role,
            grade,
            start,
            lang,
            templates,
        } => commands::preview(&role, &grade, &start, &lang, templates.as_deref()),
    }
}
