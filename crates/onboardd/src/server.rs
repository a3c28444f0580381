//! HTTP server for onboardd

use crate::config::Config;
use crate::delivery::{self, ChatDelivery};
use crate::routes;
use crate::store::Store;
use anyhow::{Context, Result};
use axum::Router;
use onboard_common::clock::Clock;
use onboard_common::reminders::ReminderPolicy;
use onboard_common::{QuestionResolver, TaskGenerator};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    pub store: Store,
    pub generator: TaskGenerator,
    pub resolver: QuestionResolver,
    pub delivery: Arc<dyn ChatDelivery>,
    pub clock: Clock,
    pub reminders: ReminderPolicy,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        store: Store,
        generator: TaskGenerator,
        resolver: QuestionResolver,
        delivery: Arc<dyn ChatDelivery>,
    ) -> Self {
        Self {
            store,
            generator,
            resolver,
            delivery,
            clock: Clock::default(),
            reminders: ReminderPolicy::default(),
            start_time: Instant::now(),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_reminders(mut self, policy: ReminderPolicy) -> Self {
        self.reminders = policy;
        self
    }

    /// Build state from config: catalogs, store and chat delivery.
    ///
    /// A catalog that fails to parse or validate aborts startup.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = config.catalog.load_templates()?;
        let knowledge = config.catalog.load_knowledge()?;
        info!(
            "Catalog ready: {} templates, {} knowledge topics",
            catalog.len(),
            knowledge.len()
        );

        let store = Store::open(&config.server.db_path)?;
        let delivery = delivery::from_config(&config.chat)?;

        Ok(Self::new(
            store,
            TaskGenerator::new(Arc::new(catalog)),
            QuestionResolver::new(Arc::new(knowledge), config.catalog.rules()),
            delivery,
        )
        .with_clock(config.clock.clock())
        .with_reminders(config.reminders.policy()))
    }
}

/// Assemble the full router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::onboarding_routes())
        .merge(routes::task_routes())
        .merge(routes::reminder_routes())
        .merge(routes::template_routes())
        .merge(routes::chat_routes())
        .merge(routes::ticket_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until Ctrl-C
pub async fn run(state: AppState, addr: &str) -> Result<()> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
