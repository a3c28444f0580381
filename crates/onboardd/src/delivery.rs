//! Chat-platform delivery.
//!
//! The daemon never calls the chat platform directly; it goes through
//! `ChatDelivery` so that a deployment without credentials, and the tests,
//! can swap in an implementation that never touches the network.

use crate::config::ChatConfig;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use onboard_common::blocks::{escalation_notice, Block};
use onboard_common::{Ticket, TicketSource};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

// ============================================================================
// Delivery Trait
// ============================================================================

#[async_trait]
pub trait ChatDelivery: Send + Sync {
    /// Whether messages actually leave the process
    fn is_enabled(&self) -> bool;

    /// Post a block list into a channel
    async fn deliver_response(&self, channel: &str, blocks: &[Block]) -> Result<()>;

    /// Tell the HR channel that a ticket was opened
    async fn notify_escalation(&self, ticket: &Ticket) -> Result<()>;
}

/// Build the delivery matching `config`: Slack when fully configured, else disabled
pub fn from_config(config: &ChatConfig) -> Result<Arc<dyn ChatDelivery>> {
    if config.is_configured() {
        let slack = SlackDelivery::new(config)?;
        info!("Chat delivery enabled via {}", config.api_base);
        Ok(Arc::new(slack))
    } else {
        info!("Chat delivery disabled (no bot token or signing secret)");
        Ok(Arc::new(DisabledDelivery))
    }
}

// ============================================================================
// Disabled Delivery
// ============================================================================

/// Drops every message
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledDelivery;

#[async_trait]
impl ChatDelivery for DisabledDelivery {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn deliver_response(&self, channel: &str, _blocks: &[Block]) -> Result<()> {
        debug!("Chat delivery disabled; dropping response for {}", channel);
        Ok(())
    }

    async fn notify_escalation(&self, ticket: &Ticket) -> Result<()> {
        debug!("Chat delivery disabled; not announcing ticket {}", ticket.id);
        Ok(())
    }
}

// ============================================================================
// Slack Delivery
// ============================================================================

#[derive(Debug, Serialize)]
struct PostMessage<'a> {
    channel: &'a str,
    text: &'a str,
    blocks: &'a [Block],
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Posts through the Slack Web API
pub struct SlackDelivery {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    hr_channel: Option<String>,
    dashboard_url: Option<String>,
}

impl SlackDelivery {
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let bot_token = config
            .bot_token
            .clone()
            .ok_or_else(|| anyhow!("bot token not configured"))?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token,
            hr_channel: config.hr_channel_id.clone(),
            dashboard_url: config.dashboard_url.clone(),
        })
    }

    async fn post_message(&self, channel: &str, text: &str, blocks: &[Block]) -> Result<()> {
        let url = format!("{}/chat.postMessage", self.api_base);
        let reply: ApiReply = self
            .client
            .post(&url)
            .bearer_auth(&self.bot_token)
            .json(&PostMessage {
                channel,
                text,
                blocks,
            })
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?
            .error_for_status()?
            .json()
            .await
            .context("Malformed chat.postMessage reply")?;

        if !reply.ok {
            return Err(anyhow!(
                "chat.postMessage failed: {}",
                reply.error.unwrap_or_else(|| "unknown error".to_string())
            ));
        }
        debug!("Posted message to {}", channel);
        Ok(())
    }
}

#[async_trait]
impl ChatDelivery for SlackDelivery {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn deliver_response(&self, channel: &str, blocks: &[Block]) -> Result<()> {
        self.post_message(channel, "HR Bot", blocks).await
    }

    async fn notify_escalation(&self, ticket: &Ticket) -> Result<()> {
        let Some(channel) = self.hr_channel.as_deref() else {
            debug!("No HR channel configured; ticket {} not announced", ticket.id);
            return Ok(());
        };
        let blocks = escalation_notice(ticket, self.dashboard_url.as_deref());
        self.post_message(channel, &notice_text(ticket), &blocks).await
    }
}

/// Plain-text fallback shown in notifications for an HR notice
fn notice_text(ticket: &Ticket) -> String {
    let origin = match ticket.source {
        TicketSource::Slack => "Slack",
        TicketSource::Web => "the web",
    };
    format!("🚨 New HR ticket from {} (#{})", origin, ticket.short_id())
}

// ============================================================================
// Recording Delivery (Testing)
// ============================================================================

/// Something a `RecordingDelivery` was asked to send
#[derive(Debug, Clone, PartialEq)]
pub enum Delivered {
    Response { channel: String, blocks: Vec<Block> },
    Escalation { ticket_id: String },
}

/// Enabled delivery that keeps messages in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingDelivery {
    sent: Arc<Mutex<Vec<Delivered>>>,
}

impl RecordingDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Delivered> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn record(&self, item: Delivered) -> Result<()> {
        self.sent
            .lock()
            .map_err(|_| anyhow!("recording lock poisoned"))?
            .push(item);
        Ok(())
    }
}

#[async_trait]
impl ChatDelivery for RecordingDelivery {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn deliver_response(&self, channel: &str, blocks: &[Block]) -> Result<()> {
        self.record(Delivered::Response {
            channel: channel.to_string(),
            blocks: blocks.to_vec(),
        })
    }

    async fn notify_escalation(&self, ticket: &Ticket) -> Result<()> {
        self.record(Delivered::Escalation {
            ticket_id: ticket.id.clone(),
        })
    }
}
