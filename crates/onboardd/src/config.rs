//! Configuration management for onboardd.
//!
//! Loads settings from /etc/onboard/config.toml or uses defaults.
//! Chat credentials can also come from SLACK_* environment variables.

use anyhow::{Context, Result};
use onboard_common::clock::{Clock, DEFAULT_UTC_OFFSET_HOURS};
use onboard_common::reminders::{ReminderPolicy, DEFAULT_LEAD_DAYS};
use onboard_common::{ConfidenceRules, KnowledgeBase, TemplateCatalog, DEFAULT_BIND_ADDR};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path
pub const CONFIG_PATH: &str = "/etc/onboard/config.toml";

/// Default config file path for fallback
pub const DEFAULT_CONFIG_PATH: &str = "/var/lib/onboard/config.toml";

/// HTTP server and storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_db_path() -> String {
    "/var/lib/onboard/onboard.db".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            db_path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Offset from UTC used for "today" and timestamps
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,
}

fn default_utc_offset() -> i32 {
    DEFAULT_UTC_OFFSET_HOURS
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset(),
        }
    }
}

impl ClockConfig {
    pub fn clock(&self) -> Clock {
        Clock::with_offset_hours(self.utc_offset_hours)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersConfig {
    /// Days before the due date on which reminders go out
    #[serde(default = "default_lead_days")]
    pub lead_days: Vec<i64>,

    #[serde(default = "default_window_before")]
    pub window_before_days: i64,

    #[serde(default = "default_window_after")]
    pub window_after_days: i64,
}

fn default_lead_days() -> Vec<i64> {
    DEFAULT_LEAD_DAYS.to_vec()
}

fn default_window_before() -> i64 {
    1
}

fn default_window_after() -> i64 {
    7
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            lead_days: default_lead_days(),
            window_before_days: default_window_before(),
            window_after_days: default_window_after(),
        }
    }
}

impl RemindersConfig {
    pub fn policy(&self) -> ReminderPolicy {
        ReminderPolicy {
            lead_days: self.lead_days.clone(),
            window_before_days: self.window_before_days,
            window_after_days: self.window_after_days,
        }
    }
}

/// Where the template catalog and knowledge base come from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// YAML template catalog replacing the built-in one
    #[serde(default)]
    pub templates_path: Option<String>,

    /// YAML knowledge base replacing the built-in one
    #[serde(default)]
    pub knowledge_path: Option<String>,

    /// Overrides for the confidence downgrade words
    #[serde(default)]
    pub exception_words: Option<Vec<String>>,

    #[serde(default)]
    pub complexity_words: Option<Vec<String>>,
}

impl CatalogConfig {
    pub fn load_templates(&self) -> Result<TemplateCatalog> {
        match &self.templates_path {
            Some(path) => {
                let yaml = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read template catalog {}", path))?;
                let catalog = TemplateCatalog::from_yaml_str(&yaml)
                    .with_context(|| format!("Invalid template catalog {}", path))?;
                info!("Loaded {} templates from {}", catalog.len(), path);
                Ok(catalog)
            }
            None => Ok(TemplateCatalog::builtin()),
        }
    }

    pub fn load_knowledge(&self) -> Result<KnowledgeBase> {
        match &self.knowledge_path {
            Some(path) => {
                let yaml = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read knowledge base {}", path))?;
                let kb = KnowledgeBase::from_yaml_str(&yaml)
                    .with_context(|| format!("Invalid knowledge base {}", path))?;
                info!("Loaded {} knowledge topics from {}", kb.len(), path);
                Ok(kb)
            }
            None => Ok(KnowledgeBase::builtin()),
        }
    }

    pub fn rules(&self) -> ConfidenceRules {
        let mut rules = ConfidenceRules::default();
        if let Some(words) = &self.exception_words {
            rules.exception_words = words.iter().map(|w| w.to_lowercase()).collect();
        }
        if let Some(words) = &self.complexity_words {
            rules.complexity_words = words.iter().map(|w| w.to_lowercase()).collect();
        }
        rules
    }
}

/// Chat-platform delivery settings. Delivery is off unless both the bot token
/// and the signing secret are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub bot_token: Option<String>,

    #[serde(default)]
    pub signing_secret: Option<String>,

    /// Channel that receives new-ticket notices
    #[serde(default)]
    pub hr_channel_id: Option<String>,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Link target for "View all tickets"
    #[serde(default)]
    pub dashboard_url: Option<String>,

    #[serde(default = "default_chat_timeout")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://slack.com/api".to_string()
}

fn default_chat_timeout() -> u64 {
    10
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            signing_secret: None,
            hr_channel_id: None,
            api_base: default_api_base(),
            dashboard_url: None,
            timeout_secs: default_chat_timeout(),
        }
    }
}

impl ChatConfig {
    pub fn is_configured(&self) -> bool {
        non_empty(&self.bot_token) && non_empty(&self.signing_secret)
    }

    /// Overlay SLACK_* variables from `lookup` onto this config
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("SLACK_BOT_TOKEN").filter(|v| !v.is_empty()) {
            self.bot_token = Some(v);
        }
        if let Some(v) = lookup("SLACK_SIGNING_SECRET").filter(|v| !v.is_empty()) {
            self.signing_secret = Some(v);
        }
        if let Some(v) = lookup("SLACK_HR_CHANNEL_ID").filter(|v| !v.is_empty()) {
            self.hr_channel_id = Some(v);
        }
    }
}

fn non_empty(v: &Option<String>) -> bool {
    v.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
}

/// Full daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub clock: ClockConfig,

    #[serde(default)]
    pub reminders: RemindersConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

impl Config {
    /// Load config from the standard paths, or return defaults
    pub fn load() -> Self {
        let mut config = Self::load_from_path(CONFIG_PATH)
            .or_else(|_| Self::load_from_path(DEFAULT_CONFIG_PATH))
            .unwrap_or_else(|e| {
                warn!("Config not found, using defaults: {}", e);
                Config::default()
            });
        config.apply_env();
        config
    }

    /// Load config from an explicit path; failure is an error
    pub fn load_explicit(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::load_from_path(path)?;
        config.apply_env();
        Ok(config)
    }

    fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn apply_env(&mut self) {
        self.chat.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Save default config to path (for init)
    pub fn save_default(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(&Config::default())?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        info!("Saved default config to {}", path.display());
        Ok(())
    }
}
