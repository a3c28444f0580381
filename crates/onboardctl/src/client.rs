//! HTTP client for communicating with onboardd.

use anyhow::{anyhow, Context, Result};
use onboard_common::api::{
    AskRequest, AskResponse, EscalateResponse, HealthResponse, OnboardingDetail, RejectRequest,
    RemindersResponse,
};
use onboard_common::{EscalationRequest, NewOnboarding, OnboardingRecord, TaskRecord, Ticket};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Environment variable that overrides the daemon URL
pub const URL_ENV: &str = "ONBOARD_URL";

/// Client for the onboardd HTTP API
pub struct OnboardClient {
    http: reqwest::Client,
    base: String,
}

impl OnboardClient {
    pub fn new(base: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.unreachable(e))?;
        Self::decode(resp).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let mut req = self.http.post(self.url(path));
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.map_err(|e| self.unreachable(e))?;
        Self::decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!("{} ({})", text.trim(), status));
        }
        resp.json().await.context("Malformed response from onboardd")
    }

    fn unreachable(&self, e: reqwest::Error) -> anyhow::Error {
        anyhow!(
            "Cannot reach onboardd at {}: {}\n\n\
             Is the daemon running? Set --url or {} to point elsewhere.",
            self.base,
            e,
            URL_ENV
        )
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        self.get("/health").await
    }

    pub async fn list_onboardings(&self) -> Result<Vec<OnboardingRecord>> {
        self.get("/v1/onboardings").await
    }

    pub async fn create_onboarding(&self, req: &NewOnboarding) -> Result<OnboardingRecord> {
        self.post("/v1/onboardings", Some(req)).await
    }

    pub async fn detail(&self, id: &str) -> Result<OnboardingDetail> {
        self.get(&format!("/v1/onboardings/{}", id)).await
    }

    pub async fn approve(&self, id: &str) -> Result<OnboardingDetail> {
        self.post::<(), _>(&format!("/v1/onboardings/{}/approve", id), None)
            .await
    }

    pub async fn reject(&self, id: &str, reason: &str) -> Result<OnboardingRecord> {
        let body = RejectRequest {
            reason: reason.to_string(),
        };
        self.post(&format!("/v1/onboardings/{}/reject", id), Some(&body))
            .await
    }

    pub async fn toggle_task(&self, id: &str) -> Result<TaskRecord> {
        self.post::<(), _>(&format!("/v1/tasks/{}/toggle", id), None)
            .await
    }

    pub async fn reminders(&self) -> Result<RemindersResponse> {
        self.get("/v1/reminders").await
    }

    pub async fn run_reminders(&self) -> Result<RemindersResponse> {
        self.post::<(), _>("/v1/reminders/run", None).await
    }

    pub async fn ask(&self, question: &str) -> Result<AskResponse> {
        let body = AskRequest {
            question: question.to_string(),
            channel: None,
        };
        self.post("/v1/chat/ask", Some(&body)).await
    }

    pub async fn escalate(&self, req: &EscalationRequest) -> Result<EscalateResponse> {
        self.post("/v1/chat/escalate", Some(req)).await
    }

    pub async fn tickets(&self) -> Result<Vec<Ticket>> {
        self.get("/v1/tickets").await
    }

    pub async fn resolve_ticket(&self, id: &str) -> Result<Ticket> {
        self.post::<(), _>(&format!("/v1/tickets/{}/resolve", id), None)
            .await
    }
}
