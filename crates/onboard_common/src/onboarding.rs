//! Onboarding requests and their persisted tasks.

use crate::catalog::{TaskOwner, DEFAULT_LANGUAGE};
use crate::error::{OnboardError, Result};
use crate::generator::GeneratedTask;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Owner label for tasks that belong to neither employee nor manager
pub const HR_OWNER: &str = "HR";

/// Onboarding request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnboardingStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl OnboardingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for OnboardingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OnboardingStatus {
    type Err = OnboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(OnboardError::UnknownValue {
                kind: "onboarding status",
                value: other.to_string(),
            }),
        }
    }
}

/// Fields supplied when an onboarding request is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOnboarding {
    pub employee_name: String,
    pub manager_name: String,
    pub role: String,
    pub grade: String,
    pub start_date: NaiveDate,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl NewOnboarding {
    /// Trim fields and reject empty ones
    pub fn validated(mut self) -> Result<Self> {
        for (field, value) in [
            ("employee_name", &mut self.employee_name),
            ("manager_name", &mut self.manager_name),
            ("role", &mut self.role),
            ("grade", &mut self.grade),
        ] {
            *value = value.trim().to_string();
            if value.is_empty() {
                return Err(OnboardError::MissingField(field));
            }
        }

        self.language = self.language.trim().to_lowercase();
        if self.language.is_empty() {
            self.language = default_language();
        }
        Ok(self)
    }
}

/// A stored onboarding request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingRecord {
    pub id: String,
    pub created_at: String,
    pub employee_name: String,
    pub manager_name: String,
    pub role: String,
    pub grade: String,
    pub start_date: NaiveDate,
    pub language: String,
    pub status: OnboardingStatus,
    pub rejection_reason: Option<String>,
}

impl OnboardingRecord {
    pub fn is_pending(&self) -> bool {
        self.status == OnboardingStatus::Pending
    }

    /// Map an abstract owner to the name stored on this request
    pub fn resolve_owner(&self, owner: TaskOwner) -> String {
        match owner {
            TaskOwner::Employee => self.employee_name.clone(),
            TaskOwner::Manager => self.manager_name.clone(),
            TaskOwner::Hr => HR_OWNER.to_string(),
        }
    }

    /// Turn generated tasks into rows ready to persist
    pub fn materialize(&self, tasks: &[GeneratedTask]) -> Vec<NewTask> {
        tasks
            .iter()
            .map(|t| NewTask {
                onboarding_id: self.id.clone(),
                owner: self.resolve_owner(t.owner),
                title: t.title.clone(),
                description: t.description.clone(),
                due_date: t.due_date,
            })
            .collect()
    }
}

/// A task row before it has been stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub onboarding_id: String,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
}

/// A stored onboarding task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub onboarding_id: String,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub is_done: bool,
    pub last_reminded_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> OnboardingRecord {
        OnboardingRecord {
            id: "ob-1".to_string(),
            created_at: "2024-01-01T09:00:00+09:00".to_string(),
            employee_name: "Aiko".to_string(),
            manager_name: "Ben".to_string(),
            role: "eng".to_string(),
            grade: "newgrad".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            language: "en".to_string(),
            status: OnboardingStatus::Pending,
            rejection_reason: None,
        }
    }

    #[test]
    fn test_resolve_owner() {
        let r = record();
        assert_eq!(r.resolve_owner(TaskOwner::Employee), "Aiko");
        assert_eq!(r.resolve_owner(TaskOwner::Manager), "Ben");
        assert_eq!(r.resolve_owner(TaskOwner::Hr), "HR");
    }

    #[test]
    fn test_materialize_keeps_order() {
        let r = record();
        let due = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        let tasks = vec![
            GeneratedTask {
                owner: TaskOwner::Manager,
                title: "B".to_string(),
                description: "b".to_string(),
                due_date: due,
            },
            GeneratedTask {
                owner: TaskOwner::Hr,
                title: "A".to_string(),
                description: "a".to_string(),
                due_date: due,
            },
        ];
        let rows = r.materialize(&tasks);
        assert_eq!(rows[0].owner, "Ben");
        assert_eq!(rows[0].onboarding_id, "ob-1");
        assert_eq!(rows[1].owner, "HR");
        assert_eq!(rows[1].title, "A");
    }

    #[test]
    fn test_status_round_trip_strings() {
        for status in [
            OnboardingStatus::Pending,
            OnboardingStatus::Approved,
            OnboardingStatus::Rejected,
        ] {
            assert_eq!(status.as_str().parse::<OnboardingStatus>().unwrap(), status);
        }
        assert!("approved".parse::<OnboardingStatus>().is_err());
    }

    #[test]
    fn test_new_onboarding_validation() {
        let req = NewOnboarding {
            employee_name: "  Aiko ".to_string(),
            manager_name: "Ben".to_string(),
            role: "eng".to_string(),
            grade: "newgrad".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            language: " JA ".to_string(),
        };
        let ok = req.clone().validated().unwrap();
        assert_eq!(ok.employee_name, "Aiko");
        assert_eq!(ok.language, "ja");

        let mut missing = req;
        missing.role = "   ".to_string();
        let err = missing.validated().unwrap_err();
        assert!(matches!(err, OnboardError::MissingField("role")));
    }

    #[test]
    fn test_new_onboarding_default_language() {
        let json = r#"{"employee_name":"A","manager_name":"B","role":"cs","grade":"mid","start_date":"2024-05-01"}"#;
        let req: NewOnboarding = serde_json::from_str(json).unwrap();
        assert_eq!(req.language, "en");
    }
}
