//! Task generator.
//!
//! Turns a catalog entry into dated tasks for a concrete start date. The
//! generator is pure: identical inputs always give identical output, and
//! nothing here can fail.

use crate::catalog::{Plan, TaskOwner, TemplateCatalog, DEFAULT_LANGUAGE};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// A task with an absolute due date. Owner names are resolved by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTask {
    pub owner: TaskOwner,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
}

/// Output of one generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generation {
    /// Tasks in catalog declaration order
    pub tasks: Vec<GeneratedTask>,
    pub plan: Plan,
    /// Template actually used (the default key when the request fell back)
    pub template_key: String,
    /// Language actually used (English when the request fell back)
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct TaskGenerator {
    catalog: Arc<TemplateCatalog>,
}

impl TaskGenerator {
    pub fn new(catalog: Arc<TemplateCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn generate(
        &self,
        role: &str,
        grade: &str,
        start_date: NaiveDate,
        language: &str,
    ) -> Generation {
        let (entry, template_key) = self.catalog.lookup(role, grade);
        let language = if entry.has_language(language) {
            language
        } else {
            DEFAULT_LANGUAGE
        };
        let variant = entry.variant(language);

        let tasks = variant
            .tasks
            .iter()
            .map(|spec| GeneratedTask {
                owner: spec.owner,
                title: spec.title.clone(),
                description: spec.description.clone(),
                due_date: shift_date(start_date, spec.offset_days),
            })
            .collect::<Vec<_>>();

        debug!(
            "Generated {} tasks from {} ({}) for {}_{}",
            tasks.len(),
            template_key,
            language,
            role,
            grade
        );

        Generation {
            tasks,
            plan: variant.plan.clone(),
            template_key: template_key.to_string(),
            language: language.to_string(),
        }
    }
}

impl Default for TaskGenerator {
    fn default() -> Self {
        Self::new(Arc::new(TemplateCatalog::builtin()))
    }
}

/// `start + offset_days`, saturating at the calendar limits
pub fn shift_date(start: NaiveDate, offset_days: i64) -> NaiveDate {
    Duration::try_days(offset_days)
        .and_then(|d| start.checked_add_signed(d))
        .unwrap_or(if offset_days < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_shift_date() {
        assert_eq!(shift_date(date(2024, 1, 15), 7), date(2024, 1, 22));
        assert_eq!(shift_date(date(2024, 1, 1), -3), date(2023, 12, 29));
        assert_eq!(shift_date(date(2024, 2, 28), 1), date(2024, 2, 29));
    }

    #[test]
    fn test_shift_date_saturates() {
        assert_eq!(shift_date(NaiveDate::MAX, 1), NaiveDate::MAX);
        assert_eq!(shift_date(NaiveDate::MIN, -1), NaiveDate::MIN);
        assert_eq!(shift_date(date(2024, 1, 1), i64::MAX), NaiveDate::MAX);
    }

    #[test]
    fn test_manager_prep_task_before_start() {
        let gen = TaskGenerator::default();
        let out = gen.generate("general", "newgrad", date(2024, 4, 1), "en");
        let prep = &out.tasks[2];
        assert_eq!(prep.owner, TaskOwner::Manager);
        assert_eq!(prep.due_date, date(2024, 3, 29));
    }

    #[test]
    fn test_reports_effective_language() {
        let gen = TaskGenerator::default();
        assert_eq!(gen.generate("cs", "mid", date(2024, 1, 1), "ja").language, "ja");
        assert_eq!(gen.generate("cs", "mid", date(2024, 1, 1), "de").language, "en");
    }
}
