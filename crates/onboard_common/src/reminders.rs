//! Reminder policy: which tasks to nag about, and with what message.

use crate::clock::parse_timestamp;
use crate::generator::shift_date;
use crate::onboarding::TaskRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days before the due date on which reminders go out
pub const DEFAULT_LEAD_DAYS: [i64; 3] = [7, 3, 0];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderPolicy {
    pub lead_days: Vec<i64>,
    /// Listing window: days before today
    pub window_before_days: i64,
    /// Listing window: days after today
    pub window_after_days: i64,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            lead_days: DEFAULT_LEAD_DAYS.to_vec(),
            window_before_days: 1,
            window_after_days: 7,
        }
    }
}

impl ReminderPolicy {
    /// Inclusive (start, end) dates of the upcoming-task listing
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        (
            shift_date(today, -self.window_before_days),
            shift_date(today, self.window_after_days),
        )
    }

    /// Due dates that trigger a reminder today, in lead order, without duplicates
    pub fn target_dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::with_capacity(self.lead_days.len());
        for lead in &self.lead_days {
            let date = shift_date(today, *lead);
            if !dates.contains(&date) {
                dates.push(date);
            }
        }
        dates
    }

    /// Whether `task` should get a reminder on `today`
    pub fn is_due_for_reminder(&self, task: &TaskRecord, today: NaiveDate) -> bool {
        !task.is_done
            && self.target_dates(today).contains(&task.due_date)
            && !reminded_on(task, today)
    }
}

/// True if the task's last reminder fell on `today`
pub fn reminded_on(task: &TaskRecord, today: NaiveDate) -> bool {
    let Some(ts) = task.last_reminded_at.as_deref() else {
        return false;
    };
    match parse_timestamp(ts) {
        Some(t) => t.date_naive() == today,
        // Fall back to the date prefix for non-RFC 3339 values
        None => ts.get(..10) == Some(today.format("%Y-%m-%d").to_string().as_str()),
    }
}

/// A reminder addressed to a task owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderMessage {
    pub task_id: String,
    pub to: String,
    pub title: String,
    pub body: String,
}

impl ReminderMessage {
    pub fn for_task(task: &TaskRecord) -> Self {
        Self {
            task_id: task.id.clone(),
            to: task.owner.clone(),
            title: format!("Reminder: {}", task.title),
            body: format!("Due: {} — {}", task.due_date.format("%Y-%m-%d"), task.description),
        }
    }
}
