//! SQLite-backed persistence for onboardings, tasks and tickets.
//!
//! Location: /var/lib/onboard/onboard.db by default.
//! Dates are stored as ISO-8601 text so lexical order matches calendar order.

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use onboard_common::onboarding::NewTask;
use onboard_common::{
    NewOnboarding, OnboardingRecord, OnboardingStatus, TaskRecord, Ticket, TicketSource,
    TicketStatus,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

const ONBOARDING_COLUMNS: &str = "id, created_at, employee_name, manager_name, role, grade, \
     start_date, lang, status, rejection_reason";

const TASK_COLUMNS: &str =
    "id, onboarding_id, owner, title, description, due_date, is_done, last_reminded_at";

const TICKET_COLUMNS: &str = "id, created_at, source, question, user_ref, channel_ref, status";

/// Backing store shared by all request handlers
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Open or create the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {:?}", path))?;
        let store = Self::from_connection(conn)?;
        info!("Opened store at {}", path.display());
        Ok(store)
    }

    /// Private database for tests and previews
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("store connection lock poisoned"))
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS onboarding_requests (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                employee_name TEXT NOT NULL,
                manager_name TEXT NOT NULL,
                role TEXT NOT NULL,
                grade TEXT NOT NULL,
                start_date TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'PENDING',
                rejection_reason TEXT
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                onboarding_id TEXT NOT NULL,
                owner TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                due_date TEXT NOT NULL,
                is_done INTEGER NOT NULL DEFAULT 0,
                last_reminded_at TEXT,
                FOREIGN KEY (onboarding_id) REFERENCES onboarding_requests(id)
            );

            CREATE TABLE IF NOT EXISTS tickets (
                id TEXT PRIMARY KEY,
                created_at TEXT NOT NULL,
                source TEXT NOT NULL,
                question TEXT NOT NULL,
                user_ref TEXT,
                channel_ref TEXT,
                status TEXT NOT NULL DEFAULT 'OPEN'
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_onboarding ON tasks(onboarding_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_due ON tasks(due_date);
            "#,
        )?;

        // Databases created before per-request languages lack the lang column
        if !has_column(&conn, "onboarding_requests", "lang")? {
            conn.execute(
                "ALTER TABLE onboarding_requests ADD COLUMN lang TEXT NOT NULL DEFAULT 'en'",
                [],
            )?;
            info!("Migrated onboarding_requests: added lang column");
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Onboarding requests
    // ------------------------------------------------------------------

    /// Insert a new PENDING request
    pub fn create_onboarding(
        &self,
        req: &NewOnboarding,
        created_at: &str,
    ) -> Result<OnboardingRecord> {
        let record = OnboardingRecord {
            id: new_id(),
            created_at: created_at.to_string(),
            employee_name: req.employee_name.clone(),
            manager_name: req.manager_name.clone(),
            role: req.role.clone(),
            grade: req.grade.clone(),
            start_date: req.start_date,
            language: req.language.clone(),
            status: OnboardingStatus::Pending,
            rejection_reason: None,
        };

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO onboarding_requests (id, created_at, employee_name, manager_name, role, \
             grade, start_date, lang, status) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.id,
                record.created_at,
                record.employee_name,
                record.manager_name,
                record.role,
                record.grade,
                format_date(record.start_date),
                record.language,
                record.status.as_str(),
            ],
        )?;
        debug!("Created onboarding {}", record.id);
        Ok(record)
    }

    pub fn get_onboarding(&self, id: &str) -> Result<Option<OnboardingRecord>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM onboarding_requests WHERE id = ?1", ONBOARDING_COLUMNS);
        let record = conn
            .query_row(&sql, params![id], row_to_onboarding)
            .optional()?;
        Ok(record)
    }

    /// All requests, newest first
    pub fn list_onboardings(&self) -> Result<Vec<OnboardingRecord>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM onboarding_requests ORDER BY created_at DESC, rowid DESC",
            ONBOARDING_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_onboarding)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Move a PENDING request to `status`.
    ///
    /// Returns false if the id is unknown or the request already left PENDING.
    pub fn transition_pending(
        &self,
        id: &str,
        status: OnboardingStatus,
        reason: Option<&str>,
    ) -> Result<bool> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE onboarding_requests SET status = ?1, rejection_reason = ?2 \
             WHERE id = ?3 AND status = ?4",
            params![status.as_str(), reason, id, OnboardingStatus::Pending.as_str()],
        )?;
        Ok(changed > 0)
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    /// Approve a PENDING request and insert its tasks atomically, in order.
    ///
    /// Returns None, with nothing written, if the request is unknown or
    /// already left PENDING. A failed insert rolls the status back too.
    pub fn approve_with_tasks(
        &self,
        id: &str,
        tasks: &[NewTask],
    ) -> Result<Option<Vec<TaskRecord>>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let changed = tx.execute(
            "UPDATE onboarding_requests SET status = ?1, rejection_reason = NULL \
             WHERE id = ?2 AND status = ?3",
            params![
                OnboardingStatus::Approved.as_str(),
                id,
                OnboardingStatus::Pending.as_str()
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        let stored = insert_tasks(&tx, tasks)?;
        tx.commit()?;
        Ok(Some(stored))
    }

    /// Tasks of one onboarding, earliest due first
    pub fn list_tasks(&self, onboarding_id: &str) -> Result<Vec<TaskRecord>> {
        self.query_tasks(
            "WHERE onboarding_id = ?1 ORDER BY due_date ASC, rowid ASC",
            params![onboarding_id],
        )
    }

    pub fn get_task(&self, id: &str) -> Result<Option<TaskRecord>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS);
        Ok(conn.query_row(&sql, params![id], row_to_task).optional()?)
    }

    /// Flip the done flag; returns the updated task, or None if unknown
    pub fn toggle_task(&self, id: &str) -> Result<Option<TaskRecord>> {
        {
            let conn = self.lock()?;
            let changed = conn.execute(
                "UPDATE tasks SET is_done = 1 - is_done WHERE id = ?1",
                params![id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
        }
        self.get_task(id)
    }

    /// Tasks due within [start, end], inclusive, earliest first
    pub fn tasks_due_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<TaskRecord>> {
        self.query_tasks(
            "WHERE due_date BETWEEN ?1 AND ?2 ORDER BY due_date ASC, rowid ASC",
            params![format_date(start), format_date(end)],
        )
    }

    /// Unfinished tasks due exactly on `date`
    pub fn open_tasks_due_on(&self, date: NaiveDate) -> Result<Vec<TaskRecord>> {
        self.query_tasks(
            "WHERE due_date = ?1 AND is_done = 0 ORDER BY rowid ASC",
            params![format_date(date)],
        )
    }

    pub fn mark_reminded(&self, id: &str, at: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "UPDATE tasks SET last_reminded_at = ?1 WHERE id = ?2",
            params![at, id],
        )?;
        Ok(())
    }

    fn query_tasks(&self, clause: &str, params: impl rusqlite::Params) -> Result<Vec<TaskRecord>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM tasks {}", TASK_COLUMNS, clause);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params, row_to_task)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // ------------------------------------------------------------------
    // Tickets
    // ------------------------------------------------------------------

    pub fn create_ticket(
        &self,
        source: TicketSource,
        question: &str,
        user_ref: Option<&str>,
        channel_ref: Option<&str>,
        created_at: &str,
    ) -> Result<Ticket> {
        let ticket = Ticket {
            id: new_id(),
            created_at: created_at.to_string(),
            source,
            question: question.to_string(),
            user_ref: user_ref.map(str::to_string),
            channel_ref: channel_ref.map(str::to_string),
            status: TicketStatus::Open,
        };

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO tickets (id, created_at, source, question, user_ref, channel_ref, status) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                ticket.id,
                ticket.created_at,
                ticket.source.as_str(),
                ticket.question,
                ticket.user_ref,
                ticket.channel_ref,
                ticket.status.as_str(),
            ],
        )?;
        debug!("Created ticket {}", ticket.id);
        Ok(ticket)
    }

    pub fn get_ticket(&self, id: &str) -> Result<Option<Ticket>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {} FROM tickets WHERE id = ?1", TICKET_COLUMNS);
        Ok(conn.query_row(&sql, params![id], row_to_ticket).optional()?)
    }

    /// All tickets, newest first
    pub fn list_tickets(&self) -> Result<Vec<Ticket>> {
        let conn = self.lock()?;
        let sql = format!(
            "SELECT {} FROM tickets ORDER BY created_at DESC, rowid DESC",
            TICKET_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_ticket)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn set_ticket_status(&self, id: &str, status: TicketStatus) -> Result<bool> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE tickets SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        Ok(changed > 0)
    }
}

fn insert_tasks(tx: &Transaction<'_>, tasks: &[NewTask]) -> Result<Vec<TaskRecord>> {
    let mut stmt = tx.prepare(
        "INSERT INTO tasks (id, onboarding_id, owner, title, description, due_date) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    let mut stored = Vec::with_capacity(tasks.len());
    for task in tasks {
        let id = new_id();
        stmt.execute(params![
            id,
            task.onboarding_id,
            task.owner,
            task.title,
            task.description,
            format_date(task.due_date),
        ])?;
        stored.push(TaskRecord {
            id,
            onboarding_id: task.onboarding_id.clone(),
            owner: task.owner.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date,
            is_done: false,
            last_reminded_at: None,
        });
    }
    Ok(stored)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Read a text column and parse it, reporting failures as conversion errors
fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_onboarding(row: &Row<'_>) -> rusqlite::Result<OnboardingRecord> {
    Ok(OnboardingRecord {
        id: row.get(0)?,
        created_at: row.get(1)?,
        employee_name: row.get(2)?,
        manager_name: row.get(3)?,
        role: row.get(4)?,
        grade: row.get(5)?,
        start_date: date_column(row, 6)?,
        language: row.get(7)?,
        status: parse_column(row, 8)?,
        rejection_reason: row.get(9)?,
    })
}

fn row_to_task(row: &Row<'_>) -> rusqlite::Result<TaskRecord> {
    Ok(TaskRecord {
        id: row.get(0)?,
        onboarding_id: row.get(1)?,
        owner: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        due_date: date_column(row, 5)?,
        is_done: row.get::<_, i64>(6)? != 0,
        last_reminded_at: row.get(7)?,
    })
}

fn row_to_ticket(row: &Row<'_>) -> rusqlite::Result<Ticket> {
    Ok(Ticket {
        id: row.get(0)?,
        created_at: row.get(1)?,
        source: parse_column(row, 2)?,
        question: row.get(3)?,
        user_ref: row.get(4)?,
        channel_ref: row.get(5)?,
        status: parse_column(row, 6)?,
    })
}
