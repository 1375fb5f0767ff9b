use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use crate::db;
use crate::domain::{Category, Incident, NewIncident, Priority, Status};
use crate::error::AppError;
use crate::timefmt::to_rfc3339;
use crate::validate::validate_new_incident;

/// Optional equality filters, AND-combined. An empty filter matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncidentFilter {
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
}

/// Status compare-and-set applied by a lifecycle transition. The store only
/// executes the swap; legality and stamps are decided by the lifecycle
/// manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionUpdate {
    pub from: Status,
    pub to: Status,
    pub acknowledged_at: Option<String>,
    pub resolved_at: Option<String>,
}

/// Abstract incident persistence. One production implementation
/// (`SqliteStore`); the seam keeps the lifecycle manager and the monitoring
/// service independent of the storage engine.
pub trait IncidentStore: Send + Sync {
    /// Validate fields, assign an id, stamp `created_at = now`, status New.
    fn create(&self, fields: &NewIncident, now: OffsetDateTime) -> Result<Incident, AppError>;

    fn get(&self, id: i64) -> Result<Incident, AppError>;

    fn list(&self, filter: &IncidentFilter) -> Result<Vec<Incident>, AppError>;

    /// Atomically advance `status` from `update.from` to `update.to`, stamping
    /// the provided lifecycle timestamps. Exactly one writer wins a race on
    /// the same incident; losers observe `INVALID_TRANSITION`. The timestamp
    /// invariant `created_at <= acknowledged_at <= resolved_at` is enforced
    /// inside the same atomic update; a stamp that would break it is
    /// rejected with `VALIDATION_FAILED`.
    fn apply_transition(&self, id: i64, update: &TransitionUpdate) -> Result<Incident, AppError>;
}

/// Deterministic content fingerprint over the creation fields.
pub fn fingerprint(fields: &NewIncident) -> String {
    let mut hasher = Sha256::new();
    hasher.update(fields.reporter_name.as_bytes());
    hasher.update([0u8]);
    hasher.update(fields.reporter_email.as_bytes());
    hasher.update([0u8]);
    hasher.update(fields.description.as_bytes());
    hasher.update([0u8]);
    hasher.update(fields.category.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(fields.priority.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let mut conn = db::open(path)?;
        db::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, AppError> {
        let mut conn = db::open_in_memory()?;
        db::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, AppError> {
        self.conn.lock().map_err(|_| {
            AppError::new("DB_LOCK_POISONED", "Incident store lock poisoned").with_retryable(true)
        })
    }
}

const INCIDENT_COLUMNS: &str = r#"
  id, fingerprint, reporter_name, reporter_email, description,
  category, priority, status, created_at, acknowledged_at, resolved_at
"#;

type RawIncidentRow = (
    i64,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
);

fn raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawIncidentRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
    ))
}

fn decode_incident(raw: RawIncidentRow) -> Result<Incident, AppError> {
    let (
        id,
        fingerprint,
        reporter_name,
        reporter_email,
        description,
        category,
        priority,
        status,
        created_at,
        acknowledged_at,
        resolved_at,
    ) = raw;
    Ok(Incident {
        id,
        fingerprint,
        reporter_name,
        reporter_email,
        description,
        category: Category::parse(&category)?,
        priority: Priority::parse(&priority)?,
        status: Status::parse(&status)?,
        created_at,
        acknowledged_at,
        resolved_at,
    })
}

impl IncidentStore for SqliteStore {
    fn create(&self, fields: &NewIncident, now: OffsetDateTime) -> Result<Incident, AppError> {
        validate_new_incident(fields)?;
        let created_at = to_rfc3339(now)?;
        let fp = fingerprint(fields);

        let conn = self.lock()?;
        conn.execute(
            r#"
      INSERT INTO incidents(
        fingerprint, reporter_name, reporter_email, description,
        category, priority, status, created_at
      ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'New', ?7)
      "#,
            rusqlite::params![
                fp,
                fields.reporter_name,
                fields.reporter_email,
                fields.description,
                fields.category.as_str(),
                fields.priority.as_str(),
                created_at,
            ],
        )
        .map_err(|e| {
            AppError::new("DB_INSERT_FAILED", "Failed to insert incident")
                .with_details(e.to_string())
        })?;

        let id = conn.last_insert_rowid();
        get_incident(&conn, id)
    }

    fn get(&self, id: i64) -> Result<Incident, AppError> {
        let conn = self.lock()?;
        get_incident(&conn, id)
    }

    fn list(&self, filter: &IncidentFilter) -> Result<Vec<Incident>, AppError> {
        let mut sql = format!("SELECT {INCIDENT_COLUMNS} FROM incidents");
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(status) = filter.status {
            clauses.push("status = ?");
            params.push(status.as_str().to_string());
        }
        if let Some(category) = filter.category {
            clauses.push("category = ?");
            params.push(category.as_str().to_string());
        }
        if let Some(priority) = filter.priority {
            clauses.push("priority = ?");
            params.push(priority.as_str().to_string());
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id ASC");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql).map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to prepare incidents query")
                .with_details(e.to_string())
        })?;

        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), raw_row)
            .map_err(|e| {
                AppError::new("DB_QUERY_FAILED", "Failed to query incidents")
                    .with_details(e.to_string())
            })?;

        let mut out = Vec::new();
        for r in rows {
            let raw = r.map_err(|e| {
                AppError::new("DB_QUERY_FAILED", "Failed to decode incident row")
                    .with_details(e.to_string())
            })?;
            out.push(decode_incident(raw)?);
        }
        Ok(out)
    }

    fn apply_transition(&self, id: i64, update: &TransitionUpdate) -> Result<Incident, AppError> {
        let conn = self.lock()?;

        // Compare-and-set on status: the WHERE clause makes the row update
        // atomic per incident, so a racing duplicate loses with zero rows
        // changed. The timestamp clauses keep
        // created_at <= acknowledged_at <= resolved_at inside the same
        // atomic statement; a guard checked before the update could pass
        // against a state that a concurrent writer then replaces. RFC3339
        // UTC strings at fixed width compare lexicographically in time
        // order, so the comparison stays in SQL.
        let changed = conn
            .execute(
                r#"
        UPDATE incidents
        SET status = ?1,
            acknowledged_at = COALESCE(?2, acknowledged_at),
            resolved_at = COALESCE(?3, resolved_at)
        WHERE id = ?4 AND status = ?5
          AND (?2 IS NULL OR created_at <= ?2)
          AND (?3 IS NULL OR acknowledged_at IS NULL OR acknowledged_at <= ?3)
        "#,
                rusqlite::params![
                    update.to.as_str(),
                    update.acknowledged_at,
                    update.resolved_at,
                    id,
                    update.from.as_str(),
                ],
            )
            .map_err(|e| {
                AppError::new("DB_UPDATE_FAILED", "Failed to update incident status")
                    .with_details(e.to_string())
            })?;

        if changed == 1 {
            return get_incident(&conn, id);
        }

        // Nothing changed: still holding the lock, distinguish a missing
        // incident from a stale status from a timestamp-order rejection.
        let current = get_incident(&conn, id)?;
        if current.status == update.from {
            return Err(AppError::validation(
                "Transition timestamp precedes the incident's prior lifecycle timestamp",
            )
            .with_details(format!(
                "created_at={}; acknowledged_at={:?}; stamping acknowledged_at={:?} resolved_at={:?}",
                current.created_at,
                current.acknowledged_at,
                update.acknowledged_at,
                update.resolved_at
            )));
        }
        Err(AppError::invalid_transition(format!(
            "Cannot move incident {id} to {}: expected status {}, found {}",
            update.to.as_str(),
            update.from.as_str(),
            current.status.as_str()
        )))
    }
}

fn get_incident(conn: &Connection, id: i64) -> Result<Incident, AppError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id = ?1"
        ))
        .map_err(|e| {
            AppError::new("DB_QUERY_FAILED", "Failed to prepare incident query")
                .with_details(e.to_string())
        })?;

    let raw = stmt
        .query_row([id], raw_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => AppError::not_found(id),
            other => AppError::new("DB_QUERY_FAILED", "Failed to query incident")
                .with_details(other.to_string()),
        })?;

    decode_incident(raw)
}
