use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Incident priority, keyed into the SLA deadline policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    P1,
    P2,
    P3,
    P4,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::P1, Priority::P2, Priority::P3, Priority::P4];

    /// Parse a wire/config value. Anything outside P1..P4 is `UNKNOWN_PRIORITY`;
    /// past this boundary the enum makes bad values unrepresentable.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "P1" => Ok(Priority::P1),
            "P2" => Ok(Priority::P2),
            "P3" => Ok(Priority::P3),
            "P4" => Ok(Priority::P4),
            _ => Err(AppError::unknown_priority(value)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
            Priority::P4 => "P4",
        }
    }
}

/// Lifecycle states. New is initial, Closed is terminal; only the lifecycle
/// manager moves an incident between them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Status {
    New,
    Acknowledged,
    Resolved,
    Closed,
}

impl Status {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "New" => Ok(Status::New),
            "Acknowledged" => Ok(Status::Acknowledged),
            "Resolved" => Ok(Status::Resolved),
            "Closed" => Ok(Status::Closed),
            other => Err(AppError::validation("Unknown status")
                .with_details(format!("value={other}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "New",
            Status::Acknowledged => "Acknowledged",
            Status::Resolved => "Resolved",
            Status::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Hardware,
    Software,
    Network,
    Other,
}

impl Category {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "Hardware" => Ok(Category::Hardware),
            "Software" => Ok(Category::Software),
            "Network" => Ok(Category::Network),
            "Other" => Ok(Category::Other),
            other => Err(AppError::validation("Unknown category")
                .with_details(format!("value={other}; expected Hardware|Software|Network|Other"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hardware => "Hardware",
            Category::Software => "Software",
            Category::Network => "Network",
            Category::Other => "Other",
        }
    }
}

/// Canonical incident representation.
///
/// Notes:
/// - Timestamps are RFC3339 UTC strings; `created_at` is stamped by the store
///   at creation, the optional ones exactly once by their lifecycle transition.
/// - Reporter fields, category and priority are immutable after creation;
///   only `status` and the lifecycle timestamps ever change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Incident {
    pub id: i64,
    pub fingerprint: String,
    pub reporter_name: String,
    pub reporter_email: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub created_at: String,
    pub acknowledged_at: Option<String>,
    pub resolved_at: Option<String>,
}

/// Creation-time fields, as submitted by the presentation layer. Validated
/// before any row is written; the store owns id, fingerprint, timestamps and
/// the initial status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewIncident {
    pub reporter_name: String,
    pub reporter_email: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
}
