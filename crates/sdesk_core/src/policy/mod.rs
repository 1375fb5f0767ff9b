use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Priority;
use crate::error::AppError;

/// Acknowledgment and resolution deadlines for one priority, in whole seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlaDeadlines {
    pub ack_seconds: i64,
    pub resolve_seconds: i64,
}

/// Priority-keyed SLA deadline table plus the near-breach warning margin.
///
/// Loaded once at process start (defaults or a JSON document) and read-only
/// for the process lifetime. `deadlines_for` is total over the `Priority`
/// enum; unknown priority strings are rejected at the parse/config boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityPolicy {
    p1: SlaDeadlines,
    p2: SlaDeadlines,
    p3: SlaDeadlines,
    p4: SlaDeadlines,
    warning_pct: u8,
}

/// Serialized form of the policy, as found in a config file:
/// `{"warning_pct": 10, "priorities": {"P1": {"ack_seconds": 900, ...}, ...}}`.
/// Priorities omitted from the document keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PolicyDocument {
    #[serde(default)]
    pub warning_pct: Option<u8>,
    #[serde(default)]
    pub priorities: BTreeMap<String, SlaDeadlines>,
}

impl Default for PriorityPolicy {
    fn default() -> Self {
        Self {
            p1: SlaDeadlines {
                ack_seconds: 15 * 60,
                resolve_seconds: 4 * 3600,
            },
            p2: SlaDeadlines {
                ack_seconds: 30 * 60,
                resolve_seconds: 8 * 3600,
            },
            p3: SlaDeadlines {
                ack_seconds: 2 * 3600,
                resolve_seconds: 24 * 3600,
            },
            p4: SlaDeadlines {
                ack_seconds: 4 * 3600,
                resolve_seconds: 72 * 3600,
            },
            warning_pct: 10,
        }
    }
}

impl PriorityPolicy {
    pub fn deadlines_for(&self, priority: Priority) -> SlaDeadlines {
        match priority {
            Priority::P1 => self.p1,
            Priority::P2 => self.p2,
            Priority::P3 => self.p3,
            Priority::P4 => self.p4,
        }
    }

    /// Percentage of a deadline that counts as the near-breach warning window.
    pub fn warning_pct(&self) -> u8 {
        self.warning_pct
    }

    /// Warning window for a deadline, in whole seconds (integer arithmetic,
    /// no rounding before comparison). Saturates so an extreme configured
    /// deadline cannot overflow the multiply.
    pub fn warning_window_seconds(&self, deadline_seconds: i64) -> i64 {
        deadline_seconds.saturating_mul(i64::from(self.warning_pct)) / 100
    }

    /// Build a policy from a JSON document, overriding defaults per priority.
    /// Unknown priority keys are `UNKNOWN_PRIORITY`; non-positive durations
    /// and an out-of-range warning percentage are `VALIDATION_FAILED`.
    pub fn from_json(text: &str) -> Result<Self, AppError> {
        let doc: PolicyDocument = serde_json::from_str(text).map_err(|e| {
            AppError::validation("Failed to parse SLA policy JSON").with_details(e.to_string())
        })?;
        Self::from_document(&doc)
    }

    pub fn from_document(doc: &PolicyDocument) -> Result<Self, AppError> {
        let mut policy = Self::default();

        if let Some(pct) = doc.warning_pct {
            if !(1..=100).contains(&pct) {
                return Err(AppError::validation("warning_pct out of range")
                    .with_details(format!("value={pct}; expected 1..=100")));
            }
            policy.warning_pct = pct;
        }

        for (key, deadlines) in &doc.priorities {
            if deadlines.ack_seconds <= 0 || deadlines.resolve_seconds <= 0 {
                return Err(AppError::validation("SLA deadlines must be positive")
                    .with_details(format!(
                        "priority={key}; ack_seconds={}; resolve_seconds={}",
                        deadlines.ack_seconds, deadlines.resolve_seconds
                    )));
            }
            match Priority::parse(key)? {
                Priority::P1 => policy.p1 = *deadlines,
                Priority::P2 => policy.p2 = *deadlines,
                Priority::P3 => policy.p3 = *deadlines,
                Priority::P4 => policy.p4 = *deadlines,
            }
        }

        Ok(policy)
    }
}
