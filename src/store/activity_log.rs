//! In-memory agent activity log.
//!
//! Holds the entries served by the `/api/logs` routes and written by the
//! query dispatcher. Volatile: reset on process restart.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::info;
use uuid::Uuid;

/// Outcome of a logged agent action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    Pending,
    Success,
    Error,
}

impl std::fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityStatus::Pending => write!(f, "pending"),
            ActivityStatus::Success => write!(f, "success"),
            ActivityStatus::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub agent: String,
    pub action: String,
    pub status: ActivityStatus,
    #[serde(default)]
    pub details: String,
}

/// Thread-safe store of activity log entries, newest first.
#[derive(Default)]
pub struct ActivityLogStore {
    entries: Mutex<Vec<ActivityLogEntry>>,
}

impl ActivityLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with the sample entries the demo UI expects.
    pub fn with_samples() -> Self {
        let now = Utc::now();
        let samples = vec![
            ActivityLogEntry {
                id: "1".to_string(),
                timestamp: now - Duration::minutes(5),
                agent: "github".to_string(),
                action: "Summarize PR #123".to_string(),
                status: ActivityStatus::Success,
                details: "Successfully summarized PR #123 in repository user/repo".to_string(),
            },
            ActivityLogEntry {
                id: "2".to_string(),
                timestamp: now - Duration::minutes(10),
                agent: "github".to_string(),
                action: "List open issues".to_string(),
                status: ActivityStatus::Success,
                details: "Retrieved 5 open issues from repository user/repo".to_string(),
            },
            ActivityLogEntry {
                id: "3".to_string(),
                timestamp: now - Duration::minutes(15),
                agent: "github".to_string(),
                action: "Comment on issue #45".to_string(),
                status: ActivityStatus::Error,
                details: "Failed to comment: Permission denied".to_string(),
            },
        ];
        Self {
            entries: Mutex::new(samples),
        }
    }

    /// Append an entry (at the front) and echo it to the tracing log.
    pub fn record(
        &self,
        agent: impl Into<String>,
        action: impl Into<String>,
        status: ActivityStatus,
        details: impl Into<String>,
    ) -> ActivityLogEntry {
        let entry = ActivityLogEntry {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            agent: agent.into(),
            action: action.into(),
            status,
            details: details.into(),
        };

        info!(
            "[{}] Agent {}: {} - {}{}",
            entry.timestamp.to_rfc3339(),
            entry.agent,
            entry.action,
            entry.status,
            if entry.details.is_empty() {
                String::new()
            } else {
                format!(" - {}", entry.details)
            }
        );

        self.entries.lock().unwrap().insert(0, entry.clone());
        entry
    }

    /// All entries, newest first.
    pub fn list(&self) -> Vec<ActivityLogEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
