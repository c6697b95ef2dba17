//! In-memory environment variable records.
//!
//! Backs the `/api/env` routes. These records describe configuration the
//! demo UI manages; they are independent of the process environment and
//! are reset on restart. Secret values are masked in every response.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use uuid::Uuid;

/// Placeholder shown instead of a secret value.
pub const MASKED_VALUE: &str = "••••••••••••••••";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVarRecord {
    pub id: String,
    pub key: String,
    pub value: String,
    pub category: String,
    pub is_secret: bool,
}

impl EnvVarRecord {
    /// A copy safe to return to clients: secret values are masked.
    pub fn masked(&self) -> Self {
        let mut record = self.clone();
        if record.is_secret && !record.value.is_empty() {
            record.value = MASKED_VALUE.to_string();
        }
        record
    }
}

/// Thread-safe store of environment variable records.
#[derive(Default)]
pub struct EnvVarStore {
    vars: Mutex<Vec<EnvVarRecord>>,
}

impl EnvVarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with the two records the demo UI expects.
    pub fn with_defaults() -> Self {
        let vars = vec![
            EnvVarRecord {
                id: "1".to_string(),
                key: "AGENT_GROQ_KEY".to_string(),
                value: MASKED_VALUE.to_string(),
                category: "agent".to_string(),
                is_secret: true,
            },
            EnvVarRecord {
                id: "2".to_string(),
                key: "GITHUB_TOKEN".to_string(),
                value: String::new(), // Empty until set by user
                category: "integration".to_string(),
                is_secret: true,
            },
        ];
        Self {
            vars: Mutex::new(vars),
        }
    }

    /// All records with secrets masked.
    pub fn list(&self) -> Vec<EnvVarRecord> {
        self.vars.lock().unwrap().iter().map(|v| v.masked()).collect()
    }

    /// Append a new record; returns the masked copy.
    pub fn insert(
        &self,
        key: String,
        value: String,
        category: Option<String>,
        is_secret: Option<bool>,
    ) -> EnvVarRecord {
        let record = EnvVarRecord {
            id: Uuid::new_v4().to_string(),
            key,
            value,
            category: category.unwrap_or_else(|| "integration".to_string()),
            is_secret: is_secret.unwrap_or(true),
        };
        let masked = record.masked();
        self.vars.lock().unwrap().push(record);
        masked
    }

    /// Update a record's value; returns the masked copy, or None if the
    /// id is unknown.
    pub fn update(&self, id: &str, value: String) -> Option<EnvVarRecord> {
        let mut vars = self.vars.lock().unwrap();
        let record = vars.iter_mut().find(|v| v.id == id)?;
        record.value = value;
        Some(record.masked())
    }

    /// Remove a record; returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        let mut vars = self.vars.lock().unwrap();
        let before = vars.len();
        vars.retain(|v| v.id != id);
        vars.len() != before
    }
}
