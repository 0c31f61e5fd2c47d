//! Fallback lead log.
//!
//! When the CRM is unreachable the lead is appended here instead of being
//! lost: one JSON line per record on disk, plus an in-memory tail for the
//! admin surface.

use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{error, warn};

use homewire_crm::ContactRecord;

/// One logged fallback entry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FallbackEntry {
    #[serde(rename = "leadId")]
    pub lead_id: String,
    #[serde(rename = "loggedAt")]
    pub logged_at: String,
    /// Why the CRM path failed.
    pub cause: String,
    pub record: ContactRecord,
}

pub struct FallbackLog {
    path: PathBuf,
    tail: RwLock<Vec<FallbackEntry>>,
}

impl FallbackLog {
    /// Open the log, loading any entries from a prior session.
    pub fn open(path: &Path) -> Self {
        let tail = match std::fs::read_to_string(path) {
            Ok(data) => data
                .lines()
                .filter_map(|line| serde_json::from_str(line).ok())
                .collect(),
            Err(_) => Vec::new(),
        };

        Self {
            path: path.to_path_buf(),
            tail: RwLock::new(tail),
        }
    }

    /// Append a record that could not reach the CRM.
    pub fn append(&self, lead_id: &str, record: &ContactRecord, cause: &str) {
        let entry = FallbackEntry {
            lead_id: lead_id.to_string(),
            logged_at: chrono::Utc::now().to_rfc3339(),
            cause: cause.to_string(),
            record: record.clone(),
        };

        warn!(
            "CRM unavailable, lead {} ({}) logged to fallback: {}",
            lead_id, record.email, cause
        );

        match serde_json::to_string(&entry) {
            Ok(line) => {
                let written = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)
                    .and_then(|mut f| writeln!(f, "{}", line));
                if let Err(e) = written {
                    error!("Failed to write fallback log: {}", e);
                }
            }
            Err(e) => error!("Failed to serialize fallback entry: {}", e),
        }

        self.tail.write().push(entry);
    }

    /// All entries seen this session (plus any loaded at open).
    pub fn entries(&self) -> Vec<FallbackEntry> {
        self.tail.read().clone()
    }

    pub fn len(&self) -> usize {
        self.tail.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
