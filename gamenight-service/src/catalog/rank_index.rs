//! In-memory index over the BoardGameGeek rank export.
//!
//! Built once at startup and shared read-only. Lookups are linear scans in load
//! order; the file is a few tens of thousands of rows at most.

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const MAX_SEARCH_RESULTS: usize = 50;

/// One row of the rank file, column name to raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankRecord(BTreeMap<String, String>);

impl RankRecord {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }
}

impl From<BTreeMap<String, String>> for RankRecord {
    fn from(fields: BTreeMap<String, String>) -> Self {
        Self(fields)
    }
}

#[derive(Debug, Default)]
pub struct RankIndex {
    records: Vec<RankRecord>,
    source: Option<PathBuf>,
}

impl RankIndex {
    /// Loads the first candidate path that exists. A missing file or an
    /// unreadable row is logged and skipped; this never fails.
    pub fn load(candidates: &[PathBuf]) -> Self {
        let Some(path) = candidates.iter().find(|p| p.is_file()) else {
            tracing::warn!(
                candidates = ?candidates,
                "BGG rank file not found, local game search will return nothing"
            );
            return Self::default();
        };

        match read_records(path) {
            Ok(records) => {
                tracing::info!(
                    path = %path.display(),
                    count = records.len(),
                    "Loaded BGG rank index"
                );
                Self {
                    records,
                    source: Some(path.clone()),
                }
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to read BGG rank file");
                Self::default()
            }
        }
    }

    pub fn from_records(records: Vec<RankRecord>) -> Self {
        Self {
            records,
            source: None,
        }
    }

    /// Case-insensitive substring match on `name`, in load order, at most
    /// [`MAX_SEARCH_RESULTS`] hits. A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&RankRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.records
            .iter()
            .filter(|r| {
                r.name()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .take(MAX_SEARCH_RESULTS)
            .collect()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&RankRecord> {
        self.records.iter().find(|r| r.id() == Some(id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn read_records(path: &Path) -> Result<Vec<RankRecord>, csv::Error> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (line, row) in reader.deserialize::<BTreeMap<String, String>>().enumerate() {
        match row {
            Ok(fields) => records.push(RankRecord(fields)),
            Err(e) => {
                skipped += 1;
                tracing::debug!(row = line + 1, error = %e, "Skipping malformed rank row");
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(skipped, "Some rank rows could not be parsed");
    }
    Ok(records)
}
