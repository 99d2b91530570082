//! Run summary for a merge
//!
//! Collected by the engine as it goes and returned on success. The CLI prints
//! it and can write it out as JSON.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSource {
    pub source_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExhaustedSource {
    pub source_id: String,
    pub values_read: u64,
    /// Malformed token or I/O error that ended the source early
    pub failure: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeReport {
    /// Candidate sources handed to the engine
    pub sources_seen: usize,
    /// Sources that produced a first value and entered the frontier
    pub sources_opened: usize,
    pub skipped: Vec<SkippedSource>,
    /// In the order the sources ran dry
    pub exhausted: Vec<ExhaustedSource>,
    pub values_written: u64,
    /// Most input handles open at once
    pub peak_open_sources: usize,
    pub output: Option<PathBuf>,
    pub elapsed_ms: u64,
}

impl MergeReport {
    /// Sources that ended on a read failure rather than a clean end of data
    pub fn failed_sources(&self) -> impl Iterator<Item = &ExhaustedSource> {
        self.exhausted.iter().filter(|e| e.failure.is_some())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
