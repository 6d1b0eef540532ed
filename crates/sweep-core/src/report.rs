//! Per-run records and the machine-readable sweep report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize, Clone)]
pub struct SweepReport {
    pub sweep: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub summary: SweepSummary,
    pub runs: Vec<RunRecord>,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub spawn_failed: usize,
    pub planned: usize,
}

#[derive(Debug, Serialize, Clone)]
pub struct RunRecord {
    pub batch_size: String,
    pub input_output_len: String,
    pub log_file: PathBuf,
    pub command: String,
    pub status: RunStatus,
    pub exit_code: Option<i32>,
    pub message: Option<String>,
    pub duration_ms: u64,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Succeeded,
    Failed,
    TimedOut,
    SpawnFailed,
    /// Dry run: nothing was executed.
    Planned,
}

impl SweepReport {
    pub fn new(sweep: &str, output_dir: PathBuf, dry_run: bool) -> Self {
        Self {
            sweep: sweep.to_string(),
            started_at: Utc::now(),
            finished_at: None,
            output_dir,
            dry_run,
            summary: SweepSummary::default(),
            runs: Vec::new(),
        }
    }

    pub fn add_run(&mut self, record: RunRecord) {
        self.summary.total += 1;
        match record.status {
            RunStatus::Succeeded => self.summary.succeeded += 1,
            RunStatus::Failed => self.summary.failed += 1,
            RunStatus::TimedOut => self.summary.timed_out += 1,
            RunStatus::SpawnFailed => self.summary.spawn_failed += 1,
            RunStatus::Planned => self.summary.planned += 1,
        }
        self.runs.push(record);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// True when every executed run exited zero. Planned runs count as clean.
    pub fn all_succeeded(&self) -> bool {
        self.summary.failed == 0 && self.summary.timed_out == 0 && self.summary.spawn_failed == 0
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
