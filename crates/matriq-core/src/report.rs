//! Finished-session report with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::puzzle::CategoryScore;

/// The immutable result of one completed test session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Overall score.
    pub score: i32,
    /// Population percentile for the score. Clamped at 99 above; the
    /// formula applies no lower clamp, so this can be negative.
    pub percentile: i32,
    /// Cognitive profile rows, pattern reasoning first.
    pub profile: Vec<CategoryScore>,
    /// Qualitative strength labels.
    pub strengths: Vec<String>,
    /// Qualitative weakness labels.
    pub weaknesses: Vec<String>,
    /// Wall-clock seconds from first question shown to last answer.
    pub total_elapsed_secs: u64,
    /// Number of questions in the session.
    pub question_count: usize,
    /// Questions answered correctly.
    pub correct_count: usize,
}

impl TestReport {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        score: i32,
        percentile: i32,
        profile: Vec<CategoryScore>,
        strengths: Vec<String>,
        weaknesses: Vec<String>,
        total_elapsed_secs: u64,
        question_count: usize,
        correct_count: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            score,
            percentile,
            profile,
            strengths,
            weaknesses,
            total_elapsed_secs,
            question_count,
            correct_count,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: TestReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
