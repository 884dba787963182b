//! Exam report types with JSON persistence and rank-movement detection.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::{build_exam_analytics_summary, AnalyticsSummary};
use crate::dataset::ExamSlice;
use crate::ranking::{exam_ranking, LeaderboardEntry};

/// A complete exam report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the exam.
    pub exam: ExamHeader,
    /// Aggregate analytics.
    pub summary: AnalyticsSummary,
    /// Ranked participants.
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Identifying details of the exam (without its rows).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamHeader {
    pub id: String,
    pub title: String,
    pub subject_id: Option<String>,
    pub question_count: usize,
}

impl ExamReport {
    /// Build a report from one exam's rows.
    pub fn build(slice: &ExamSlice) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            exam: ExamHeader {
                id: slice.exam.id.clone(),
                title: slice.exam.title.clone(),
                subject_id: slice.exam.subject_id.clone(),
                question_count: slice.questions.len(),
            },
            summary: build_exam_analytics_summary(slice.as_input()),
            leaderboard: exam_ranking(&slice.exam.id, &slice.results),
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
        tracing::debug!("report {} written to {}", self.id, path.display());
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ExamReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this report's leaderboard against a baseline.
    pub fn compare(&self, baseline: &ExamReport) -> RankShift {
        let rank_map = |report: &ExamReport| -> HashMap<String, (usize, f64)> {
            report
                .leaderboard
                .iter()
                .map(|e| (e.user_id.clone(), (e.rank, e.percentage)))
                .collect()
        };

        let baseline_ranks = rank_map(baseline);
        let current_ranks = rank_map(self);

        let mut climbed = Vec::new();
        let mut dropped = Vec::new();
        let mut unchanged = 0usize;
        let mut joined = 0usize;

        for entry in &self.leaderboard {
            let Some(&(baseline_rank, baseline_pct)) = baseline_ranks.get(&entry.user_id) else {
                joined += 1;
                continue;
            };
            let movement = RankMovement {
                user_id: entry.user_id.clone(),
                baseline_rank,
                current_rank: entry.rank,
                percentage_delta: entry.percentage - baseline_pct,
            };
            match entry.rank.cmp(&baseline_rank) {
                std::cmp::Ordering::Less => climbed.push(movement),
                std::cmp::Ordering::Greater => dropped.push(movement),
                std::cmp::Ordering::Equal => unchanged += 1,
            }
        }

        let left = baseline_ranks
            .keys()
            .filter(|k| !current_ranks.contains_key(*k))
            .count();

        RankShift {
            climbed,
            dropped,
            unchanged,
            joined,
            left,
        }
    }
}

/// Result of comparing two leaderboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankShift {
    /// Participants whose rank improved.
    pub climbed: Vec<RankMovement>,
    /// Participants whose rank got worse.
    pub dropped: Vec<RankMovement>,
    /// Participants holding the same rank.
    pub unchanged: usize,
    /// Participants only on the current board.
    pub joined: usize,
    /// Participants only on the baseline board.
    pub left: usize,
}

/// A participant whose rank changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankMovement {
    pub user_id: String,
    pub baseline_rank: usize,
    pub current_rank: usize,
    pub percentage_delta: f64,
}

impl RankShift {
    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} climbed, {} dropped, {} unchanged\n\n",
            self.climbed.len(),
            self.dropped.len(),
            self.unchanged
        ));

        for (title, rows) in [("Dropped", &self.dropped), ("Climbed", &self.climbed)] {
            if rows.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Student | Baseline | Current | Percentage |\n");
            md.push_str("|---------|----------|---------|------------|\n");
            for m in rows {
                md.push_str(&format!(
                    "| {} | #{} | #{} | {:+.1} |\n",
                    m.user_id, m.baseline_rank, m.current_rank, m.percentage_delta
                ));
            }
            md.push('\n');
        }

        md
    }

    /// Returns true if anyone lost ground.
    pub fn has_drops(&self) -> bool {
        !self.dropped.is_empty()
    }
}
