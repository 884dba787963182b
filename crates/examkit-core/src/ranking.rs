//! Leaderboards for a single exam and for all exams of a subject.
//!
//! Entries are ordered by:
//! 1. score, descending (average percentage for subject leaderboards)
//! 2. percentage, descending
//! 3. completion time, ascending, with missing times last
//! 4. user id, ascending
//!
//! Ranks are dense and 1-based: the entry at index `i` has rank `i + 1`.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::analytics::compute_average;
use crate::model::{ExamRecord, ExamResultRecord};

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    pub user_id: String,
    /// Marks for an exam; average percentage for a subject.
    pub score: f64,
    /// Maximum marks (summed across exams for a subject).
    pub total_marks: f64,
    /// Percentage for an exam; marks obtained over marks possible for a subject.
    pub percentage: f64,
    /// Mean percentage over the most recent results (subject leaderboards).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_performance: Option<f64>,
    /// Seconds taken (mean over the timed results for a subject).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time_secs: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
    /// Number of results this entry was built from.
    pub exams_taken: usize,
}

/// Total order used by every leaderboard.
pub fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.percentage.total_cmp(&a.percentage))
        .then_with(|| compare_completion_time(a.completion_time_secs, b.completion_time_secs))
        .then_with(|| a.user_id.cmp(&b.user_id))
}

fn compare_completion_time(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort entries and assign dense ranks.
pub fn rank_entries(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by(compare_entries);
    for (idx, entry) in entries.iter_mut().enumerate() {
        entry.rank = idx + 1;
    }
    entries
}

/// Leaderboard for one exam.
///
/// A participant with several results for the exam appears once, with the
/// result that ranks highest.
pub fn exam_ranking(exam_id: &str, results: &[ExamResultRecord]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = results
        .iter()
        .filter(|r| r.exam_id == exam_id)
        .map(|r| LeaderboardEntry {
            rank: 0,
            user_id: r.user_id.clone(),
            score: r.score,
            total_marks: r.total_marks,
            percentage: r.percentage,
            recent_performance: None,
            completion_time_secs: r.completion_time_secs(),
            roll_number: r.roll_number.clone(),
            exams_taken: 1,
        })
        .collect();

    entries.sort_by(compare_entries);
    let mut seen = HashSet::new();
    entries.retain(|e| seen.insert(e.user_id.clone()));

    rank_entries(entries)
}

/// Cumulative leaderboard across every exam of a subject.
///
/// Each student's score is their average percentage over the subject's
/// exams. `user_filter` restricts the board to a roster; `recent_window`
/// is how many of the latest results feed `recent_performance`.
pub fn subject_cumulative_ranking(
    subject_id: &str,
    exams: &[ExamRecord],
    results: &[ExamResultRecord],
    user_filter: Option<&HashSet<String>>,
    recent_window: usize,
) -> Vec<LeaderboardEntry> {
    let subject_exams: HashSet<&str> = exams
        .iter()
        .filter(|e| e.subject_id.as_deref() == Some(subject_id))
        .map(|e| e.id.as_str())
        .collect();

    let mut per_user: BTreeMap<&str, Vec<&ExamResultRecord>> = BTreeMap::new();
    for r in results {
        if !subject_exams.contains(r.exam_id.as_str()) {
            continue;
        }
        if let Some(filter) = user_filter {
            if !filter.contains(&r.user_id) {
                continue;
            }
        }
        per_user.entry(r.user_id.as_str()).or_default().push(r);
    }

    let entries = per_user
        .into_iter()
        .map(|(user_id, user_results)| cumulative_entry(user_id, user_results, recent_window))
        .collect();

    rank_entries(entries)
}

fn cumulative_entry(
    user_id: &str,
    mut results: Vec<&ExamResultRecord>,
    recent_window: usize,
) -> LeaderboardEntry {
    let percentages: Vec<f64> = results.iter().map(|r| r.percentage).collect();
    let score: f64 = results.iter().map(|r| r.score).sum();
    let total_marks: f64 = results.iter().map(|r| r.total_marks).sum();
    let percentage = if total_marks > 0.0 {
        score / total_marks * 100.0
    } else {
        0.0
    };

    // Mean per timed result, so students who sat more exams are not penalized.
    let times: Vec<i64> = results.iter().filter_map(|r| r.completion_time_secs()).collect();
    let completion_time_secs = (!times.is_empty())
        .then(|| (times.iter().sum::<i64>() as f64 / times.len() as f64).round() as i64);

    // Newest first; results without an end time count as oldest.
    results.sort_by(|a, b| b.end_time.cmp(&a.end_time));
    let recent: Vec<f64> = results
        .iter()
        .take(recent_window)
        .map(|r| r.percentage)
        .collect();
    let recent_performance = (!recent.is_empty()).then(|| compute_average(&recent));

    LeaderboardEntry {
        rank: 0,
        user_id: user_id.to_string(),
        score: compute_average(&percentages),
        total_marks,
        percentage,
        recent_performance,
        completion_time_secs,
        roll_number: results.iter().find_map(|r| r.roll_number.clone()),
        exams_taken: results.len(),
    }
}
