//! Core record types for examkit.
//!
//! These are the rows the surrounding application fetches from storage and
//! hands to the aggregator, the ranking engine and the paper shuffler. The
//! core only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An exam definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamRecord {
    /// Unique identifier for this exam.
    pub id: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Subject this exam counts towards, if any.
    #[serde(default)]
    pub subject_id: Option<String>,
}

/// One student's graded result for one exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamResultRecord {
    /// Exam this result belongs to.
    pub exam_id: String,
    /// Student who sat the exam.
    pub user_id: String,
    /// Roll number shown on leaderboards.
    #[serde(default)]
    pub roll_number: Option<String>,
    /// Marks obtained.
    pub score: f64,
    /// Maximum obtainable marks.
    pub total_marks: f64,
    /// Score as a percentage of total marks, 0 to 100.
    pub percentage: f64,
    /// When the student started.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// When the student submitted.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Whether the attempt was submitted.
    #[serde(default)]
    pub is_completed: bool,
}

impl ExamResultRecord {
    /// Time taken in whole seconds, when both timestamps are present and ordered.
    pub fn completion_time_secs(&self) -> Option<i64> {
        let (start, end) = (self.start_time?, self.end_time?);
        let secs = (end - start).num_seconds();
        (secs >= 0).then_some(secs)
    }
}

/// An exam attempt, submitted or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub exam_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub is_completed: bool,
}

/// A single graded answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub exam_id: String,
    pub question_id: String,
    pub is_correct: bool,
}

/// A question as stored for an exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Exam this question belongs to.
    pub exam_id: String,
    /// Question identifier, unique within the exam.
    pub id: String,
    /// Difficulty category.
    pub difficulty: Difficulty,
    /// Display text.
    #[serde(default)]
    pub text: String,
    /// Answer options, kept opaque (at least a text and a correctness flag).
    #[serde(default)]
    pub options: Vec<serde_json::Value>,
}

/// Question difficulty categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "EASY"),
            Difficulty::Medium => write!(f, "MEDIUM"),
            Difficulty::Hard => write!(f, "HARD"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "moderate" => Ok(Difficulty::Medium),
            "hard" | "difficult" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Anything that can be counted towards a completion rate.
pub trait Completion {
    fn is_completed(&self) -> bool;
}

impl Completion for ExamResultRecord {
    fn is_completed(&self) -> bool {
        self.is_completed
    }
}

impl Completion for AttemptRecord {
    fn is_completed(&self) -> bool {
        self.is_completed
    }
}
