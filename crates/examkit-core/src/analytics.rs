//! Exam analytics: completion rates, averages, percentage histograms,
//! per-question accuracy and difficulty counts.
//!
//! Every function here is total. Empty input yields `0` or a zero-filled
//! histogram, never NaN.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{
    AnswerRecord, AttemptRecord, Completion, Difficulty, ExamRecord, ExamResultRecord,
    QuestionRecord,
};

/// Number of decile buckets in a score distribution.
pub const BUCKET_COUNT: usize = 10;

/// Fraction of records marked complete; `0.0` when there are none.
pub fn compute_completion_rate<C: Completion>(records: &[C]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let completed = records.iter().filter(|r| r.is_completed()).count();
    completed as f64 / records.len() as f64
}

/// Arithmetic mean; `0.0` for an empty collection.
pub fn compute_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// One bar of a percentage histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBucket {
    /// Label such as `"30-40"`.
    pub range: String,
    /// Number of values in the bucket.
    pub count: usize,
}

/// Count percentages into ten decile buckets.
///
/// Lower bounds are inclusive and upper bounds exclusive, except `90-100`
/// which also holds exactly 100. Values outside `[0, 100]` are clamped to the
/// nearest bucket; NaN is skipped.
pub fn bucketize_percentages(values: &[f64]) -> Vec<ScoreBucket> {
    let mut counts = [0usize; BUCKET_COUNT];
    for &v in values {
        if v.is_nan() {
            continue;
        }
        let idx = (v.clamp(0.0, 100.0) / 10.0).floor() as usize;
        counts[idx.min(BUCKET_COUNT - 1)] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| ScoreBucket {
            range: format!("{}-{}", i * 10, (i + 1) * 10),
            count,
        })
        .collect()
}

/// Accuracy of a single question across all answers to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAccuracy {
    pub question_id: String,
    /// Answers received.
    pub attempts: usize,
    /// Answers marked correct.
    pub correct: usize,
    /// `correct / attempts`.
    pub accuracy: f64,
}

/// Group answers by question and compute the share answered correctly.
///
/// Sorted by question id.
pub fn compute_question_accuracy(answers: &[AnswerRecord]) -> Vec<QuestionAccuracy> {
    let mut grouped: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for a in answers {
        let entry = grouped.entry(a.question_id.as_str()).or_default();
        entry.0 += 1;
        if a.is_correct {
            entry.1 += 1;
        }
    }

    grouped
        .into_iter()
        .map(|(question_id, (attempts, correct))| QuestionAccuracy {
            question_id: question_id.to_string(),
            attempts,
            correct,
            accuracy: correct as f64 / attempts as f64,
        })
        .collect()
}

/// Count questions per difficulty. Difficulties that do not occur are omitted.
pub fn compute_difficulty_breakdown(questions: &[QuestionRecord]) -> BTreeMap<Difficulty, usize> {
    let mut breakdown = BTreeMap::new();
    for q in questions {
        *breakdown.entry(q.difficulty).or_insert(0) += 1;
    }
    breakdown
}

/// Rows needed to summarise one exam.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticsInput<'a> {
    pub exam: &'a ExamRecord,
    pub results: &'a [ExamResultRecord],
    pub attempts: &'a [AttemptRecord],
    pub answers: &'a [AnswerRecord],
    pub questions: &'a [QuestionRecord],
}

/// Analytics for a single exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub exam_id: String,
    /// Number of result records.
    pub participants: usize,
    /// Result records marked complete.
    pub completed: usize,
    /// `completed / participants`.
    pub completion_rate: f64,
    /// Share of attempts that were submitted.
    pub attempt_completion_rate: f64,
    pub average_score: f64,
    pub average_percentage: f64,
    /// Ten decile buckets over result percentages.
    pub score_distribution: Vec<ScoreBucket>,
    pub question_accuracy: Vec<QuestionAccuracy>,
    pub difficulty_breakdown: BTreeMap<Difficulty, usize>,
}

/// Compose the individual measures into one summary.
///
/// Participant and completion figures come from results, not attempts.
pub fn build_exam_analytics_summary(input: AnalyticsInput<'_>) -> AnalyticsSummary {
    let scores: Vec<f64> = input.results.iter().map(|r| r.score).collect();
    let percentages: Vec<f64> = input.results.iter().map(|r| r.percentage).collect();

    AnalyticsSummary {
        exam_id: input.exam.id.clone(),
        participants: input.results.len(),
        completed: input.results.iter().filter(|r| r.is_completed).count(),
        completion_rate: compute_completion_rate(input.results),
        attempt_completion_rate: compute_completion_rate(input.attempts),
        average_score: compute_average(&scores),
        average_percentage: compute_average(&percentages),
        score_distribution: bucketize_percentages(&percentages),
        question_accuracy: compute_question_accuracy(input.answers),
        difficulty_breakdown: compute_difficulty_breakdown(input.questions),
    }
}
