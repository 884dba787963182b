//! Exam dataset loading and validation.
//!
//! A dataset is the set of rows the surrounding application would fetch from
//! storage: exams, results, attempts, answers and questions. Files are TOML or
//! JSON, chosen by extension. Timestamps are RFC 3339 strings.
//!
//! Question difficulty is case-insensitive `easy`, `medium` or `hard`; the
//! legacy labels `moderate` and `difficult` are read as medium and hard.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsInput;
use crate::model::{
    AnswerRecord, AttemptRecord, Difficulty, ExamRecord, ExamResultRecord, QuestionRecord,
};

/// All rows loaded from one or more dataset files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamDataset {
    pub exams: Vec<ExamRecord>,
    pub results: Vec<ExamResultRecord>,
    pub attempts: Vec<AttemptRecord>,
    pub answers: Vec<AnswerRecord>,
    pub questions: Vec<QuestionRecord>,
}

/// The rows of a dataset that belong to one exam.
#[derive(Debug, Clone)]
pub struct ExamSlice {
    pub exam: ExamRecord,
    pub results: Vec<ExamResultRecord>,
    pub attempts: Vec<AttemptRecord>,
    pub answers: Vec<AnswerRecord>,
    pub questions: Vec<QuestionRecord>,
}

impl ExamSlice {
    /// Borrow the slice as aggregator input.
    pub fn as_input(&self) -> AnalyticsInput<'_> {
        AnalyticsInput {
            exam: &self.exam,
            results: &self.results,
            attempts: &self.attempts,
            answers: &self.answers,
            questions: &self.questions,
        }
    }
}

impl ExamDataset {
    /// Look up an exam by id.
    pub fn exam(&self, exam_id: &str) -> Option<&ExamRecord> {
        self.exams.iter().find(|e| e.id == exam_id)
    }

    /// Collect the rows of one exam, or `None` if the exam is unknown.
    pub fn slice(&self, exam_id: &str) -> Option<ExamSlice> {
        let exam = self.exam(exam_id)?.clone();
        Some(ExamSlice {
            results: filter_exam(&self.results, exam_id, |r| &r.exam_id),
            attempts: filter_exam(&self.attempts, exam_id, |a| &a.exam_id),
            answers: filter_exam(&self.answers, exam_id, |a| &a.exam_id),
            questions: filter_exam(&self.questions, exam_id, |q| &q.exam_id),
            exam,
        })
    }

    /// Append every row of `other`.
    pub fn merge(&mut self, other: ExamDataset) {
        self.exams.extend(other.exams);
        self.results.extend(other.results);
        self.attempts.extend(other.attempts);
        self.answers.extend(other.answers);
        self.questions.extend(other.questions);
    }
}

fn filter_exam<T: Clone>(rows: &[T], exam_id: &str, key: impl Fn(&T) -> &String) -> Vec<T> {
    rows.iter().filter(|r| key(r) == exam_id).cloned().collect()
}

/// Supported dataset file encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Toml,
    Json,
}

impl DatasetFormat {
    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(DatasetFormat::Toml),
            "json" => Some(DatasetFormat::Json),
            _ => None,
        }
    }
}

/// Intermediate structure for parsing dataset files.
#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    exams: Vec<ExamRecord>,
    #[serde(default)]
    results: Vec<RawResult>,
    #[serde(default)]
    attempts: Vec<AttemptRecord>,
    #[serde(default)]
    answers: Vec<AnswerRecord>,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    exam_id: String,
    user_id: String,
    #[serde(default)]
    roll_number: Option<String>,
    score: f64,
    total_marks: f64,
    /// Derived from score and total marks when absent.
    #[serde(default)]
    percentage: Option<f64>,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    end_time: Option<String>,
    #[serde(default)]
    is_completed: bool,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    exam_id: String,
    id: String,
    difficulty: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    options: Vec<serde_json::Value>,
}

fn parse_timestamp(value: Option<String>, field: &str, row: &str) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .with_context(|| format!("invalid {field} '{s}' for result {row}"))
        })
        .transpose()
}

/// Parse a single dataset file.
pub fn parse_dataset(path: &Path) -> Result<ExamDataset> {
    let format = DatasetFormat::from_path(path)
        .with_context(|| format!("unsupported dataset extension: {}", path.display()))?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file: {}", path.display()))?;

    parse_dataset_str(&content, format, path)
}

/// Parse dataset text (useful for testing).
pub fn parse_dataset_str(
    content: &str,
    format: DatasetFormat,
    source_path: &Path,
) -> Result<ExamDataset> {
    let raw: RawDataset = match format {
        DatasetFormat::Toml => toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?,
        DatasetFormat::Json => serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?,
    };

    let results = raw
        .results
        .into_iter()
        .map(|r| {
            let row = format!("{}/{}", r.exam_id, r.user_id);
            let percentage = r.percentage.unwrap_or(if r.total_marks > 0.0 {
                r.score / r.total_marks * 100.0
            } else {
                0.0
            });
            Ok(ExamResultRecord {
                start_time: parse_timestamp(r.start_time, "start_time", &row)?,
                end_time: parse_timestamp(r.end_time, "end_time", &row)?,
                exam_id: r.exam_id,
                user_id: r.user_id,
                roll_number: r.roll_number,
                score: r.score,
                total_marks: r.total_marks,
                percentage,
                is_completed: r.is_completed,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let questions = raw
        .questions
        .into_iter()
        .map(|q| {
            let difficulty: Difficulty = q
                .difficulty
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question {}: {}", q.id, e))?;
            Ok(QuestionRecord {
                exam_id: q.exam_id,
                id: q.id,
                difficulty,
                text: q.text,
                options: q.options,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ExamDataset {
        exams: raw.exams,
        results,
        attempts: raw.attempts,
        answers: raw.answers,
        questions,
    })
}

/// Recursively load and merge every dataset file in a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_dataset_directory(dir: &Path) -> Result<ExamDataset> {
    let mut dataset = ExamDataset::default();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            dataset.merge(load_dataset_directory(&path)?);
        } else if DatasetFormat::from_path(&path).is_some() {
            match parse_dataset(&path) {
                Ok(part) => {
                    tracing::debug!("loaded {}", path.display());
                    dataset.merge(part);
                }
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(dataset)
}

/// Load a dataset from a file or a directory.
pub fn load_dataset(path: &Path) -> Result<ExamDataset> {
    if path.is_dir() {
        load_dataset_directory(path)
    } else {
        parse_dataset(path)
    }
}

/// A warning from dataset validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The exam the warning concerns (if applicable).
    pub exam_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn new(exam_id: &str, message: impl Into<String>) -> Self {
        Self {
            exam_id: Some(exam_id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a dataset for common issues.
pub fn validate_dataset(dataset: &ExamDataset) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut exam_ids = HashSet::new();
    for exam in &dataset.exams {
        if !exam_ids.insert(exam.id.as_str()) {
            warnings.push(ValidationWarning::new(
                &exam.id,
                format!("duplicate exam ID: {}", exam.id),
            ));
        }
    }

    let mut question_keys = HashSet::new();
    for q in &dataset.questions {
        if !question_keys.insert((q.exam_id.as_str(), q.id.as_str())) {
            warnings.push(ValidationWarning::new(
                &q.exam_id,
                format!("duplicate question ID: {}", q.id),
            ));
        }
        if !exam_ids.contains(q.exam_id.as_str()) {
            warnings.push(ValidationWarning::new(
                &q.exam_id,
                format!("question {} refers to an unknown exam", q.id),
            ));
        }
    }

    for r in &dataset.results {
        if !exam_ids.contains(r.exam_id.as_str()) {
            warnings.push(ValidationWarning::new(
                &r.exam_id,
                format!("result for {} refers to an unknown exam", r.user_id),
            ));
        }
        if !(0.0..=100.0).contains(&r.percentage) {
            warnings.push(ValidationWarning::new(
                &r.exam_id,
                format!("result for {} has percentage {} outside 0-100", r.user_id, r.percentage),
            ));
        }
        if r.score > r.total_marks {
            warnings.push(ValidationWarning::new(
                &r.exam_id,
                format!(
                    "result for {} scores {} out of {}",
                    r.user_id, r.score, r.total_marks
                ),
            ));
        }
        if let (Some(start), Some(end)) = (r.start_time, r.end_time) {
            if end < start {
                warnings.push(ValidationWarning::new(
                    &r.exam_id,
                    format!("result for {} ends before it starts", r.user_id),
                ));
            }
        }
    }

    for a in &dataset.attempts {
        if !exam_ids.contains(a.exam_id.as_str()) {
            warnings.push(ValidationWarning::new(
                &a.exam_id,
                "attempt refers to an unknown exam",
            ));
        }
    }

    for a in &dataset.answers {
        if !question_keys.contains(&(a.exam_id.as_str(), a.question_id.as_str())) {
            warnings.push(ValidationWarning::new(
                &a.exam_id,
                format!("answer refers to unknown question {}", a.question_id),
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[[exams]]
id = "midterm"
title = "Algebra Midterm"
subject_id = "math"

[[questions]]
exam_id = "midterm"
id = "q1"
difficulty = "easy"
text = "2 + 2 = ?"
options = [
    { text = "4", isCorrect = true },
    { text = "5", isCorrect = false },
]

[[questions]]
exam_id = "midterm"
id = "q2"
difficulty = "MEDIUM"

[[results]]
exam_id = "midterm"
user_id = "alice"
roll_number = "A-01"
score = 80
total_marks = 100
percentage = 80
start_time = "2024-05-01T09:00:00Z"
end_time = "2024-05-01T09:40:00Z"
is_completed = true

[[results]]
exam_id = "midterm"
user_id = "bob"
score = 30
total_marks = 40
is_completed = true

[[attempts]]
exam_id = "midterm"
user_id = "alice"
is_completed = true

[[answers]]
exam_id = "midterm"
question_id = "q1"
is_correct = true
"#;

    fn parse_toml(content: &str) -> Result<ExamDataset> {
        parse_dataset_str(content, DatasetFormat::Toml, &PathBuf::from("test.toml"))
    }

    #[test]
    fn parse_valid_toml() {
        let dataset = parse_toml(VALID_TOML).unwrap();
        assert_eq!(dataset.exams.len(), 1);
        assert_eq!(dataset.exams[0].subject_id.as_deref(), Some("math"));
        assert_eq!(dataset.questions.len(), 2);
        assert_eq!(dataset.questions[0].difficulty, Difficulty::Easy);
        assert_eq!(dataset.questions[0].options.len(), 2);
        assert_eq!(dataset.results[0].completion_time_secs(), Some(2400));
        assert!(validate_dataset(&dataset).is_empty());
    }

    #[test]
    fn legacy_difficulty_labels_are_accepted() {
        let content = r#"
[[questions]]
exam_id = "e1"
id = "q1"
difficulty = "moderate"

[[questions]]
exam_id = "e1"
id = "q2"
difficulty = "Difficult"
"#;
        let dataset = parse_toml(content).unwrap();
        assert_eq!(dataset.questions[0].difficulty, Difficulty::Medium);
        assert_eq!(dataset.questions[1].difficulty, Difficulty::Hard);

        let bad = content.replace("moderate", "trivial");
        let err = parse_toml(&bad).unwrap_err();
        assert!(format!("{err:#}").contains("unknown difficulty"));
    }

    #[test]
    fn missing_percentage_is_derived() {
        let dataset = parse_toml(VALID_TOML).unwrap();
        let bob = dataset.results.iter().find(|r| r.user_id == "bob").unwrap();
        assert_eq!(bob.percentage, 75.0);
    }

    #[test]
    fn parse_json_dataset() {
        let json = r#"{
            "exams": [{"id": "e1"}],
            "results": [{"exam_id": "e1", "user_id": "u1", "score": 5, "total_marks": 10, "is_completed": true}],
            "questions": [{"exam_id": "e1", "id": "q1", "difficulty": "hard"}]
        }"#;
        let dataset =
            parse_dataset_str(json, DatasetFormat::Json, &PathBuf::from("test.json")).unwrap();
        assert_eq!(dataset.results[0].percentage, 50.0);
        assert_eq!(dataset.questions[0].difficulty, Difficulty::Hard);
        assert!(dataset.attempts.is_empty());
    }

    #[test]
    fn unknown_difficulty_fails() {
        let toml = r#"
[[questions]]
exam_id = "e1"
id = "q1"
difficulty = "trivial"
"#;
        let err = parse_toml(toml).unwrap_err();
        assert!(format!("{err:#}").contains("unknown difficulty"));
    }

    #[test]
    fn bad_timestamp_fails() {
        let toml = r#"
[[results]]
exam_id = "e1"
user_id = "u1"
score = 1
total_marks = 2
start_time = "yesterday"
"#;
        let err = parse_toml(toml).unwrap_err();
        assert!(format!("{err:#}").contains("invalid start_time"));
    }

    #[test]
    fn parse_malformed_toml() {
        assert!(parse_toml("this is not [valid toml }{").is_err());
    }

    #[test]
    fn slice_filters_by_exam() {
        let mut dataset = parse_toml(VALID_TOML).unwrap();
        dataset.results.push(ExamResultRecord {
            exam_id: "final".into(),
            ..dataset.results[0].clone()
        });
        let slice = dataset.slice("midterm").unwrap();
        assert_eq!(slice.results.len(), 2);
        assert_eq!(slice.as_input().questions.len(), 2);
        assert!(dataset.slice("final").is_none());
    }

    #[test]
    fn validate_reports_problems() {
        let toml = r#"
[[exams]]
id = "e1"

[[exams]]
id = "e1"

[[questions]]
exam_id = "e1"
id = "q1"
difficulty = "easy"

[[questions]]
exam_id = "e1"
id = "q1"
difficulty = "hard"

[[results]]
exam_id = "e1"
user_id = "u1"
score = 120
total_marks = 100
start_time = "2024-05-01T10:00:00Z"
end_time = "2024-05-01T09:00:00Z"

[[results]]
exam_id = "ghost"
user_id = "u2"
score = 1
total_marks = 10

[[answers]]
exam_id = "e1"
question_id = "q9"
is_correct = false
"#;
        let warnings = validate_dataset(&parse_toml(toml).unwrap());
        let has = |needle: &str| warnings.iter().any(|w| w.message.contains(needle));
        assert!(has("duplicate exam ID"));
        assert!(has("duplicate question ID"));
        assert!(has("outside 0-100"));
        assert!(has("scores 120 out of 100"));
        assert!(has("ends before it starts"));
        assert!(has("unknown exam"));
        assert!(has("unknown question q9"));
    }

    #[test]
    fn load_directory_merges_and_skips_broken() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.toml"), VALID_TOML).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("nested/b.json"),
            r#"{"exams": [{"id": "final"}]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.toml"), "[[exams]\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let dataset = load_dataset(dir.path()).unwrap();
        assert_eq!(dataset.exams.len(), 2);
        assert!(dataset.exam("final").is_some());
    }

    #[test]
    fn unsupported_extension_fails() {
        let err = parse_dataset(Path::new("rows.csv")).unwrap_err();
        assert!(err.to_string().contains("unsupported dataset extension"));
    }
}
