//! Report pipeline integration tests.
//!
//! Loads the sample dataset, builds reports, persists them as JSON and
//! HTML, and checks rank-movement detection between two sittings.

use std::path::Path;

use examkit_core::dataset::{load_dataset, validate_dataset, ExamDataset};
use examkit_core::model::ExamResultRecord;
use examkit_core::report::ExamReport;
use examkit_core::shuffle::{personalize_paper, shuffle_options_json};
use examkit_core::build_question_seed;

fn sample_dataset() -> ExamDataset {
    load_dataset(Path::new("../../datasets/school.toml")).unwrap()
}

#[test]
fn sample_dataset_is_clean() {
    let dataset = sample_dataset();
    assert_eq!(dataset.exams.len(), 3);
    assert!(validate_dataset(&dataset).is_empty());
}

#[test]
fn report_survives_json_roundtrip() {
    let dataset = sample_dataset();
    let report = ExamReport::build(&dataset.slice("midterm").unwrap());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("midterm.json");
    report.save_json(&path).unwrap();
    let loaded = ExamReport::load_json(&path).unwrap();

    assert_eq!(loaded.id, report.id);
    assert_eq!(loaded.exam.question_count, 3);
    assert_eq!(loaded.summary.score_distribution, report.summary.score_distribution);
    assert_eq!(loaded.leaderboard, report.leaderboard);
    assert!(loaded.compare(&report).dropped.is_empty());
}

#[test]
fn html_report_renders_sample_exam() {
    let dataset = sample_dataset();
    let report = ExamReport::build(&dataset.slice("midterm").unwrap());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("midterm.html");
    examkit_report::write_html_report(&report, &path).unwrap();

    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("Algebra Midterm"));
    assert!(html.contains("bob"));
    assert!(html.contains("q3"));
}

#[test]
fn resit_detects_rank_changes() {
    let mut dataset = sample_dataset();
    let baseline = ExamReport::build(&dataset.slice("midterm").unwrap());

    // Dave resits and overtakes carol; a new student joins.
    for r in dataset.results.iter_mut() {
        if r.exam_id == "midterm" && r.user_id == "dave" {
            r.score = 60.0;
            r.percentage = 60.0;
            r.is_completed = true;
        }
    }
    dataset.results.push(ExamResultRecord {
        exam_id: "midterm".into(),
        user_id: "frank".into(),
        roll_number: None,
        score: 10.0,
        total_marks: 100.0,
        percentage: 10.0,
        start_time: None,
        end_time: None,
        is_completed: true,
    });

    let current = ExamReport::build(&dataset.slice("midterm").unwrap());
    let shift = current.compare(&baseline);

    assert_eq!(shift.climbed.len(), 1);
    assert_eq!(shift.climbed[0].user_id, "dave");
    assert_eq!(shift.climbed[0].baseline_rank, 4);
    assert_eq!(shift.climbed[0].current_rank, 3);
    assert_eq!(shift.dropped.len(), 1);
    assert_eq!(shift.dropped[0].user_id, "carol");
    assert_eq!(shift.unchanged, 2);
    assert_eq!(shift.joined, 1);
    assert_eq!(shift.left, 0);
    assert!(shift.has_drops());
    assert!(shift.to_markdown().contains("| carol | #3 | #4 | +0.0 |"));
}

#[test]
fn paper_options_match_option_shuffler() {
    let dataset = sample_dataset();
    let slice = dataset.slice("midterm").unwrap();

    for student in ["alice", "bob", "carol"] {
        let paper = personalize_paper("midterm", student, &slice.questions);
        assert_eq!(paper.len(), slice.questions.len());

        for placed in &paper {
            let question = slice
                .questions
                .iter()
                .find(|q| q.id == placed.question_id)
                .unwrap();
            let encoded = serde_json::to_string(&question.options).unwrap();
            let seed = build_question_seed("midterm", student, &question.id);
            let expected = shuffle_options_json(&encoded, &seed).unwrap();
            assert_eq!(serde_json::to_string(&placed.options).unwrap(), expected);
        }
    }
}
