//! The `examkit analyze` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use examkit_core::analytics::build_exam_analytics_summary;
use examkit_core::config::load_config_from;

use super::{load_exam_slice, resolve_format};

pub fn execute(
    dataset_path: PathBuf,
    exam_id: String,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let slice = load_exam_slice(&dataset_path, &exam_id)?;

    tracing::info!(
        "analyzing exam {} ({} results, {} answers)",
        exam_id,
        slice.results.len(),
        slice.answers.len()
    );
    let summary = build_exam_analytics_summary(slice.as_input());

    if resolve_format(format, &config) == "json" {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Exam: {}", summary.exam_id);
    println!(
        "Participants: {} ({} completed, {:.1}% completion)",
        summary.participants,
        summary.completed,
        summary.completion_rate * 100.0
    );
    println!(
        "Attempt completion: {:.1}%",
        summary.attempt_completion_rate * 100.0
    );
    println!(
        "Average score: {:.2} | Average percentage: {:.1}%",
        summary.average_score, summary.average_percentage
    );

    let mut distribution = Table::new();
    distribution.set_header(vec!["Range", "Students"]);
    for bucket in &summary.score_distribution {
        distribution.add_row(vec![Cell::new(&bucket.range), Cell::new(bucket.count)]);
    }
    println!("\nScore distribution:\n{distribution}");

    if !summary.question_accuracy.is_empty() {
        let mut accuracy = Table::new();
        accuracy.set_header(vec!["Question", "Answers", "Correct", "Accuracy"]);
        for q in &summary.question_accuracy {
            accuracy.add_row(vec![
                Cell::new(&q.question_id),
                Cell::new(q.attempts),
                Cell::new(q.correct),
                Cell::new(format!("{:.1}%", q.accuracy * 100.0)),
            ]);
        }
        println!("\nQuestion accuracy:\n{accuracy}");
    }

    if !summary.difficulty_breakdown.is_empty() {
        let breakdown: Vec<String> = summary
            .difficulty_breakdown
            .iter()
            .map(|(difficulty, count)| format!("{difficulty}: {count}"))
            .collect();
        println!("\nQuestions by difficulty: {}", breakdown.join(", "));
    }

    Ok(())
}
