//! The `examkit rank` command.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use examkit_core::config::load_config_from;
use examkit_core::dataset::load_dataset;
use examkit_core::model::ExamResultRecord;
use examkit_core::ranking::{exam_ranking, subject_cumulative_ranking, LeaderboardEntry};

use super::resolve_format;

pub fn execute(
    dataset_path: PathBuf,
    exam: Option<String>,
    subject: Option<String>,
    users: Option<String>,
    limit: Option<usize>,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let dataset = load_dataset(&dataset_path)?;
    let roster = users.as_deref().map(parse_roster);

    let (title, board) = match (exam, subject) {
        (Some(exam_id), _) => {
            dataset
                .exam(&exam_id)
                .with_context(|| format!("exam '{exam_id}' not found"))?;
            let results: Vec<ExamResultRecord> = dataset
                .results
                .iter()
                .filter(|r| roster.as_ref().map_or(true, |set| set.contains(&r.user_id)))
                .cloned()
                .collect();
            (format!("Exam {exam_id}"), exam_ranking(&exam_id, &results))
        }
        (None, Some(subject_id)) => {
            let exam_count = dataset
                .exams
                .iter()
                .filter(|e| e.subject_id.as_deref() == Some(subject_id.as_str()))
                .count();
            anyhow::ensure!(exam_count > 0, "no exams found for subject '{subject_id}'");
            tracing::info!("ranking {exam_count} exam(s) in subject {subject_id}");
            let board = subject_cumulative_ranking(
                &subject_id,
                &dataset.exams,
                &dataset.results,
                roster.as_ref(),
                config.recent_window,
            );
            (format!("Subject {subject_id}"), board)
        }
        (None, None) => anyhow::bail!("either --exam or --subject is required"),
    };

    let shown = limit.or(config.leaderboard_limit).unwrap_or(board.len());
    let rows = &board[..shown.min(board.len())];

    if resolve_format(format, &config) == "json" {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("{title}: no ranked students.");
        return Ok(());
    }

    println!("{title} ({} ranked)", board.len());
    println!("{}", leaderboard_table(rows));
    if rows.len() < board.len() {
        println!("... {} more", board.len() - rows.len());
    }

    Ok(())
}

fn parse_roster(users: &str) -> HashSet<String> {
    users
        .split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(String::from)
        .collect()
}

fn leaderboard_table(rows: &[LeaderboardEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Rank", "Student", "Roll", "Score", "Percentage", "Recent", "Time", "Exams",
    ]);

    for e in rows {
        table.add_row(vec![
            Cell::new(e.rank),
            Cell::new(&e.user_id),
            Cell::new(e.roll_number.as_deref().unwrap_or("-")),
            Cell::new(format!("{:.2}", e.score)),
            Cell::new(format!("{:.1}%", e.percentage)),
            Cell::new(
                e.recent_performance
                    .map(|p| format!("{p:.1}%"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(
                e.completion_time_secs
                    .map(|s| format!("{s}s"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(e.exams_taken),
        ]);
    }

    table
}
