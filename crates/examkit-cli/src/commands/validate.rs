//! The `examkit validate` command.

use std::path::PathBuf;

use anyhow::Result;

use examkit_core::dataset::{load_dataset, validate_dataset};

pub fn execute(dataset_path: PathBuf) -> Result<()> {
    let dataset = load_dataset(&dataset_path)?;

    println!(
        "Dataset: {} exam(s), {} result(s), {} attempt(s), {} answer(s), {} question(s)",
        dataset.exams.len(),
        dataset.results.len(),
        dataset.attempts.len(),
        dataset.answers.len(),
        dataset.questions.len()
    );

    let warnings = validate_dataset(&dataset);
    for w in &warnings {
        let prefix = w
            .exam_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Dataset valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
