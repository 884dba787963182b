//! The `examkit paper` command.

use std::path::PathBuf;

use anyhow::Result;
use serde_json::Value;

use examkit_core::config::load_config_from;
use examkit_core::shuffle::personalize_paper;

use super::{load_exam_slice, resolve_format};

pub fn execute(
    dataset_path: PathBuf,
    exam_id: String,
    student_id: String,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let slice = load_exam_slice(&dataset_path, &exam_id)?;
    anyhow::ensure!(
        !slice.questions.is_empty(),
        "exam '{exam_id}' has no questions"
    );

    let paper = personalize_paper(&exam_id, &student_id, &slice.questions);

    if resolve_format(format, &config) == "json" {
        println!("{}", serde_json::to_string_pretty(&paper)?);
        return Ok(());
    }

    println!("Paper for {student_id} in exam {exam_id}:");
    for question in &paper {
        let text = slice
            .questions
            .iter()
            .find(|q| q.id == question.question_id)
            .map(|q| q.text.as_str())
            .unwrap_or_default();
        println!("\n{}. [{}] {}", question.position, question.question_id, text);
        for (idx, option) in question.options.iter().enumerate() {
            println!("   {}) {}", option_label(idx), option_text(option));
        }
    }

    Ok(())
}

fn option_label(idx: usize) -> char {
    char::from(b'a' + (idx % 26) as u8)
}

/// Display form of an option: its `text` field when present, else the raw JSON.
fn option_text(option: &Value) -> String {
    match option.get("text").and_then(Value::as_str) {
        Some(text) => text.to_string(),
        None => match option {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    }
}
