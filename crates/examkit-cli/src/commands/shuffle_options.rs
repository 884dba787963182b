//! The `examkit shuffle-options` command.

use anyhow::{Context, Result};

use examkit_core::{build_question_seed, shuffle_options_json};

pub fn execute(
    options: String,
    seed: Option<String>,
    exam: Option<String>,
    student: Option<String>,
    question: Option<String>,
) -> Result<()> {
    let seed = match (seed, exam, student, question) {
        (Some(seed), _, _, _) => seed,
        (None, Some(exam), Some(student), Some(question)) => {
            build_question_seed(&exam, &student, &question)
        }
        _ => anyhow::bail!("either --seed or all of --exam, --student and --question are required"),
    };

    tracing::debug!("shuffling options with seed {seed}");
    let shuffled = shuffle_options_json(&options, &seed).context("failed to shuffle options")?;
    println!("{shuffled}");

    Ok(())
}
