//! The `examkit compare` command.

use std::path::PathBuf;

use anyhow::Result;

use examkit_core::report::ExamReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_drop: bool,
    format: String,
) -> Result<()> {
    let baseline = ExamReport::load_json(&baseline_path)?;
    let current = ExamReport::load_json(&current_path)?;

    if baseline.exam.id != current.exam.id {
        tracing::warn!(
            "comparing reports of different exams: {} vs {}",
            baseline.exam.id,
            current.exam.id
        );
    }

    let shift = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", shift.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&shift)?);
        }
        _ => {
            println!(
                "Comparison: {} climbed, {} dropped, {} unchanged",
                shift.climbed.len(),
                shift.dropped.len(),
                shift.unchanged
            );

            if !shift.dropped.is_empty() {
                println!("\nDropped:");
                for m in &shift.dropped {
                    println!(
                        "  {} #{} -> #{} ({:+.1}%)",
                        m.user_id, m.baseline_rank, m.current_rank, m.percentage_delta
                    );
                }
            }

            if !shift.climbed.is_empty() {
                println!("\nClimbed:");
                for m in &shift.climbed {
                    println!(
                        "  {} #{} -> #{} ({:+.1}%)",
                        m.user_id, m.baseline_rank, m.current_rank, m.percentage_delta
                    );
                }
            }

            if shift.joined > 0 {
                println!("\n{} new student(s)", shift.joined);
            }
            if shift.left > 0 {
                println!("{} student(s) no longer ranked", shift.left);
            }
        }
    }

    if fail_on_drop && shift.has_drops() {
        std::process::exit(1);
    }

    Ok(())
}
