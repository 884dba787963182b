//! The `examkit report` command.

use std::path::PathBuf;

use anyhow::Result;

use examkit_core::config::load_config_from;
use examkit_core::report::ExamReport;

use super::load_exam_slice;

pub fn execute(
    dataset_path: PathBuf,
    exam_id: String,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let slice = load_exam_slice(&dataset_path, &exam_id)?;
    let output = output.unwrap_or(config.output_dir);

    let report = ExamReport::build(&slice);
    tracing::info!(
        "built report {} for exam {} ({} ranked)",
        report.id,
        exam_id,
        report.leaderboard.len()
    );

    std::fs::create_dir_all(&output)?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html"]
    } else {
        format.split(',').map(str::trim).collect()
    };

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("report-{exam_id}-{timestamp}.json"));
                report.save_json(&path)?;
                println!("JSON report: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("report-{exam_id}-{timestamp}.html"));
                examkit_report::html::write_html_report(&report, &path)?;
                println!("HTML report: {}", path.display());
            }
            other => {
                eprintln!("Unknown format: {other}");
            }
        }
    }

    Ok(())
}
