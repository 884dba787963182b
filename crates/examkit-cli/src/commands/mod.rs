pub mod analyze;
pub mod compare;
pub mod init;
pub mod paper;
pub mod rank;
pub mod report;
pub mod shuffle_options;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use examkit_core::config::ExamkitConfig;
use examkit_core::dataset::{load_dataset, ExamSlice};

/// Load the dataset and cut out one exam's rows.
pub(crate) fn load_exam_slice(dataset_path: &Path, exam_id: &str) -> Result<ExamSlice> {
    let dataset = load_dataset(dataset_path)?;
    dataset
        .slice(exam_id)
        .with_context(|| format!("exam '{exam_id}' not found in {}", dataset_path.display()))
}

/// The requested output format, falling back to the configured default.
pub(crate) fn resolve_format(format: Option<String>, config: &ExamkitConfig) -> String {
    format.unwrap_or_else(|| config.default_format.clone())
}
