//! The `examkit init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("examkit.toml").exists() {
        println!("examkit.toml already exists, skipping.");
    } else {
        std::fs::write("examkit.toml", SAMPLE_CONFIG)?;
        println!("Created examkit.toml");
    }

    std::fs::create_dir_all("datasets")?;
    let example_path = std::path::Path::new("datasets/example.toml");
    if example_path.exists() {
        println!("datasets/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_DATASET)?;
        println!("Created datasets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: examkit validate --dataset datasets/example.toml");
    println!("  2. Run: examkit analyze --dataset datasets/example.toml --exam example");
    println!("  3. Run: examkit rank --dataset datasets/example.toml --exam example");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# examkit configuration

# Latest results averaged into a student's recent performance
recent_window = 3

# Where `examkit report` writes its files
output_dir = "./examkit-results"

# Console output format: text or json
default_format = "text"

# Uncomment to cap printed leaderboards
# leaderboard_limit = 20
"#;

const EXAMPLE_DATASET: &str = r#"[[exams]]
id = "example"
title = "Example Exam"
subject_id = "general"

[[questions]]
exam_id = "example"
id = "capital"
difficulty = "EASY"
text = "What is the capital of France?"
options = [
    { text = "Paris", isCorrect = true },
    { text = "Lyon", isCorrect = false },
    { text = "Marseille", isCorrect = false },
]

[[questions]]
exam_id = "example"
id = "prime"
difficulty = "MEDIUM"
text = "Which number is prime?"
options = [
    { text = "21", isCorrect = false },
    { text = "23", isCorrect = true },
    { text = "25", isCorrect = false },
    { text = "27", isCorrect = false },
]

[[results]]
exam_id = "example"
user_id = "student-1"
score = 2
total_marks = 2
start_time = "2024-01-15T10:00:00Z"
end_time = "2024-01-15T10:05:00Z"
is_completed = true

[[results]]
exam_id = "example"
user_id = "student-2"
score = 1
total_marks = 2
start_time = "2024-01-15T10:00:00Z"
end_time = "2024-01-15T10:08:00Z"
is_completed = true

[[answers]]
exam_id = "example"
question_id = "capital"
is_correct = true

[[answers]]
exam_id = "example"
question_id = "prime"
is_correct = false
"#;
