//! examkit CLI, the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "examkit",
    version,
    about = "Deterministic exam papers, analytics and leaderboards"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize one exam: completion, averages, distribution, accuracy
    Analyze {
        /// Path to a dataset file (.toml/.json) or directory
        #[arg(long)]
        dataset: PathBuf,

        /// Exam to analyze
        #[arg(long)]
        exam: String,

        /// Output format: text, json
        #[arg(long)]
        format: Option<String>,
    },

    /// Print a leaderboard for an exam or a whole subject
    Rank {
        /// Path to a dataset file (.toml/.json) or directory
        #[arg(long)]
        dataset: PathBuf,

        /// Rank a single exam
        #[arg(long, conflicts_with = "subject", required_unless_present = "subject")]
        exam: Option<String>,

        /// Rank cumulatively across every exam of a subject
        #[arg(long)]
        subject: Option<String>,

        /// Restrict the board to these students (comma-separated)
        #[arg(long)]
        users: Option<String>,

        /// Maximum rows to print
        #[arg(long)]
        limit: Option<usize>,

        /// Output format: text, json
        #[arg(long)]
        format: Option<String>,
    },

    /// Show one student's personalized paper
    Paper {
        /// Path to a dataset file (.toml/.json) or directory
        #[arg(long)]
        dataset: PathBuf,

        /// Exam the paper belongs to
        #[arg(long)]
        exam: String,

        /// Student the paper is built for
        #[arg(long)]
        student: String,

        /// Output format: text, json
        #[arg(long)]
        format: Option<String>,
    },

    /// Shuffle a JSON array of options with a seed
    ShuffleOptions {
        /// JSON-encoded options array
        #[arg(long)]
        options: String,

        /// Explicit seed string
        #[arg(long, conflicts_with_all = ["exam", "student", "question"])]
        seed: Option<String>,

        /// Exam id (builds the seed together with --student and --question)
        #[arg(long, requires_all = ["student", "question"])]
        exam: Option<String>,

        /// Student id
        #[arg(long, requires = "exam")]
        student: Option<String>,

        /// Question id
        #[arg(long, requires = "exam")]
        question: Option<String>,
    },

    /// Write an exam report to the output directory
    Report {
        /// Path to a dataset file (.toml/.json) or directory
        #[arg(long)]
        dataset: PathBuf,

        /// Exam to report on
        #[arg(long)]
        exam: String,

        /// Output directory (defaults to the configured one)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, all
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Compare two exam reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if any student dropped in rank
        #[arg(long)]
        fail_on_drop: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate dataset files
    Validate {
        /// Path to a dataset file or directory
        #[arg(long)]
        dataset: PathBuf,
    },

    /// Create starter config and example dataset
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examkit=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Analyze {
            dataset,
            exam,
            format,
        } => commands::analyze::execute(dataset, exam, format, config),
        Commands::Rank {
            dataset,
            exam,
            subject,
            users,
            limit,
            format,
        } => commands::rank::execute(dataset, exam, subject, users, limit, format, config),
        Commands::Paper {
            dataset,
            exam,
            student,
            format,
        } => commands::paper::execute(dataset, exam, student, format, config),
        Commands::ShuffleOptions {
            options,
            seed,
            exam,
            student,
            question,
        } => commands::shuffle_options::execute(options, seed, exam, student, question),
        Commands::Report {
            dataset,
            exam,
            output,
            format,
        } => commands::report::execute(dataset, exam, output, format, config),
        Commands::Compare {
            baseline,
            current,
            fail_on_drop,
            format,
        } => commands::compare::execute(baseline, current, fail_on_drop, format),
        Commands::Validate { dataset } => commands::validate::execute(dataset),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
