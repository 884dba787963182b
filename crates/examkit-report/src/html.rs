//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use examkit_core::analytics::ScoreBucket;
use examkit_core::report::ExamReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn format_duration(secs: Option<i64>) -> String {
    match secs {
        Some(s) => format!("{}m {:02}s", s / 60, s % 60),
        None => "-".to_string(),
    }
}

/// Generate an HTML report from an exam report.
pub fn generate_html(report: &ExamReport) -> String {
    let summary = &report.summary;
    let title = if report.exam.title.is_empty() {
        &report.exam.id
    } else {
        &report.exam.title
    };
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>examkit report: {}</title>\n",
        html_escape(title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(title)));
    html.push_str(&format!(
        "<p class=\"meta\">Exam: <strong>{}</strong> | {} questions | {} participants | {}</p>\n",
        html_escape(&report.exam.id),
        report.exam.question_count,
        summary.participants,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Participants</th><th>Completed</th><th>Completion</th><th>Attempt completion</th><th>Average score</th><th>Average %</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}</td><td>{}</td><td>{:.1}%</td><td>{:.1}%</td><td>{:.2}</td><td>{:.1}%</td></tr></tbody>\n",
        summary.participants,
        summary.completed,
        summary.completion_rate * 100.0,
        summary.attempt_completion_rate * 100.0,
        summary.average_score,
        summary.average_percentage,
    ));
    html.push_str("</table>\n");

    html.push_str("<h3>Score distribution</h3>\n");
    html.push_str(&generate_histogram(&summary.score_distribution));

    if !summary.difficulty_breakdown.is_empty() {
        html.push_str("<h3>Questions by difficulty</h3>\n");
        html.push_str("<table class=\"difficulty\">\n<thead><tr><th>Difficulty</th><th>Questions</th></tr></thead>\n<tbody>\n");
        for (difficulty, count) in &summary.difficulty_breakdown {
            html.push_str(&format!("<tr><td>{difficulty}</td><td>{count}</td></tr>\n"));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    // Per-question accuracy
    if !summary.question_accuracy.is_empty() {
        html.push_str("<section class=\"questions\">\n");
        html.push_str("<h2>Question accuracy</h2>\n");
        html.push_str("<table>\n<thead><tr><th>Question</th><th>Answers</th><th>Correct</th><th>Accuracy</th></tr></thead>\n<tbody>\n");
        for q in &summary.question_accuracy {
            let class = if q.accuracy >= 0.8 {
                "pass"
            } else if q.accuracy < 0.4 {
                "fail"
            } else {
                ""
            };
            html.push_str(&format!(
                "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td></tr>\n",
                class,
                html_escape(&q.question_id),
                q.attempts,
                q.correct,
                q.accuracy * 100.0
            ));
        }
        html.push_str("</tbody></table>\n</section>\n");
    }

    // Leaderboard
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Leaderboard</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"leaderboard\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Rank</th><th onclick=\"sortTable(1)\">Student</th><th onclick=\"sortTable(2)\">Roll</th><th onclick=\"sortTable(3)\">Score</th><th onclick=\"sortTable(4)\">Percentage</th><th onclick=\"sortTable(5)\">Time</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for e in &report.leaderboard {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}/{}</td><td>{:.1}%</td><td>{}</td></tr>\n",
            e.rank,
            html_escape(&e.user_id),
            html_escape(e.roll_number.as_deref().unwrap_or("-")),
            e.score,
            e.total_marks,
            e.percentage,
            format_duration(e.completion_time_secs),
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &ExamReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn generate_histogram(buckets: &[ScoreBucket]) -> String {
    let bar_width = 40;
    let max_height = 160;
    let padding = 8;
    let label_height = 40;

    let max_count = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    let total_width = buckets.len() * (bar_width + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        total_width,
        max_height + label_height
    );

    for (i, bucket) in buckets.iter().enumerate() {
        let x = i * (bar_width + padding) + padding;
        let height = bucket.count * max_height / max_count;
        let y = max_height - height;

        let color = if i >= 8 {
            "#22c55e"
        } else if i >= 5 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"3\"/>\n",
            x, y, bar_width, height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" text-anchor=\"middle\">{}</text>\n",
            x + bar_width / 2,
            y.saturating_sub(4).max(12),
            bucket.count
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"currentColor\" text-anchor=\"middle\">{}</text>\n",
            x + bar_width / 2,
            max_height + 18,
            html_escape(&bucket.range)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('leaderboard');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, {numeric: true}) : vb.localeCompare(va, undefined, {numeric: true});
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
