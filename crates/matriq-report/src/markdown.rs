//! Shareable markdown summary of a test report.

use matriq_core::report::TestReport;

/// Format the report as a short markdown summary.
pub fn to_markdown(report: &TestReport) -> String {
    let mut md = String::new();

    md.push_str("# matriq results\n\n");
    md.push_str(&format!(
        "**Score: {}** — {}th percentile ({} of {} correct in {}s)\n\n",
        report.score,
        report.percentile,
        report.correct_count,
        report.question_count,
        report.total_elapsed_secs
    ));

    md.push_str("## Cognitive profile\n\n");
    md.push_str("| Category | Score |\n");
    md.push_str("|----------|-------|\n");
    for category in &report.profile {
        md.push_str(&format!(
            "| {} | {}/{} |\n",
            category.name, category.score, category.full_mark
        ));
    }
    md.push('\n');

    if !report.strengths.is_empty() {
        md.push_str("**Strengths:** ");
        md.push_str(&report.strengths.join(", "));
        md.push('\n');
    }
    if !report.weaknesses.is_empty() {
        md.push_str("**Areas for improvement:** ");
        md.push_str(&report.weaknesses.join(", "));
        md.push('\n');
    }

    md
}
