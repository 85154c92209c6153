//! HTML results page generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use matriq_core::puzzle::CategoryScore;
use matriq_core::report::TestReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML results page from a test report.
pub fn generate_html(report: &TestReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>matriq results</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Your Results</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} questions | {} correct | {}</p>\n",
        report.question_count,
        report.correct_count,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Score badge and percentile sentence
    html.push_str("<section class=\"headline\">\n");
    html.push_str(&format!(
        "<div class=\"score-badge\"><span class=\"label\">Your Score</span><span class=\"score\">{}</span></div>\n",
        report.score
    ));
    html.push_str(&format!(
        "<p class=\"percentile\">You are in the <strong>{}</strong>th percentile. \
         This score places you above {}% of the general population on this test.</p>\n",
        report.percentile, report.percentile
    ));
    html.push_str(&format!(
        "<p class=\"elapsed\">Total time: {} seconds</p>\n",
        report.total_elapsed_secs
    ));
    html.push_str("</section>\n");

    // Cognitive profile
    html.push_str("<section class=\"profile\">\n");
    html.push_str("<h2>Cognitive Profile</h2>\n");
    html.push_str(&generate_profile_chart(&report.profile));
    html.push_str("</section>\n");

    // Strengths and weaknesses
    html.push_str("<section class=\"analysis\">\n");
    html.push_str("<h2>Analysis</h2>\n");
    html.push_str("<h3 class=\"strengths\">Strengths</h3>\n<ul>\n");
    for s in &report.strengths {
        html.push_str(&format!("<li>{}</li>\n", html_escape(s)));
    }
    html.push_str("</ul>\n<h3 class=\"weaknesses\">Areas for Improvement</h3>\n<ul>\n");
    for w in &report.weaknesses {
        html.push_str(&format!("<li>{}</li>\n", html_escape(w)));
    }
    html.push_str("</ul>\n</section>\n");

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

    html.push_str("</body>\n</html>\n");
    html
}

/// Horizontal SVG bar chart of the cognitive profile.
fn generate_profile_chart(profile: &[CategoryScore]) -> String {
    let bar_height = 28;
    let gap = 10;
    let label_width = 160;
    let chart_width = 360;
    let height = profile.len() * (bar_height + gap);

    let mut svg = format!(
        "<svg viewBox=\"0 0 {} {}\" role=\"img\" aria-label=\"cognitive profile\">\n",
        label_width + chart_width + 60,
        height
    );

    for (i, category) in profile.iter().enumerate() {
        let y = i * (bar_height + gap);
        let fraction = if category.full_mark == 0 {
            0.0
        } else {
            category.score as f64 / category.full_mark as f64
        };
        let bar = (fraction * chart_width as f64).round() as usize;

        svg.push_str(&format!(
            "<text x=\"0\" y=\"{}\" class=\"bar-label\">{}</text>\n",
            y + bar_height / 2 + 5,
            html_escape(&category.name)
        ));
        svg.push_str(&format!(
            "<rect x=\"{label_width}\" y=\"{y}\" width=\"{chart_width}\" height=\"{bar_height}\" class=\"bar-track\"/>\n"
        ));
        svg.push_str(&format!(
            "<rect x=\"{label_width}\" y=\"{y}\" width=\"{bar}\" height=\"{bar_height}\" class=\"bar-fill\"/>\n"
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" class=\"bar-value\">{}/{}</text>\n",
            label_width + chart_width + 8,
            y + bar_height / 2 + 5,
            category.score,
            category.full_mark
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Write the HTML results page to a file.
pub fn write_html_report(report: &TestReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif;
       background: #0f172a; color: #e2e8f0; max-width: 720px; margin: 0 auto;
       padding: 2rem 1rem; }
header h1 { margin-bottom: 0.25rem; }
.meta { color: #94a3b8; font-size: 0.9rem; }
.headline { display: flex; flex-direction: column; align-items: center;
            gap: 0.5rem; margin: 2rem 0; }
.score-badge { display: flex; flex-direction: column; align-items: center;
               justify-content: center; width: 11rem; height: 11rem;
               border-radius: 50%; border: 4px solid #2563eb;
               background: #1e293b; }
.score-badge .label { color: #94a3b8; font-size: 0.85rem; }
.score-badge .score { font-size: 3.5rem; font-weight: 700; }
.percentile { text-align: center; }
.elapsed { color: #94a3b8; font-size: 0.9rem; }
section { background: #1e293b; border-radius: 0.75rem; padding: 1rem 1.5rem;
          margin-bottom: 1.5rem; }
.strengths { color: #4ade80; }
.weaknesses { color: #facc15; }
.bar-label, .bar-value { fill: #cbd5e1; font-size: 13px; }
.bar-track { fill: #334155; rx: 4; }
.bar-fill { fill: #2563eb; rx: 4; }
.raw-data pre { overflow-x: auto; background: #0f172a; padding: 0.75rem;
                border-radius: 0.5rem; }
"#;
