//! The `matriq show` command: re-render a saved report.

use std::path::PathBuf;

use anyhow::Result;

use matriq_core::report::TestReport;
use matriq_report::html::generate_html;
use matriq_report::markdown::to_markdown;

use crate::render;

pub fn execute(report_path: PathBuf, format: String) -> Result<()> {
    let report = TestReport::load_json(&report_path)?;

    match format.as_str() {
        "text" => {
            println!("{}", render::summary(&report));
            println!("{}", render::results_table(&report));
            if !report.strengths.is_empty() {
                println!("Strengths: {}", report.strengths.join(", "));
            }
            if !report.weaknesses.is_empty() {
                println!("Areas for improvement: {}", report.weaknesses.join(", "));
            }
        }
        "markdown" => print!("{}", to_markdown(&report)),
        "html" => print!("{}", generate_html(&report)),
        other => anyhow::bail!("unknown format: {other} (expected text, markdown, or html)"),
    }

    Ok(())
}
