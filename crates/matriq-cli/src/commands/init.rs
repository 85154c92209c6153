//! The `matriq init` command: create a starter config.

use std::path::Path;

use anyhow::Result;

const STARTER_CONFIG: &str = r#"# matriq configuration

question_count = 10
time_per_question_secs = 30
output_dir = "./matriq-results"

[provider]
type = "gemini"
api_key = "${MATRIQ_GEMINI_KEY}"
# base_url = "https://generativelanguage.googleapis.com"
# model = "gemini-2.5-flash"
"#;

pub fn execute() -> Result<()> {
    let path = Path::new("matriq.toml");
    if path.exists() {
        println!("matriq.toml already exists, skipping");
        return Ok(());
    }

    std::fs::write(path, STARTER_CONFIG)?;
    println!("Created matriq.toml");
    println!("Set MATRIQ_GEMINI_KEY to enable generated puzzles, or run with --offline.");
    Ok(())
}
