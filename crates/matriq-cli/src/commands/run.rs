//! The `matriq run` command: the full Home → Calibration → Test → Results
//! screen flow in the terminal.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use matriq_core::clock::Tick;
use matriq_core::error::SessionError;
use matriq_core::report::TestReport;
use matriq_core::session::{Progress, TestSession};
use matriq_core::traits::PuzzleProvider;
use matriq_providers::{create_provider, load_config_from, ProviderConfig};
use matriq_report::html::write_html_report;
use matriq_report::markdown::to_markdown;

use crate::render;
use crate::screens::{Screen, CALIBRATION_STEPS};

pub async fn execute(
    config_path: Option<PathBuf>,
    questions: Option<usize>,
    time_per_question: Option<u32>,
    offline: bool,
    output: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if offline {
        config.provider = ProviderConfig::Offline;
    }
    if let Some(n) = questions {
        config.question_count = n;
    }
    if let Some(secs) = time_per_question {
        config.time_per_question_secs = secs;
    }
    if let Some(dir) = output {
        config.output_dir = dir;
    }

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html", "markdown"]
    } else {
        format.split(',').map(|f| f.trim()).collect()
    };
    for fmt in &formats {
        anyhow::ensure!(
            matches!(*fmt, "json" | "html" | "markdown"),
            "unknown format: {fmt}"
        );
    }

    let provider: Arc<dyn PuzzleProvider> = Arc::from(create_provider(&config.provider)?);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut screen = Screen::Home;

    // Home
    println!("matriq — matrix reasoning test");
    println!(
        "{} questions, {} seconds each. Answer with the option number.",
        config.question_count, config.time_per_question_secs
    );
    print!("Press Enter to begin... ");
    std::io::stdout().flush()?;
    lines
        .next_line()
        .await?
        .context("stdin closed before the test started")?;
    screen = screen.next();

    // Calibration
    debug_assert_eq!(screen, Screen::Calibration);
    println!("\nCalibrating difficulty to your cognitive level.");
    for step in CALIBRATION_STEPS {
        println!("  {step}");
        tokio::time::sleep(Duration::from_millis(400)).await;
    }
    screen = screen.next();

    // Test
    debug_assert_eq!(screen, Screen::Test);
    println!("\nGenerating questions... this can take a moment.");
    let mut session = TestSession::start(provider, config.session_config()).await?;
    let report = drive_session(&mut session, &mut lines).await?;
    screen = screen.next();

    // Results
    debug_assert_eq!(screen, Screen::Results);
    println!("\n=== Your Results ===");
    println!("{}", render::summary(&report));
    println!("{}", render::results_table(&report));
    if !report.strengths.is_empty() {
        println!("Strengths: {}", report.strengths.join(", "));
    }
    if !report.weaknesses.is_empty() {
        println!("Areas for improvement: {}", report.weaknesses.join(", "));
    }

    save_artifacts(&report, &config.output_dir, &formats)?;
    Ok(())
}

/// Run every question to completion, racing the countdown against stdin.
async fn drive_session(
    session: &mut TestSession,
    lines: &mut Lines<BufReader<Stdin>>,
) -> Result<TestReport> {
    let mut clock = session.new_clock();
    loop {
        let index = session.current_index();
        let puzzle = session
            .current_puzzle()
            .context("session has no active puzzle")?
            .clone();

        println!(
            "\nQuestion {} / {}  ({}s)",
            index + 1,
            session.question_count(),
            clock.remaining_secs()
        );
        println!("{}", render::puzzle_grid(&puzzle));
        println!("{}", render::options_line(&puzzle));
        print!("> ");
        std::io::stdout().flush()?;

        let progress = loop {
            tokio::select! {
                tick = clock.tick() => match tick {
                    Tick::Remaining(secs) => {
                        if secs <= 5 {
                            print!("\r{secs}s left > ");
                            std::io::stdout().flush()?;
                        }
                    }
                    Tick::Expired => {
                        println!("\nTime is up.");
                        break session.on_timeout(index)?;
                    }
                },
                line = lines.next_line() => {
                    let line = line?.context("stdin closed mid-session")?;
                    match parse_choice(&line, puzzle.options.len()) {
                        Some(choice) => match session.submit_answer(choice) {
                            Ok(progress) => break progress,
                            Err(SessionError::InvalidInput { options, .. }) => {
                                print!("Enter a number between 1 and {options} > ");
                                std::io::stdout().flush()?;
                            }
                            Err(e) => return Err(e.into()),
                        },
                        None => {
                            print!("Enter a number between 1 and {} > ", puzzle.options.len());
                            std::io::stdout().flush()?;
                        }
                    }
                }
            }
        };

        match progress {
            Progress::Advanced { .. } => clock.reset(),
            Progress::Finished(report) => return Ok(report),
            // Stale only happens for timeouts of already-passed questions,
            // and `index` is re-read each iteration.
            Progress::Stale => {}
        }
    }
}

/// Parse a 1-based option choice; `None` if not a number in range.
fn parse_choice(line: &str, option_count: usize) -> Option<usize> {
    let choice: usize = line.trim().parse().ok()?;
    if (1..=option_count).contains(&choice) {
        Some(choice - 1)
    } else {
        None
    }
}

fn save_artifacts(report: &TestReport, output_dir: &std::path::Path, formats: &[&str]) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    for fmt in formats {
        match *fmt {
            "json" => {
                let path = output_dir.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Report saved to: {}", path.display());
            }
            "html" => {
                let path = output_dir.join(format!("report-{timestamp}.html"));
                write_html_report(report, &path)?;
                eprintln!("HTML results: {}", path.display());
            }
            "markdown" => {
                let path = output_dir.join(format!("report-{timestamp}.md"));
                std::fs::write(&path, to_markdown(report))?;
                eprintln!("Markdown summary: {}", path.display());
            }
            _ => unreachable!("formats validated up front"),
        }
    }
    Ok(())
}
