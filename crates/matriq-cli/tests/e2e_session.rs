//! End-to-end session tests: provider → session → clock → scoring, wired
//! the way the `run` command wires them, minus the terminal.

use std::sync::Arc;

use matriq_core::clock::Tick;
use matriq_core::puzzle::Puzzle;
use matriq_core::scoring::FixedMetrics;
use matriq_core::session::{Progress, SessionConfig, SessionState, TestSession};
use matriq_providers::MockProvider;

fn config(questions: usize, budget: u32) -> SessionConfig {
    SessionConfig {
        question_count: questions,
        time_per_question_secs: budget,
        ..SessionConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn full_run_all_correct() {
    let provider = Arc::new(MockProvider::default());
    let mut session = TestSession::start_with_metrics(
        Arc::clone(&provider) as Arc<dyn matriq_core::traits::PuzzleProvider>,
        config(5, 30),
        Arc::new(FixedMetrics::default()),
    )
    .await
    .unwrap();

    assert_eq!(provider.call_count(), 5);
    assert_eq!(session.state(), SessionState::InProgress);

    // Answer at a leisurely 15s average: no time bonus either way.
    tokio::time::advance(std::time::Duration::from_secs(75)).await;

    let correct = Puzzle::sample().correct_option_index;
    let report = loop {
        match session.submit_answer(correct).unwrap() {
            Progress::Advanced { .. } => {}
            Progress::Finished(report) => break report,
            Progress::Stale => unreachable!("answers are never stale"),
        }
    };

    assert_eq!(report.score, 130);
    assert_eq!(report.percentile, 87);
    assert_eq!(report.correct_count, 5);
    assert_eq!(report.total_elapsed_secs, 75);
}

#[tokio::test]
async fn provider_outage_still_yields_a_complete_run() {
    let provider = Arc::new(MockProvider::failing());
    let mut session = TestSession::start_with_metrics(
        provider,
        config(3, 30),
        Arc::new(FixedMetrics::default()),
    )
    .await
    .unwrap();

    // Every slot degraded to the (valid) fallback puzzle.
    let fallback = Puzzle::fallback();
    assert_eq!(session.current_puzzle(), Some(&fallback));
    fallback.validate().unwrap();

    let report = loop {
        match session.submit_answer(fallback.correct_option_index).unwrap() {
            Progress::Advanced { .. } => {}
            Progress::Finished(report) => break report,
            Progress::Stale => unreachable!(),
        }
    };
    assert_eq!(report.correct_count, 3);
    assert_eq!(report.question_count, 3);
}

#[tokio::test(start_paused = true)]
async fn timeouts_drive_the_session_to_completion() {
    let provider = Arc::new(MockProvider::default());
    let mut session = TestSession::start_with_metrics(
        provider,
        config(2, 3),
        Arc::new(FixedMetrics::default()),
    )
    .await
    .unwrap();

    let mut clock = session.new_clock();
    let report = loop {
        let index = session.current_index();
        let progress = loop {
            match clock.tick().await {
                Tick::Remaining(_) => {}
                Tick::Expired => break session.on_timeout(index).unwrap(),
            }
        };
        match progress {
            Progress::Advanced { next_index } => {
                assert_eq!(next_index, index + 1);
                clock.reset();
            }
            Progress::Finished(report) => break report,
            Progress::Stale => unreachable!("index is re-read every question"),
        }
    };

    assert_eq!(report.correct_count, 0);
    assert_eq!(report.question_count, 2);
    // Two questions of 3s each, every second ticked through.
    assert_eq!(report.total_elapsed_secs, 6);
}
