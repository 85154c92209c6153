//! The test session state machine.
//!
//! A session fetches all of its puzzles up front (concurrently, each fetch
//! individually falling back on failure), then advances through them one
//! answer or timeout at a time until scoring produces a [`TestReport`].
//!
//! The `Loading` phase of the lifecycle is the un-resolved
//! [`TestSession::start`] future itself: a session value only exists once
//! every puzzle has resolved and the run is `InProgress`.

use std::sync::Arc;

use futures::future;
use tokio::time::Instant;

use crate::clock::SessionClock;
use crate::error::SessionError;
use crate::puzzle::{difficulty_for, Answer, Puzzle};
use crate::report::TestReport;
use crate::scoring::{score_session, AuxiliaryMetrics, IllustrativeMetrics};
use crate::traits::PuzzleProvider;

/// Construction parameters for a session. Passed explicitly so tests can
/// run with small counts and short budgets.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Number of questions in the run.
    pub question_count: usize,
    /// Per-question time budget in seconds.
    pub time_per_question_secs: u32,
    /// Puzzle substituted for any failed or invalid fetch.
    pub fallback: Puzzle,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            question_count: 10,
            time_per_question_secs: 30,
            fallback: Puzzle::fallback(),
        }
    }
}

/// Lifecycle phase of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Questions remain; answers and timeouts are accepted.
    InProgress,
    /// All questions consumed; the report is available.
    Complete,
}

/// Outcome of an answer or timeout.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// Moved to the next question; the caller must reset its clock.
    Advanced { next_index: usize },
    /// That was the last question; the session is complete.
    Finished(TestReport),
    /// A timeout for an already-passed question; ignored.
    Stale,
}

/// One run of N timed puzzles.
pub struct TestSession {
    puzzles: Vec<Puzzle>,
    answers: Vec<Answer>,
    current_index: usize,
    state: SessionState,
    started_at: Instant,
    time_per_question_secs: u32,
    aux: Arc<dyn AuxiliaryMetrics>,
    report: Option<TestReport>,
}

impl std::fmt::Debug for TestSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestSession")
            .field("puzzles", &self.puzzles)
            .field("answers", &self.answers)
            .field("current_index", &self.current_index)
            .field("state", &self.state)
            .field("started_at", &self.started_at)
            .field("time_per_question_secs", &self.time_per_question_secs)
            .field("report", &self.report)
            .finish_non_exhaustive()
    }
}

impl TestSession {
    /// Fetch all puzzles and start the run.
    ///
    /// All fetches are issued concurrently and joined in question order.
    /// An individual failure or invalid puzzle is replaced by the configured
    /// fallback, so provider trouble degrades the content but never aborts
    /// the session. The start instant is recorded only once every fetch has
    /// resolved.
    pub async fn start(
        provider: Arc<dyn PuzzleProvider>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        Self::start_with_metrics(provider, config, Arc::new(IllustrativeMetrics)).await
    }

    /// [`TestSession::start`] with an explicit auxiliary-metrics source.
    pub async fn start_with_metrics(
        provider: Arc<dyn PuzzleProvider>,
        config: SessionConfig,
        aux: Arc<dyn AuxiliaryMetrics>,
    ) -> Result<Self, SessionError> {
        if config.question_count == 0 {
            return Err(SessionError::InvalidConfig(
                "question count must be at least 1".into(),
            ));
        }
        if config.time_per_question_secs == 0 {
            return Err(SessionError::InvalidConfig(
                "per-question time budget must be at least 1 second".into(),
            ));
        }

        let fetches = (0..config.question_count).map(|position| {
            let provider = Arc::clone(&provider);
            async move { provider.fetch(difficulty_for(position)).await }
        });
        let outcomes = future::join_all(fetches).await;

        let mut puzzles = Vec::with_capacity(config.question_count);
        for (position, outcome) in outcomes.into_iter().enumerate() {
            let puzzle = match outcome {
                Ok(puzzle) => match puzzle.validate() {
                    Ok(()) => puzzle,
                    Err(reason) => {
                        tracing::warn!(position, %reason, "invalid puzzle from provider, substituting fallback");
                        usable_fallback(&config.fallback)?
                    }
                },
                Err(error) => {
                    tracing::warn!(position, %error, "puzzle fetch failed, substituting fallback");
                    usable_fallback(&config.fallback)?
                }
            };
            puzzles.push(puzzle);
        }

        let answers = vec![None; puzzles.len()];
        Ok(Self {
            puzzles,
            answers,
            current_index: 0,
            state: SessionState::InProgress,
            started_at: Instant::now(),
            time_per_question_secs: config.time_per_question_secs,
            aux,
            report: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 0-based index of the active question.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn question_count(&self) -> usize {
        self.puzzles.len()
    }

    /// The active puzzle, or `None` once the session is complete.
    pub fn current_puzzle(&self) -> Option<&Puzzle> {
        match self.state {
            SessionState::InProgress => self.puzzles.get(self.current_index),
            SessionState::Complete => None,
        }
    }

    /// A fresh countdown clock armed with this session's question budget.
    pub fn new_clock(&self) -> SessionClock {
        SessionClock::new(self.time_per_question_secs)
    }

    /// The report, once the session has completed.
    pub fn report(&self) -> Option<&TestReport> {
        self.report.as_ref()
    }

    /// Record an answer for the active question and advance.
    ///
    /// An out-of-range index is rejected with `InvalidInput` and leaves the
    /// session untouched; the caller should re-prompt.
    pub fn submit_answer(&mut self, option_index: usize) -> Result<Progress, SessionError> {
        self.ensure_in_progress("submit_answer")?;
        let options = self.puzzles[self.current_index].options.len();
        if option_index >= options {
            return Err(SessionError::InvalidInput {
                index: option_index,
                options,
            });
        }
        self.answers[self.current_index] = Some(option_index);
        Ok(self.advance())
    }

    /// Record a timeout for `question_index` and advance.
    ///
    /// A timeout racing a just-submitted answer carries the index of the
    /// question it was armed for; if the session has already moved past it
    /// the call is a [`Progress::Stale`] no-op. At most one advance happens
    /// per question, whichever trigger lands first.
    pub fn on_timeout(&mut self, question_index: usize) -> Result<Progress, SessionError> {
        self.ensure_in_progress("on_timeout")?;
        if question_index != self.current_index {
            return Ok(Progress::Stale);
        }
        self.answers[self.current_index] = None;
        Ok(self.advance())
    }

    fn ensure_in_progress(&self, operation: &'static str) -> Result<(), SessionError> {
        match self.state {
            SessionState::InProgress => Ok(()),
            SessionState::Complete => Err(SessionError::InvalidState {
                operation,
                state: "complete",
            }),
        }
    }

    fn advance(&mut self) -> Progress {
        if self.current_index + 1 == self.puzzles.len() {
            self.state = SessionState::Complete;
            let elapsed = self.started_at.elapsed().as_secs();
            let report = score_session(&self.puzzles, &self.answers, elapsed, self.aux.as_ref());
            self.report = Some(report.clone());
            Progress::Finished(report)
        } else {
            self.current_index += 1;
            Progress::Advanced {
                next_index: self.current_index,
            }
        }
    }
}

fn usable_fallback(fallback: &Puzzle) -> Result<Puzzle, SessionError> {
    fallback
        .validate()
        .map_err(|_| SessionError::ProviderUnavailable)?;
    Ok(fallback.clone())
}
