//! Mock provider for testing and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use matriq_core::error::ProviderError;
use matriq_core::puzzle::Puzzle;
use matriq_core::traits::PuzzleProvider;

/// A scriptable puzzle provider that never leaves the process.
///
/// Returns configurable puzzles keyed by difficulty, or simulated failures.
pub struct MockProvider {
    /// Map of difficulty → puzzle.
    responses: HashMap<u8, Puzzle>,
    /// Default puzzle when no difficulty matches.
    default_response: Puzzle,
    /// When set, every fetch fails with a simulated network error.
    fail_all: bool,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last difficulty requested.
    last_difficulty: Mutex<Option<u8>>,
}

impl MockProvider {
    /// Create a mock with the given difficulty→puzzle mappings.
    pub fn new(responses: HashMap<u8, Puzzle>) -> Self {
        Self {
            responses,
            default_response: Puzzle::sample(),
            fail_all: false,
            call_count: AtomicU32::new(0),
            last_difficulty: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same puzzle.
    pub fn with_fixed_puzzle(puzzle: Puzzle) -> Self {
        Self {
            responses: HashMap::new(),
            default_response: puzzle,
            fail_all: false,
            call_count: AtomicU32::new(0),
            last_difficulty: Mutex::new(None),
        }
    }

    /// Create a mock whose every fetch fails.
    pub fn failing() -> Self {
        Self {
            responses: HashMap::new(),
            default_response: Puzzle::sample(),
            fail_all: true,
            call_count: AtomicU32::new(0),
            last_difficulty: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last difficulty requested.
    pub fn last_difficulty(&self) -> Option<u8> {
        *self.last_difficulty.lock().unwrap()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::with_fixed_puzzle(Puzzle::sample())
    }
}

#[async_trait]
impl PuzzleProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, difficulty: u8) -> Result<Puzzle, ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_difficulty.lock().unwrap() = Some(difficulty);

        if self.fail_all {
            return Err(ProviderError::NetworkError("simulated outage".into()));
        }

        Ok(self
            .responses
            .get(&difficulty)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone()))
    }
}
