//! Provider trait definition.
//!
//! Implemented by the `matriq-providers` crate for the Gemini backend and
//! the scriptable mock.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::puzzle::Puzzle;

/// A source of generated puzzles.
///
/// Implementations surface typed errors; the session substitutes the
/// configured fallback puzzle for any failed or invalid fetch, so a
/// provider error never aborts a test run.
#[async_trait]
pub trait PuzzleProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Generate one puzzle at the given difficulty (1-10 scale).
    async fn fetch(&self, difficulty: u8) -> Result<Puzzle, ProviderError>;
}
