//! matriq-providers — puzzle generation backends.
//!
//! Implements the `PuzzleProvider` trait for the Gemini generative API and
//! provides a scriptable mock for tests and offline runs.

pub mod config;
pub mod gemini;
pub mod mock;

pub use config::{create_provider, load_config, load_config_from, ProviderConfig, QuizConfig};
pub use gemini::GeminiProvider;
pub use matriq_core::error::ProviderError;
pub use mock::MockProvider;
