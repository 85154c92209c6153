//! The `matriq preview` command: fetch and print one puzzle.

use std::path::PathBuf;

use anyhow::Result;

use matriq_core::puzzle::Puzzle;
use matriq_providers::{create_provider, load_config_from, ProviderConfig};

use crate::render;

pub async fn execute(difficulty: u8, config_path: Option<PathBuf>, offline: bool) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if offline {
        config.provider = ProviderConfig::Offline;
    }
    let provider = create_provider(&config.provider)?;

    // Same degradation the session applies: a failed fetch shows the
    // fallback puzzle instead of an error.
    let puzzle = match provider.fetch(difficulty).await {
        Ok(puzzle) => puzzle,
        Err(error) => {
            tracing::warn!(%error, "puzzle fetch failed, showing fallback");
            Puzzle::fallback()
        }
    };

    println!("Difficulty {difficulty}/10 from provider '{}':", provider.name());
    println!("{}", render::puzzle_grid(&puzzle));
    println!("Options: {}", render::options_line(&puzzle));
    println!(
        "Answer: option {} — {}",
        puzzle.correct_option_index + 1,
        puzzle.explanation
    );

    Ok(())
}
