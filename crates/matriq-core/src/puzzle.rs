//! Core puzzle data model.
//!
//! A puzzle is a 3x3 pattern-completion grid with one missing cell and six
//! candidate answers, exactly one of which is correct. The serde shape of
//! [`Puzzle`] doubles as the provider wire schema.

use serde::{Deserialize, Serialize};

/// Number of cells in the pattern grid.
pub const GRID_CELLS: usize = 9;
/// Number of candidate answers per puzzle.
pub const OPTION_COUNT: usize = 6;
/// Sentinel marking the missing grid cell.
pub const MISSING_CELL: &str = "?";

/// A single matrix-reasoning item.
///
/// Immutable once produced; providers must return only validated puzzles
/// (see [`Puzzle::validate`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    /// Explanation of the pattern logic, shown after the session.
    #[serde(rename = "reasoning")]
    pub explanation: String,
    /// The 9 grid cells in row-major order; one cell is [`MISSING_CELL`].
    pub grid: Vec<String>,
    /// The 6 candidate answers.
    pub options: Vec<String>,
    /// 0-based index of the correct answer within `options`.
    pub correct_option_index: usize,
}

impl Puzzle {
    /// Check the structural invariants: grid length 9 with exactly one
    /// missing-cell sentinel, 6 options, and an in-range answer index.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid.len() != GRID_CELLS {
            return Err(format!(
                "grid has {} cells, expected {GRID_CELLS}",
                self.grid.len()
            ));
        }
        let missing = self.grid.iter().filter(|c| c.as_str() == MISSING_CELL).count();
        if missing != 1 {
            return Err(format!("grid has {missing} missing cells, expected 1"));
        }
        if self.options.len() != OPTION_COUNT {
            return Err(format!(
                "{} options, expected {OPTION_COUNT}",
                self.options.len()
            ));
        }
        if self.correct_option_index >= self.options.len() {
            return Err(format!(
                "correct option index {} out of range",
                self.correct_option_index
            ));
        }
        Ok(())
    }

    /// The fixed puzzle substituted when a provider fetch fails.
    pub fn fallback() -> Self {
        Self {
            explanation: "A filled circle is added each step, moving clockwise \
                          into the next quadrant."
                .to_string(),
            grid: [
                "\u{26AB}", "\u{26AA}", "\u{26AA}", "\u{26AB}", "\u{26AB}", "\u{26AA}",
                "\u{26AB}", "\u{26AB}", MISSING_CELL,
            ]
            .map(String::from)
            .to_vec(),
            options: [
                "\u{26AB}",
                "\u{26AA}",
                "\u{1F535}",
                "\u{1F534}",
                "\u{26AB}\u{26AB}\u{26AB}\u{26AB}",
                "\u{26AA}\u{26AA}\u{26AA}\u{26AA}",
            ]
            .map(String::from)
            .to_vec(),
            correct_option_index: 4,
        }
    }

    /// A fixed sample puzzle used by offline mode and previews.
    pub fn sample() -> Self {
        Self {
            explanation: "The arrow rotates 90 degrees clockwise at each step."
                .to_string(),
            grid: [
                "\u{2191}", "\u{2192}", "\u{2193}", "\u{2190}", "\u{2191}", "\u{2192}",
                "\u{2193}", "\u{2190}", MISSING_CELL,
            ]
            .map(String::from)
            .to_vec(),
            options: ["\u{2191}", "\u{2192}", "\u{2193}", "\u{2190}", "\u{2196}", "\u{2198}"]
                .map(String::from)
                .to_vec(),
            correct_option_index: 0,
        }
    }
}

/// The learner's response to one puzzle: the chosen option index, or `None`
/// when the question timed out unanswered.
pub type Answer = Option<usize>;

/// One row of the cognitive profile in a finished report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub name: String,
    pub score: u32,
    pub full_mark: u32,
}

/// Difficulty knob for the puzzle at a given session position.
///
/// Strictly non-decreasing: starts at 3 and climbs by one every second
/// question, capped at the provider's 10-point scale.
pub fn difficulty_for(index: usize) -> u8 {
    (3 + index / 2).min(10) as u8
}
