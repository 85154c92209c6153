//! Pure scoring of a finished session.
//!
//! The formula is fixed: reports must be reproducible from the same
//! (puzzles, answers, elapsed) triple. The four auxiliary profile rows and
//! the strength/weakness labels are *not* derived from performance; they
//! come from an injected [`AuxiliaryMetrics`] so tests can pin them down.

use crate::puzzle::{Answer, CategoryScore, Puzzle};
use crate::report::TestReport;

/// Name of the one performance-derived profile category.
pub const PATTERN_CATEGORY: &str = "Pattern Logic";

/// Names of the four auxiliary profile categories.
pub const AUX_CATEGORIES: [&str; 4] = [
    "Working Memory",
    "Processing Speed",
    "Deductive Logic",
    "Visual-Spatial",
];

/// Full mark for each auxiliary category.
pub const AUX_FULL_MARK: u32 = 10;

/// Source of the non-performance-derived report fields.
pub trait AuxiliaryMetrics: Send + Sync {
    /// Scores for the four auxiliary categories, in [`AUX_CATEGORIES`] order.
    fn category_scores(&self) -> [u32; 4];

    /// Qualitative strength labels.
    fn strengths(&self) -> Vec<String>;

    /// Qualitative weakness labels.
    fn weaknesses(&self) -> Vec<String>;
}

/// The default metrics: uniform filler scores and fixed labels, matching
/// the reference behavior. Illustrative only.
#[derive(Debug, Clone, Copy, Default)]
pub struct IllustrativeMetrics;

impl AuxiliaryMetrics for IllustrativeMetrics {
    fn category_scores(&self) -> [u32; 4] {
        let mut rng = rand::rng();
        std::array::from_fn(|_| rand::Rng::random_range(&mut rng, 1..=8))
    }

    fn strengths(&self) -> Vec<String> {
        vec!["Pattern Recognition".into(), "Logical Inference".into()]
    }

    fn weaknesses(&self) -> Vec<String> {
        vec!["Attention to Detail".into()]
    }
}

/// Deterministic metrics for tests and reproducible runs.
#[derive(Debug, Clone)]
pub struct FixedMetrics {
    pub category_score: u32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            category_score: 5,
            strengths: vec!["Pattern Recognition".into()],
            weaknesses: vec!["Attention to Detail".into()],
        }
    }
}

impl AuxiliaryMetrics for FixedMetrics {
    fn category_scores(&self) -> [u32; 4] {
        [self.category_score; 4]
    }

    fn strengths(&self) -> Vec<String> {
        self.strengths.clone()
    }

    fn weaknesses(&self) -> Vec<String> {
        self.weaknesses.clone()
    }
}

/// Score a completed session.
///
/// `puzzles` and `answers` must be the same non-zero length; the session
/// guarantees this by construction.
pub fn score_session(
    puzzles: &[Puzzle],
    answers: &[Answer],
    total_elapsed_secs: u64,
    aux: &dyn AuxiliaryMetrics,
) -> TestReport {
    assert_eq!(puzzles.len(), answers.len(), "one answer slot per puzzle");
    assert!(!puzzles.is_empty(), "cannot score an empty session");

    let total = puzzles.len();
    let correct_count = puzzles
        .iter()
        .zip(answers)
        .filter(|(p, a)| **a == Some(p.correct_option_index))
        .count();

    let accuracy = correct_count as f64 / total as f64 * 100.0;
    let base_score = 80.0 + (accuracy / 100.0) * 50.0;
    let avg_time = total_elapsed_secs as f64 / total as f64;
    let time_bonus = ((15.0 - avg_time) * 0.8).clamp(-10.0, 15.0);
    let score = (base_score + time_bonus).round() as i32;

    // Upper clamp only. Scores far below the midpoint produce a negative
    // percentile; the reference behavior has no lower clamp and we keep it.
    let percentile = (15.0 + (score as f64 - 85.0) / 50.0 * 80.0).round() as i32;
    let percentile = percentile.min(99);

    let mut profile = Vec::with_capacity(1 + AUX_CATEGORIES.len());
    profile.push(CategoryScore {
        name: PATTERN_CATEGORY.to_string(),
        score: correct_count as u32,
        full_mark: total as u32,
    });
    for (name, score) in AUX_CATEGORIES.iter().zip(aux.category_scores()) {
        profile.push(CategoryScore {
            name: (*name).to_string(),
            score,
            full_mark: AUX_FULL_MARK,
        });
    }

    TestReport::new(
        score,
        percentile,
        profile,
        aux.strengths(),
        aux.weaknesses(),
        total_elapsed_secs,
        total,
        correct_count,
    )
}
