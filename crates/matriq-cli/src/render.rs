//! Terminal rendering helpers shared by the commands.

use comfy_table::{Cell, Table};

use matriq_core::puzzle::Puzzle;
use matriq_core::report::TestReport;

/// The 3x3 grid of a puzzle as a table.
pub fn puzzle_grid(puzzle: &Puzzle) -> Table {
    let mut table = Table::new();
    for row in puzzle.grid.chunks(3) {
        table.add_row(row.iter().map(Cell::new).collect::<Vec<_>>());
    }
    table
}

/// Numbered answer options on a single line.
pub fn options_line(puzzle: &Puzzle) -> String {
    puzzle
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| format!("{}) {}", i + 1, option))
        .collect::<Vec<_>>()
        .join("   ")
}

/// Profile table for the results screen.
pub fn results_table(report: &TestReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Score"]);
    for category in &report.profile {
        table.add_row(vec![
            Cell::new(&category.name),
            Cell::new(format!("{}/{}", category.score, category.full_mark)),
        ]);
    }
    table
}

/// One-paragraph results headline.
pub fn summary(report: &TestReport) -> String {
    format!(
        "Score: {}  |  {}th percentile  |  {}/{} correct in {}s",
        report.score,
        report.percentile,
        report.correct_count,
        report.question_count,
        report.total_elapsed_secs
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use matriq_core::scoring::{score_session, FixedMetrics};

    #[test]
    fn grid_renders_three_rows() {
        let table = puzzle_grid(&Puzzle::sample());
        assert_eq!(table.row_iter().count(), 3);
    }

    #[test]
    fn options_are_one_based() {
        let line = options_line(&Puzzle::sample());
        assert!(line.starts_with("1)"));
        assert!(line.contains("6)"));
    }

    #[test]
    fn summary_mentions_percentile() {
        let puzzles = vec![Puzzle::sample(); 5];
        let answers: Vec<_> = puzzles
            .iter()
            .map(|p| Some(p.correct_option_index))
            .collect();
        let report = score_session(&puzzles, &answers, 75, &FixedMetrics::default());
        assert!(summary(&report).contains("87th percentile"));
    }
}
