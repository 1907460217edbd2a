use crossterm::style::{Color, Stylize};
use std::io::{self, Write};

use crate::search::{SearchOutcome, SearchReport, Solution};

const SEPARATOR: &str = "------------------";

/// Writes search results for a terminal, optionally colored.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn print_report<W: Write>(&self, out: &mut W, report: &SearchReport) -> io::Result<()> {
        match &report.outcome {
            SearchOutcome::Solved(solution) => self.print_solution(out, solution),
            SearchOutcome::NoSolution => {
                writeln!(out, "{}", self.paint("Solution not found!", Color::Red))
            }
            SearchOutcome::Cancelled => {
                writeln!(out, "{}", self.paint("Search cancelled!", Color::Red))
            }
            SearchOutcome::LimitReached => {
                let msg = format!(
                    "Solution not found within {} expansions!",
                    report.stats.expanded
                );
                writeln!(out, "{}", self.paint(&msg, Color::Red))
            }
        }
    }

    pub fn print_solution<W: Write>(&self, out: &mut W, solution: &Solution) -> io::Result<()> {
        let header = format!("Solution found in {} moves!", solution.len());
        writeln!(out, "{}", self.paint(&header, Color::Green))?;
        writeln!(out, "{}", self.paint("Initial state:", Color::Green))?;

        for step in &solution.steps {
            for row in step.board.rows() {
                let line: Vec<String> = row.iter().map(|t| t.to_string()).collect();
                writeln!(out, "{}", self.paint(&line.join(" "), Color::Cyan))?;
            }
            let label = step.mv.map(|mv| mv.label()).unwrap_or("");
            writeln!(out, "{}", self.paint(&format!("Move: {label}"), Color::Green))?;
            writeln!(out, "{}", self.paint(SEPARATOR, Color::Yellow))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Move};
    use crate::search::{solve, SearchStats};

    fn render(color: bool, report: &SearchReport) -> String {
        let mut buf = Vec::new();
        Renderer::new(color).print_report(&mut buf, report).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn plain_solution_lists_every_step() {
        let report = solve(Board::GOAL.apply_move(Move::Left).unwrap());
        let text = render(false, &report);
        let expected = concat!(
            "Solution found in 1 moves!\n",
            "Initial state:\n",
            "1 2 3\n4 5 6\n7 0 8\n",
            "Move: \n",
            "------------------\n",
            "1 2 3\n4 5 6\n7 8 0\n",
            "Move: right\n",
            "------------------\n",
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn colored_output_carries_escape_codes() {
        let text = render(true, &solve(Board::GOAL));
        assert!(text.contains('\u{1b}'));
        assert!(text.contains("Solution found in 0 moves!"));
    }

    #[test]
    fn failures_are_reported() {
        let failed = SearchReport {
            outcome: SearchOutcome::NoSolution,
            stats: SearchStats::default(),
        };
        assert_eq!(render(false, &failed), "Solution not found!\n");

        let limited = SearchReport {
            outcome: SearchOutcome::LimitReached,
            stats: SearchStats {
                expanded: 42,
                ..SearchStats::default()
            },
        };
        assert_eq!(
            render(false, &limited),
            "Solution not found within 42 expansions!\n"
        );
    }
}
