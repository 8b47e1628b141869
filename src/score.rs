// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::session::QuizSession;
use crate::text::strip_markup;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    /// Rounded to the nearest integer, ties to even.
    pub percent: u32,
}

impl Score {
    pub fn new(correct: usize, total: usize) -> Self {
        let ratio = 100.0 * correct as f64 / total.max(1) as f64;
        Self {
            correct,
            total,
            percent: ratio.round_ties_even() as u32,
        }
    }
}

pub fn score(session: &QuizSession) -> Score {
    Score::new(session.correct_count(), session.len())
}

/// One line of the results table. Texts are plain, with markup stripped.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ResultRow {
    /// One-based position of the item.
    pub number: usize,
    pub prompt: String,
    /// Empty if the item was not answered.
    pub chosen: String,
    pub correct: String,
    pub is_correct: bool,
}

impl ResultRow {
    pub fn marker(&self) -> &'static str {
        if self.is_correct { "✔" } else { "✘" }
    }
}

/// The rows of the results table, one per item in session order. Both the
/// terminal table and the HTML export are built from these.
pub fn results_rows(session: &QuizSession) -> Vec<ResultRow> {
    session
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| ResultRow {
            number: index + 1,
            prompt: strip_markup(&item.prompt),
            chosen: strip_markup(session.user_answer(index).unwrap_or("")),
            correct: strip_markup(&item.correct_answer),
            is_correct: session.is_correct(index),
        })
        .collect()
}

/// Render the results as a plain-text table.
pub fn render_results_table(session: &QuizSession) -> String {
    let header = ["#", "Prompt", "Your Answer", "Correct Answer", ""];
    let rows: Vec<[String; 5]> = results_rows(session)
        .into_iter()
        .map(|row| {
            [
                row.number.to_string(),
                single_line(&row.prompt),
                single_line(&row.chosen),
                single_line(&row.correct),
                row.marker().to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join("-+-").trim_end());
    out.push('\n');
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn single_line(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join(" / ")
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width - cell.chars().count();
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}
