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

use std::fs::write;
use std::path::Path;

use chrono::DateTime;
use chrono::Local;
use maud::DOCTYPE;
use maud::Markup;
use maud::html;

use crate::error::Fallible;
use crate::score::results_rows;
use crate::score::score;
use crate::session::QuizSession;

const CORRECT_BACKGROUND: &str = "#cfc";
const INCORRECT_BACKGROUND: &str = "#fcc";

/// Font sizes, in pixels, for the exported table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ExportStyle {
    pub prompt_font_size: u32,
    pub answer_font_size: u32,
}

pub fn render_results_html(
    session: &QuizSession,
    style: ExportStyle,
    generated_at: DateTime<Local>,
) -> Markup {
    let score = score(session);
    let rows = results_rows(session);
    let prompt_style = format!("font-size:{}px;", style.prompt_font_size);
    let answer_style = format!("font-size:{}px;", style.answer_font_size);
    let body = html! {
        h2 { "Quiz Results" }
        p { "Score: " (score.correct) "/" (score.total) " (" (score.percent) "%)" }
        table border="1" cellpadding="4" {
            tr {
                th { "#" }
                th { "Prompt" }
                th { "Your Answer" }
                th { "Correct Answer" }
            }
            @for row in &rows {
                @let background = if row.is_correct { CORRECT_BACKGROUND } else { INCORRECT_BACKGROUND };
                tr style=(format!("color:black;background:{background};")) {
                    td { (row.number) }
                    td style=(prompt_style) { (row.prompt) }
                    td style=(answer_style) { (row.chosen) }
                    td style=(answer_style) { (row.correct) }
                }
            }
        }
        p { "Generated " (generated_at.format("%Y-%m-%d %H:%M")) "." }
    };
    page_template(body)
}

fn page_template(body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Quiz Results" }
            }
            body {
                (body)
            }
        }
    }
}

/// Write the results page to a file.
pub fn export_results(session: &QuizSession, style: ExportStyle, path: &Path) -> Fallible<()> {
    let html = render_results_html(session, style, Local::now());
    write(path, html.into_string())?;
    log::info!("Exported results to {}.", path.display());
    Ok(())
}
