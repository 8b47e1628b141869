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

use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use rand::Rng;

use crate::collection::Collection;
use crate::config::Config;
use crate::error::Fallible;
use crate::error::fail;
use crate::export::ExportStyle;
use crate::export::export_results;
use crate::extract::FieldSelection;
use crate::extract::default_fields;
use crate::extract::models_and_fields;
use crate::filter::NoteQuery;
use crate::filter::find_notes;
use crate::quiz::QuizRequest;
use crate::quiz::finish_quiz;
use crate::quiz::start_quiz;
use crate::score::render_results_table;
use crate::score::score;
use crate::session::AnswerOutcome;
use crate::session::QuizSession;
use crate::synth::QuizParams;
use crate::text::strip_markup;
use crate::types::card_state::CardState;

/// Options for a quiz. Anything not given falls back to the stored
/// preferences.
#[derive(Args, Default)]
pub struct QuizArgs {
    /// Optional path to the collection directory.
    pub directory: Option<String>,
    /// The deck to draw notes from. Subdecks are included.
    #[arg(long)]
    pub deck: Option<String>,
    /// Only use notes of this type.
    #[arg(long)]
    pub note_type: Option<String>,
    /// The field shown as the question.
    #[arg(long)]
    pub prompt_field: Option<String>,
    /// The field holding the answer.
    #[arg(long)]
    pub answer_field: Option<String>,
    /// Number of questions.
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..=1000))]
    pub questions: Option<u16>,
    /// Number of options per question.
    #[arg(long, value_parser = clap::value_parser!(u8).range(2..=10))]
    pub choices: Option<u8>,
    /// Questions shown per page.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=20))]
    pub per_page: Option<u8>,
    /// Leave out notes with this tag. Repeatable; replaces the stored list.
    #[arg(long = "exclude-tag")]
    pub exclude_tags: Vec<String>,
    /// Keep notes with a card in this state. Repeatable; replaces the stored
    /// list.
    #[arg(long = "state", value_enum)]
    pub states: Vec<CardState>,
    /// Do not filter by card state.
    #[arg(long, conflicts_with = "states")]
    pub any_state: bool,
    /// Pad short option lists by reusing answers.
    #[arg(long, conflicts_with = "no_reuse")]
    pub reuse: bool,
    /// Never reuse answers; questions may get fewer options.
    #[arg(long)]
    pub no_reuse: bool,
    /// Leave out notes from previous quizzes.
    #[arg(long)]
    pub exclude_seen: bool,
    /// Write the results as HTML to this path.
    #[arg(long)]
    pub export: Option<PathBuf>,
    /// Open the exported results in the browser.
    #[arg(long, requires = "export")]
    pub open: bool,
}

pub fn run_quiz(args: QuizArgs) -> Fallible<()> {
    let coll = Collection::new(args.directory.clone())?;
    let (config, request, mut session) = prepare_quiz(&coll, &args, &mut rand::thread_rng())?;
    let style = ExportStyle {
        prompt_font_size: config.font_size_q,
        answer_font_size: config.font_size_a,
    };

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    loop {
        present(&mut session, config.num_per_page, &mut input, &mut output)?;
        report(&session, &mut output)?;
        finish_quiz(&session, &coll.history);

        if let Some(path) = &args.export {
            export_results(&session, style, path)?;
            writeln!(output, "Results exported to {}.", path.display())?;
            if args.open {
                if let Err(e) = open::that(path) {
                    log::warn!("Failed to open {}: {e}", path.display());
                }
            }
        }
        if !ask_retry(&mut input, &mut output)? {
            return Ok(());
        }
        session = start_quiz(&coll.db, &coll.history, &request, &mut rand::thread_rng())?;
    }
}

/// Resolve the settings and build the first session. The effective settings
/// are saved only once a quiz could be built from them.
fn prepare_quiz<R: Rng + ?Sized>(
    coll: &Collection,
    args: &QuizArgs,
    rng: &mut R,
) -> Fallible<(Config, QuizRequest, QuizSession)> {
    let mut config = coll.load_config();
    let request = resolve_request(coll, args, &mut config)?;
    let session = start_quiz(&coll.db, &coll.history, &request, rng)?;
    config.save_or_warn(&coll.config_path());
    Ok((config, request, session))
}

/// Ask whether to take another quiz with the same settings.
fn ask_retry(input: &mut impl BufRead, output: &mut impl Write) -> Fallible<bool> {
    write!(output, "Retry with the same settings? [y/N]: ")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Merge the arguments into the stored preferences and build the request.
/// `config` is updated to the effective values.
fn resolve_request(coll: &Collection, args: &QuizArgs, config: &mut Config) -> Fallible<QuizRequest> {
    if let Some(deck) = &args.deck {
        config.default_deck = deck.clone();
    }
    if config.default_deck.is_empty() {
        return fail("no deck given; pass --deck.");
    }
    if let Some(questions) = args.questions {
        config.num_questions = questions as usize;
    }
    if let Some(choices) = args.choices {
        config.num_choices = choices as usize;
    }
    if let Some(per_page) = args.per_page {
        config.num_per_page = per_page as usize;
    }
    if !args.exclude_tags.is_empty() {
        config.exclude_tags = args.exclude_tags.clone();
    }
    if args.any_state {
        config.card_states.clear();
    } else if !args.states.is_empty() {
        config.card_states = args.states.clone();
    }
    if args.reuse {
        config.allow_answer_reuse = true;
    } else if args.no_reuse {
        config.allow_answer_reuse = false;
    }

    // Offer the note types present in the deck, like the deck picker does.
    let ids = find_notes(&coll.db, &NoteQuery::new(&config.default_deck))?;
    let models = models_and_fields(&coll.db, &ids)?;
    let note_type = match &args.note_type {
        Some(name) => name.clone(),
        None if models.contains_key(&config.last_model_name) => config.last_model_name.clone(),
        None if models.len() == 1 => models.keys().next().cloned().unwrap_or_default(),
        None => {
            let available: Vec<&str> = models.keys().map(String::as_str).collect();
            return fail(format!(
                "choose a note type with --note-type (available: {}).",
                available.join(", ")
            ));
        }
    };
    let fields = models.get(&note_type).cloned().unwrap_or_default();
    let (guessed_prompt, guessed_answer) =
        default_fields(&fields, &config.last_prompt_field, &config.last_answer_field);
    let Some(prompt_field) = args.prompt_field.clone().or(guessed_prompt) else {
        return fail("choose the prompt field with --prompt-field.");
    };
    let Some(answer_field) = args.answer_field.clone().or(guessed_answer) else {
        return fail("choose the answer field with --answer-field.");
    };
    config.last_model_name = note_type.clone();
    config.last_prompt_field = prompt_field.clone();
    config.last_answer_field = answer_field.clone();

    Ok(QuizRequest {
        query: NoteQuery::new(&config.default_deck)
            .excluding_tags(&config.exclude_tags)
            .with_states(config.card_states.iter().copied()),
        fields: FieldSelection {
            note_type: Some(note_type),
            prompt_field,
            answer_field,
        },
        params: QuizParams {
            num_questions: config.num_questions,
            num_choices: config.num_choices,
            allow_reuse: config.allow_answer_reuse,
        },
        exclude_seen: args.exclude_seen,
    })
}

/// Ask every question, page by page. An empty line skips a question; end of
/// input leaves the remaining questions unanswered.
fn present(
    session: &mut QuizSession,
    per_page: usize,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Fallible<()> {
    let pages = session.pages(per_page);
    let page_count = pages.len();
    for (page_number, page) in pages.into_iter().enumerate() {
        writeln!(output, "--- Page {}/{} ---", page_number + 1, page_count)?;
        for index in page {
            let item = session.items()[index].clone();
            writeln!(output)?;
            writeln!(output, "{}. {}", index + 1, strip_markup(&item.prompt))?;
            for (n, option) in item.options.iter().enumerate() {
                writeln!(output, "  {}) {}", n + 1, strip_markup(option))?;
            }
            let choice = loop {
                write!(output, "Answer [1-{}]: ", item.options.len())?;
                output.flush()?;
                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    writeln!(output)?;
                    return Ok(());
                }
                let line = line.trim();
                if line.is_empty() {
                    break None;
                }
                match line.parse::<usize>() {
                    Ok(n) if (1..=item.options.len()).contains(&n) => break Some(n - 1),
                    _ => writeln!(output, "Please enter a number between 1 and {}.", item.options.len())?,
                }
            };
            let Some(choice) = choice else {
                continue;
            };
            match session.answer(index, &item.options[choice])? {
                AnswerOutcome::Correct => writeln!(output, "✔ Correct")?,
                AnswerOutcome::Incorrect => writeln!(
                    output,
                    "✘ Incorrect. The answer is: {}",
                    strip_markup(&item.correct_answer)
                )?,
                AnswerOutcome::AlreadyAnswered => {}
            }
        }
    }
    Ok(())
}

fn report(session: &QuizSession, output: &mut impl Write) -> Fallible<()> {
    let score = score(session);
    writeln!(output)?;
    writeln!(
        output,
        "Quiz Complete! Score: {}/{} ({}%)",
        score.correct, score.total, score.percent
    )?;
    if !session.is_complete() {
        let answered = (0..session.len())
            .filter(|i| session.user_answer(*i).is_some())
            .count();
        writeln!(output, "Unanswered: {}", session.len() - answered)?;
    }
    if session.is_empty() {
        return Ok(());
    }
    writeln!(output)?;
    write!(output, "{}", render_results_table(session))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::helper::quiz_item;
    use crate::helper::sample_collection;
    use crate::helper::sample_session;

    fn run_present(session: &mut QuizSession, per_page: usize, input: &str) -> Fallible<String> {
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut output = Vec::new();
        present(session, per_page, &mut input, &mut output)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    #[test]
    fn test_present_records_answers() -> Fallible<()> {
        let mut session = sample_session();
        // France: "Paris" is option 2. Japan: "Rome" is option 2. Italy: skip.
        let output = run_present(&mut session, 2, "2\n2\n\n")?;
        assert_eq!(session.user_answer(0), Some("Paris"));
        assert_eq!(session.user_answer(1), Some("Rome"));
        assert_eq!(session.user_answer(2), None);
        assert!(output.contains("--- Page 1/2 ---"));
        assert!(output.contains("--- Page 2/2 ---"));
        assert!(output.contains("2. Capital of Japan"));
        assert!(output.contains("  3) Rome"));
        assert!(output.contains("✔ Correct"));
        assert!(output.contains("✘ Incorrect. The answer is: Tokyo"));
        Ok(())
    }

    #[test]
    fn test_present_reprompts_on_invalid_input() -> Fallible<()> {
        let mut session = QuizSession::new(vec![quiz_item(1, "Q", "a", &["a", "b"])]);
        let output = run_present(&mut session, 5, "x\n3\n1\n")?;
        assert_eq!(output.matches("Please enter a number between 1 and 2.").count(), 2);
        assert_eq!(session.correct_count(), 1);
        Ok(())
    }

    #[test]
    fn test_present_stops_at_end_of_input() -> Fallible<()> {
        let mut session = sample_session();
        run_present(&mut session, 5, "2\n")?;
        assert_eq!(session.correct_count(), 1);
        assert!(!session.is_complete());
        Ok(())
    }

    #[test]
    fn test_report() -> Fallible<()> {
        let mut session = sample_session();
        session.answer(0, "Paris")?;
        let mut output = Vec::new();
        report(&session, &mut output)?;
        let output = String::from_utf8_lossy(&output);
        assert!(output.contains("Quiz Complete! Score: 1/3 (33%)"));
        assert!(output.contains("Unanswered: 2"));
        assert!(output.contains("1 | Capital of France | Paris"));
        Ok(())
    }

    #[test]
    fn test_ask_retry() -> Fallible<()> {
        for (answer, expected) in [("y\n", true), ("YES\n", true), ("\n", false), ("n\n", false), ("", false)] {
            let mut input = Cursor::new(answer.as_bytes().to_vec());
            let mut output = Vec::new();
            assert_eq!(ask_retry(&mut input, &mut output)?, expected);
        }
        Ok(())
    }

    #[test]
    fn test_resolve_request_uses_args_and_guesses_fields() -> Fallible<()> {
        let dir = sample_collection()?;
        let coll = Collection::new(Some(dir.path().display().to_string()))?;
        let args = QuizArgs {
            deck: Some("Geography::Europe".to_string()),
            questions: Some(5),
            choices: Some(3),
            any_state: true,
            no_reuse: true,
            exclude_tags: vec!["leech".to_string()],
            ..QuizArgs::default()
        };
        let mut config = Config::default();
        let request = resolve_request(&coll, &args, &mut config)?;
        assert_eq!(
            request.query.to_search_string(),
            r#"deck:"Geography::Europe" -tag:"leech""#
        );
        assert_eq!(request.fields.note_type.as_deref(), Some("Basic"));
        assert_eq!(request.fields.prompt_field, "Front");
        assert_eq!(request.fields.answer_field, "Back");
        assert_eq!(
            request.params,
            QuizParams {
                num_questions: 5,
                num_choices: 3,
                allow_reuse: false
            }
        );
        // The effective values are remembered.
        assert_eq!(config.default_deck, "Geography::Europe");
        assert_eq!(config.last_model_name, "Basic");
        assert_eq!(config.last_prompt_field, "Front");
        assert!(config.card_states.is_empty());
        Ok(())
    }

    #[test]
    fn test_resolve_request_needs_note_type_when_ambiguous() -> Fallible<()> {
        let dir = sample_collection()?;
        let coll = Collection::new(Some(dir.path().display().to_string()))?;
        let args = QuizArgs {
            deck: Some("Geography".to_string()),
            ..QuizArgs::default()
        };
        let mut config = Config::default();
        let message = resolve_request(&coll, &args, &mut config)
            .err()
            .map(|e| e.to_string())
            .unwrap_or_default();
        assert!(message.contains("available: Basic, Vocab"));
        Ok(())
    }

    #[test]
    fn test_resolve_request_needs_fields() -> Fallible<()> {
        let dir = sample_collection()?;
        let coll = Collection::new(Some(dir.path().display().to_string()))?;
        let args = QuizArgs {
            deck: Some("Geography".to_string()),
            note_type: Some("Vocab".to_string()),
            ..QuizArgs::default()
        };
        let mut config = Config::default();
        assert!(resolve_request(&coll, &args, &mut config).is_err());
        let args = QuizArgs {
            prompt_field: Some("Word".to_string()),
            answer_field: Some("Meaning".to_string()),
            ..args
        };
        let request = resolve_request(&coll, &args, &mut config)?;
        assert_eq!(request.fields.prompt_field, "Word");
        Ok(())
    }

    #[test]
    fn test_prepare_quiz_saves_config_after_success() -> Fallible<()> {
        let dir = sample_collection()?;
        let coll = Collection::new(Some(dir.path().display().to_string()))?;
        let mut rng = StdRng::seed_from_u64(3);

        // Nothing in History has a Vocab note type: no quiz, nothing saved.
        let args = QuizArgs {
            deck: Some("History".to_string()),
            note_type: Some("Vocab".to_string()),
            prompt_field: Some("Word".to_string()),
            answer_field: Some("Meaning".to_string()),
            any_state: true,
            ..QuizArgs::default()
        };
        assert!(prepare_quiz(&coll, &args, &mut rng).is_err());
        assert!(!coll.config_path().exists());

        let args = QuizArgs {
            deck: Some("Geography::Europe".to_string()),
            any_state: true,
            ..QuizArgs::default()
        };
        let (_, _, session) = prepare_quiz(&coll, &args, &mut rng)?;
        assert_eq!(session.len(), 2);
        let saved = coll.load_config();
        assert_eq!(saved.default_deck, "Geography::Europe");
        assert_eq!(saved.last_prompt_field, "Front");
        Ok(())
    }

    #[test]
    fn test_out_of_range_config_gives_valid_params() -> Fallible<()> {
        let dir = sample_collection()?;
        let coll = Collection::new(Some(dir.path().display().to_string()))?;
        std::fs::write(
            coll.config_path(),
            r#"{"default_deck": "Geography::Europe", "num_questions": 0, "num_choices": 200000, "card_states": []}"#,
        )?;
        let mut rng = StdRng::seed_from_u64(5);
        let (config, request, session) = prepare_quiz(&coll, &QuizArgs::default(), &mut rng)?;
        assert_eq!(request.params.num_questions, 1);
        assert_eq!(request.params.num_choices, 10);
        assert_eq!(config.font_size_q, 22);
        assert_eq!(session.len(), 1);
        assert!(session.items().iter().all(|item| item.options.len() == 10));
        Ok(())
    }

    #[test]
    fn test_resolve_request_without_deck() -> Fallible<()> {
        let dir = sample_collection()?;
        let coll = Collection::new(Some(dir.path().display().to_string()))?;
        let mut config = Config::default();
        assert!(resolve_request(&coll, &QuizArgs::default(), &mut config).is_err());
        Ok(())
    }
}
