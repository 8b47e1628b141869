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

//! The quiz pipeline: filter notes, extract pairs, build items, and write
//! history back when a session ends.

use std::time::Instant;

use rand::Rng;

use crate::error::Fallible;
use crate::error::fail;
use crate::extract::FieldSelection;
use crate::extract::extract_pairs;
use crate::filter::NoteQuery;
use crate::filter::find_notes;
use crate::history::History;
use crate::history::filter_unseen;
use crate::session::QuizSession;
use crate::source::NoteSource;
use crate::synth::QuizParams;
use crate::synth::synthesize;

/// Everything needed to start a quiz.
#[derive(Clone, Debug)]
pub struct QuizRequest {
    pub query: NoteQuery,
    pub fields: FieldSelection,
    pub params: QuizParams,
    /// Leave out notes that appeared in earlier quizzes.
    pub exclude_seen: bool,
}

pub fn start_quiz<R: Rng + ?Sized>(
    source: &impl NoteSource,
    history: &History,
    request: &QuizRequest,
    rng: &mut R,
) -> Fallible<QuizSession> {
    let start = Instant::now();
    let mut ids = find_notes(source, &request.query)?;
    if request.exclude_seen {
        let seen = history.load();
        let before = ids.len();
        ids = filter_unseen(ids, &seen);
        log::debug!("Excluded {} previously quizzed notes.", before - ids.len());
    }

    let pairs = extract_pairs(source, &ids, &request.fields)?;
    if pairs.is_empty() {
        return fail(format!(
            "No notes found with the chosen fields in this deck.\nDeck: {}\nNote type: {}\nFields: {} / {}",
            request.query.deck(),
            request.fields.note_type.as_deref().unwrap_or("(any)"),
            request.fields.prompt_field,
            request.fields.answer_field,
        ));
    }

    let items = match synthesize(&pairs, &request.params, rng) {
        Ok(items) => items,
        Err(e) => {
            return fail(format!(
                "Could not build quiz: {e}\nNotes available: {}",
                pairs.len()
            ));
        }
    };
    let duration = start.elapsed().as_millis();
    log::debug!(
        "Built {} items from {} pairs in {duration}ms.",
        items.len(),
        pairs.len()
    );
    Ok(QuizSession::new(items))
}

/// Record the session's notes in the history. Failures are logged, not
/// returned.
pub fn finish_quiz(session: &QuizSession, history: &History) {
    if let Err(e) = history.record(session.note_ids()) {
        log::warn!("Failed to update quiz history: {e}");
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::helper::create_tmp_directory;
    use crate::helper::sample_database;
    use crate::types::card_state::CardState;
    use crate::types::note_id::NoteId;

    fn request(query: NoteQuery) -> QuizRequest {
        QuizRequest {
            query,
            fields: FieldSelection {
                note_type: Some("Basic".to_string()),
                prompt_field: "Front".to_string(),
                answer_field: "Back".to_string(),
            },
            params: QuizParams {
                num_questions: 10,
                num_choices: 3,
                allow_reuse: false,
            },
            exclude_seen: false,
        }
    }

    #[test]
    fn test_start_quiz() -> Fallible<()> {
        let db = sample_database()?;
        let dir = create_tmp_directory()?;
        let history = History::new(dir.path().join("quiz_history.json"));
        let mut rng = StdRng::seed_from_u64(42);
        let session = start_quiz(&db, &history, &request(NoteQuery::new("Geography")), &mut rng)?;
        assert_eq!(session.len(), 3);
        let mut ids = session.note_ids();
        ids.sort();
        assert_eq!(ids, vec![NoteId::new(1), NoteId::new(2), NoteId::new(3)]);
        for item in session.items() {
            assert_eq!(item.options.len(), 3);
        }
        Ok(())
    }

    #[test]
    fn test_history_round_trip_through_quizzes() -> Fallible<()> {
        let db = sample_database()?;
        let dir = create_tmp_directory()?;
        let history = History::new(dir.path().join("quiz_history.json"));
        let mut rng = StdRng::seed_from_u64(1);

        let mut req = request(NoteQuery::new("Geography").with_states([CardState::New]));
        req.exclude_seen = true;
        let session = start_quiz(&db, &history, &req, &mut rng)?;
        assert_eq!(session.note_ids(), vec![NoteId::new(2)]);
        finish_quiz(&session, &history);

        // The only matching note was quizzed, so nothing is left.
        let result = start_quiz(&db, &history, &req, &mut rng);
        assert!(result.is_err());

        history.clear()?;
        assert!(start_quiz(&db, &history, &req, &mut rng).is_ok());
        Ok(())
    }

    #[test]
    fn test_no_pairs_names_the_selection() -> Fallible<()> {
        let db = sample_database()?;
        let dir = create_tmp_directory()?;
        let history = History::new(dir.path().join("quiz_history.json"));
        let mut rng = StdRng::seed_from_u64(1);
        let result = start_quiz(&db, &history, &request(NoteQuery::new("Nowhere")), &mut rng);
        let message = result.err().map(|e| e.to_string()).unwrap_or_default();
        assert!(message.contains("No notes found"));
        assert!(message.contains("Deck: Nowhere"));
        assert!(message.contains("Fields: Front / Back"));
        Ok(())
    }

    #[test]
    fn test_synthesis_error_reports_pool_size() -> Fallible<()> {
        let db = sample_database()?;
        let dir = create_tmp_directory()?;
        let history = History::new(dir.path().join("quiz_history.json"));
        let mut rng = StdRng::seed_from_u64(1);
        let mut req = request(NoteQuery::new("Geography"));
        req.params.num_choices = 1;
        let message = start_quiz(&db, &history, &req, &mut rng)
            .err()
            .map(|e| e.to_string())
            .unwrap_or_default();
        assert!(message.contains("Could not build quiz"));
        assert!(message.contains("Notes available: 3"));
        Ok(())
    }
}
