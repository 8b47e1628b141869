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

use std::collections::BTreeMap;

use crate::error::Fallible;
use crate::source::NoteSource;
use crate::types::note_id::NoteId;
use crate::types::quiz::QaPair;

const PROMPT_GUESSES: [&str; 3] = ["Front", "Question", "Prompt"];
const ANSWER_GUESSES: [&str; 3] = ["Back", "Answer", "Response"];

/// Which two fields of which note type to quiz on.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FieldSelection {
    /// If set, notes of any other type are skipped.
    pub note_type: Option<String>,
    pub prompt_field: String,
    pub answer_field: String,
}

/// Turn notes into prompt/answer pairs, in the order of `ids`.
///
/// Notes that no longer exist, have the wrong type, lack either field, or
/// have a blank prompt or answer are skipped.
pub fn extract_pairs(
    source: &impl NoteSource,
    ids: &[NoteId],
    selection: &FieldSelection,
) -> Fallible<Vec<QaPair>> {
    let mut pairs = Vec::with_capacity(ids.len());
    let mut skipped = 0;
    for id in ids {
        let Some(note) = source.get_note(*id)? else {
            skipped += 1;
            continue;
        };
        if let Some(required) = &selection.note_type {
            if note.note_type() != required.as_str() {
                skipped += 1;
                continue;
            }
        }
        let (Some(prompt), Some(answer)) = (
            note.field(&selection.prompt_field),
            note.field(&selection.answer_field),
        ) else {
            skipped += 1;
            continue;
        };
        match QaPair::new(note.id(), prompt, answer) {
            Some(pair) => pairs.push(pair),
            None => skipped += 1,
        }
    }
    log::debug!("Extracted {} pairs, skipped {skipped} notes.", pairs.len());
    Ok(pairs)
}

/// Map each note type used by the given notes to its ordered field names.
pub fn models_and_fields(
    source: &impl NoteSource,
    ids: &[NoteId],
) -> Fallible<BTreeMap<String, Vec<String>>> {
    let mut models = BTreeMap::new();
    for id in ids {
        let Some(note) = source.get_note(*id)? else {
            continue;
        };
        if models.contains_key(note.note_type()) {
            continue;
        }
        let fields = match source.get_note_type(note.note_type())? {
            Some(note_type) => note_type.fields,
            None => note.field_names().map(str::to_string).collect(),
        };
        models.insert(note.note_type().to_string(), fields);
    }
    Ok(models)
}

/// Pick the prompt and answer fields for a note type: the remembered
/// choice if the type still has it, otherwise a conventional name.
pub fn default_fields(
    fields: &[String],
    last_prompt: &str,
    last_answer: &str,
) -> (Option<String>, Option<String>) {
    (
        pick_field(fields, last_prompt, &PROMPT_GUESSES),
        pick_field(fields, last_answer, &ANSWER_GUESSES),
    )
}

fn pick_field(fields: &[String], remembered: &str, guesses: &[&str]) -> Option<String> {
    if fields.iter().any(|f| f == remembered) {
        return Some(remembered.to_string());
    }
    guesses
        .iter()
        .find(|guess| fields.iter().any(|f| f.as_str() == **guess))
        .map(|guess| guess.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::sample_database;

    fn ids(raw: &[i64]) -> Vec<NoteId> {
        raw.iter().map(|id| NoteId::new(*id)).collect()
    }

    fn basic_selection() -> FieldSelection {
        FieldSelection {
            note_type: Some("Basic".to_string()),
            prompt_field: "Front".to_string(),
            answer_field: "Back".to_string(),
        }
    }

    #[test]
    fn test_extract_follows_input_order() -> Fallible<()> {
        let db = sample_database()?;
        let pairs = extract_pairs(&db, &ids(&[3, 1, 2]), &basic_selection())?;
        let answers: Vec<&str> = pairs.iter().map(|p| p.answer.as_str()).collect();
        assert_eq!(answers, vec!["<b>Rome</b>", "Paris", "Tokyo"]);
        assert_eq!(pairs[0].note_id, NoteId::new(3));
        assert_eq!(pairs[0].prompt, "Capital of Italy");
        Ok(())
    }

    #[test]
    fn test_extract_skips_other_note_types() -> Fallible<()> {
        let db = sample_database()?;
        let pairs = extract_pairs(&db, &ids(&[1, 2, 3, 4]), &basic_selection())?;
        assert_eq!(pairs.len(), 3);
        Ok(())
    }

    #[test]
    fn test_extract_skips_missing_fields_and_notes() -> Fallible<()> {
        let db = sample_database()?;
        let selection = FieldSelection {
            note_type: None,
            prompt_field: "Front".to_string(),
            answer_field: "Back".to_string(),
        };
        // Note 4 is a Vocab note without these fields; note 99 does not exist.
        let pairs = extract_pairs(&db, &ids(&[4, 99, 2]), &selection)?;
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].answer, "Tokyo");
        Ok(())
    }

    #[test]
    fn test_extract_skips_blank_values() -> Fallible<()> {
        let db = sample_database()?;
        let selection = FieldSelection {
            note_type: Some("Vocab".to_string()),
            prompt_field: "Word".to_string(),
            answer_field: "Example".to_string(),
        };
        assert!(extract_pairs(&db, &ids(&[4]), &selection)?.is_empty());
        let selection = FieldSelection {
            answer_field: "Meaning".to_string(),
            ..selection
        };
        assert_eq!(extract_pairs(&db, &ids(&[4]), &selection)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_models_and_fields() -> Fallible<()> {
        let db = sample_database()?;
        let models = models_and_fields(&db, &ids(&[1, 2, 3, 4, 99]))?;
        assert_eq!(models.len(), 2);
        assert_eq!(models["Basic"], vec!["Front", "Back"]);
        assert_eq!(models["Vocab"], vec!["Word", "Meaning", "Example"]);
        Ok(())
    }

    #[test]
    fn test_default_fields_prefers_remembered() {
        let fields = vec!["Front".to_string(), "Back".to_string(), "Extra".to_string()];
        assert_eq!(
            default_fields(&fields, "Extra", "Front"),
            (Some("Extra".to_string()), Some("Front".to_string()))
        );
    }

    #[test]
    fn test_default_fields_guesses() {
        let fields = vec!["Question".to_string(), "Response".to_string()];
        assert_eq!(
            default_fields(&fields, "Front", ""),
            (Some("Question".to_string()), Some("Response".to_string()))
        );
        let fields = vec!["Word".to_string(), "Meaning".to_string()];
        assert_eq!(default_fields(&fields, "", ""), (None, None));
    }
}
