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

use chrono::NaiveDate;
use tempfile::TempDir;
use tempfile::tempdir;

use crate::collection::Collection;
use crate::db::Database;
use crate::db::NewNote;
use crate::error::Fallible;
use crate::session::QuizSession;
use crate::types::card_state::StoredState;
use crate::types::note::NoteType;
use crate::types::note_id::NoteId;
use crate::types::quiz::QuizItem;

pub fn create_tmp_directory() -> Fallible<TempDir> {
    Ok(tempdir()?)
}

fn basic() -> NoteType {
    NoteType {
        name: "Basic".to_string(),
        fields: vec!["Front".to_string(), "Back".to_string()],
    }
}

fn vocab() -> NoteType {
    NoteType {
        name: "Vocab".to_string(),
        fields: vec![
            "Word".to_string(),
            "Meaning".to_string(),
            "Example".to_string(),
        ],
    }
}

fn note(values: &[&str], tags: &[&str], state: StoredState, due: Option<&str>) -> NewNote {
    NewNote {
        values: values.iter().map(|v| v.to_string()).collect(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        state,
        due_date: due.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
    }
}

/// Fill a database with a small fixture collection:
///
/// | id | deck              | type  | content                    | tags          | state  | due        |
/// |----|-------------------|-------|----------------------------|---------------|--------|------------|
/// | 1  | Geography::Europe | Basic | Capital of France / Paris  | europe        | review | 2026-01-01 |
/// | 2  | Geography         | Basic | Capital of Japan / Tokyo   | asia          | new    |            |
/// | 3  | Geography::Europe | Basic | Capital of Italy / <b>Rome</b> | europe, leech | learn | 2099-01-01 |
/// | 4  | Geography         | Vocab | Berg / mountain / (empty)  |               | review | 2099-01-01 |
/// | 5  | History           | Basic | Capital of Spain / Madrid  |               | new    |            |
///
/// Today is 2026-06-01.
pub fn populate(db: &mut Database) -> Fallible<()> {
    db.import(
        "Geography::Europe",
        &basic(),
        &[note(
            &["Capital of France", "Paris"],
            &["europe"],
            StoredState::Review,
            Some("2026-01-01"),
        )],
    )?;
    db.import(
        "Geography",
        &basic(),
        &[note(&["Capital of Japan", "Tokyo"], &["asia"], StoredState::New, None)],
    )?;
    db.import(
        "Geography::Europe",
        &basic(),
        &[note(
            &["Capital of Italy", "<b>Rome</b>"],
            &["europe", "leech"],
            StoredState::Learn,
            Some("2099-01-01"),
        )],
    )?;
    db.import(
        "Geography",
        &vocab(),
        &[note(
            &["Berg", "mountain", ""],
            &[],
            StoredState::Review,
            Some("2099-01-01"),
        )],
    )?;
    db.import(
        "History",
        &basic(),
        &[note(&["Capital of Spain", "Madrid"], &[], StoredState::New, None)],
    )?;
    db.set_today(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
    Ok(())
}

pub fn sample_database() -> Fallible<Database> {
    let mut db = Database::new(":memory:")?;
    populate(&mut db)?;
    Ok(db)
}

/// A collection directory holding the fixture collection.
pub fn sample_collection() -> Fallible<TempDir> {
    let dir = create_tmp_directory()?;
    let mut coll = Collection::new(Some(dir.path().display().to_string()))?;
    populate(&mut coll.db)?;
    Ok(dir)
}

pub fn quiz_item(id: i64, prompt: &str, correct: &str, options: &[&str]) -> QuizItem {
    QuizItem {
        note_id: NoteId::new(id),
        prompt: prompt.to_string(),
        correct_answer: correct.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
    }
}

/// A three-item session with no answers yet.
pub fn sample_session() -> QuizSession {
    QuizSession::new(vec![
        quiz_item(1, "Capital of France", "Paris", &["Rome", "Paris", "Tokyo"]),
        quiz_item(2, "Capital of <i>Japan</i>", "Tokyo", &["Tokyo", "Rome", "Paris"]),
        quiz_item(3, "Capital of Italy", "<b>Rome</b>", &["Paris", "Tokyo", "<b>Rome</b>"]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tmp_directory() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        assert!(dir.path().exists());
        Ok(())
    }
}
