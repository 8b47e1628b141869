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

use std::fs::read_to_string;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::collection::Collection;
use crate::db::NewNote;
use crate::error::Fallible;
use crate::types::card_state::StoredState;
use crate::types::note::NoteType;

/// A TOML file describing notes to add:
///
/// ```toml
/// deck = "Geography"
/// note_type = "Basic"
/// fields = ["Front", "Back"]
///
/// [[notes]]
/// values = ["Capital of France", "Paris"]
/// tags = ["europe"]
/// state = "review"
/// due = "2026-01-01"
/// ```
#[derive(Deserialize)]
struct DeckFile {
    deck: String,
    note_type: String,
    fields: Vec<String>,
    #[serde(default)]
    notes: Vec<NoteEntry>,
}

#[derive(Deserialize)]
struct NoteEntry {
    values: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    state: StoredState,
    due: Option<String>,
}

pub fn import_notes(directory: Option<String>, file: &Path) -> Fallible<()> {
    let mut coll = Collection::new(directory)?;
    let content = read_to_string(file)?;
    let deck_file: DeckFile = toml::from_str(&content)?;
    let note_type = NoteType {
        name: deck_file.note_type,
        fields: deck_file.fields,
    };
    let notes = deck_file
        .notes
        .into_iter()
        .map(|entry| -> Fallible<NewNote> {
            let due_date = match entry.due {
                Some(due) => Some(NaiveDate::parse_from_str(&due, "%Y-%m-%d")?),
                None => None,
            };
            Ok(NewNote {
                values: entry.values,
                tags: entry.tags,
                state: entry.state,
                due_date,
            })
        })
        .collect::<Fallible<Vec<_>>>()?;
    let ids = coll.db.import(&deck_file.deck, &note_type, &notes)?;
    println!("Imported {} notes into {}.", ids.len(), deck_file.deck);
    Ok(())
}
