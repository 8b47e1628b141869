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

use crate::error::Fallible;
use crate::filter::NoteQuery;
use crate::types::note::Note;
use crate::types::note::NoteType;
use crate::types::note_id::DeckId;
use crate::types::note_id::NoteId;

/// Read access to a flashcard collection.
///
/// Lookups that can miss return `Ok(None)`; errors are reserved for the
/// store itself failing.
pub trait NoteSource {
    /// Find the notes matching a query, ordered by identifier and without
    /// duplicates. The query is applied atomically.
    fn find_note_ids(&self, query: &NoteQuery) -> Fallible<Vec<NoteId>>;

    fn get_note(&self, id: NoteId) -> Fallible<Option<Note>>;

    fn get_note_type(&self, name: &str) -> Fallible<Option<NoteType>>;

    /// All decks, ordered by name.
    fn all_deck_names(&self) -> Fallible<Vec<(DeckId, String)>>;
}
