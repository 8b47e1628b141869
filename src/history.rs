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

use std::collections::HashSet;
use std::fs::read_to_string;
use std::fs::remove_file;
use std::fs::write;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::Fallible;
use crate::types::note_id::NoteId;

/// The notes that have appeared in past quizzes, stored as a JSON array of
/// note identifiers.
pub struct History {
    path: PathBuf,
}

impl History {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Read the set of quizzed notes. A missing or unreadable file is an
    /// empty history.
    pub fn load(&self) -> HashSet<NoteId> {
        let content = match read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return HashSet::new(),
            Err(e) => {
                log::warn!("Failed to read quiz history: {e}");
                return HashSet::new();
            }
        };
        match serde_json::from_str::<Vec<NoteId>>(&content) {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                log::warn!("Ignoring corrupt quiz history: {e}");
                HashSet::new()
            }
        }
    }

    /// Add notes to the history.
    pub fn record(&self, ids: impl IntoIterator<Item = NoteId>) -> Fallible<()> {
        let mut history = self.load();
        history.extend(ids);
        let mut ids: Vec<NoteId> = history.into_iter().collect();
        ids.sort();
        write(&self.path, serde_json::to_string(&ids)?)?;
        log::debug!("Quiz history now holds {} notes.", ids.len());
        Ok(())
    }

    /// Forget every quizzed note. Clearing an absent history is a no-op.
    pub fn clear(&self) -> Fallible<()> {
        match remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Drop the notes that already appeared in a quiz, keeping the order of the
/// rest.
pub fn filter_unseen(ids: Vec<NoteId>, history: &HashSet<NoteId>) -> Vec<NoteId> {
    ids.into_iter().filter(|id| !history.contains(id)).collect()
}
