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

use std::collections::BTreeSet;

use crate::error::Fallible;
use crate::source::NoteSource;
use crate::types::card_state::CardState;
use crate::types::note_id::NoteId;

/// Which notes to quiz on: a deck, tags to leave out, and card states to
/// keep. An empty state set keeps every state.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NoteQuery {
    deck: String,
    excluded_tags: Vec<String>,
    states: BTreeSet<CardState>,
}

impl NoteQuery {
    pub fn new(deck: impl Into<String>) -> Self {
        Self {
            deck: deck.into(),
            excluded_tags: Vec::new(),
            states: BTreeSet::new(),
        }
    }

    /// Exclude notes carrying any of these tags. Blank tags are ignored.
    pub fn excluding_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            let tag = tag.as_ref().trim();
            if !tag.is_empty() && !self.excluded_tags.iter().any(|t| t == tag) {
                self.excluded_tags.push(tag.to_string());
            }
        }
        self
    }

    pub fn with_states<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = CardState>,
    {
        self.states.extend(states);
        self
    }

    pub fn deck(&self) -> &str {
        &self.deck
    }

    pub fn excluded_tags(&self) -> &[String] {
        &self.excluded_tags
    }

    pub fn states(&self) -> &BTreeSet<CardState> {
        &self.states
    }

    /// Render the query in search syntax, e.g.
    /// `deck:"Geography" -tag:"hard" (is:"new" OR is:"due")`.
    pub fn to_search_string(&self) -> String {
        let mut parts = vec![format!("deck:{}", quote(&self.deck))];
        for tag in &self.excluded_tags {
            parts.push(format!("-tag:{}", quote(tag)));
        }
        if !self.states.is_empty() {
            let states: Vec<String> = self
                .states
                .iter()
                .map(|state| format!("is:{}", quote(state.as_str())))
                .collect();
            parts.push(format!("({})", states.join(" OR ")));
        }
        parts.join(" ")
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Find the notes matching a query.
pub fn find_notes(source: &impl NoteSource, query: &NoteQuery) -> Fallible<Vec<NoteId>> {
    log::debug!("Searching for notes: {}", query.to_search_string());
    let ids = source.find_note_ids(query)?;
    log::debug!("Found {} notes.", ids.len());
    Ok(ids)
}
