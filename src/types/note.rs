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

use crate::types::note_id::NoteId;

/// A note type: a named schema with an ordered list of fields.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NoteType {
    pub name: String,
    pub fields: Vec<String>,
}

/// A record read from the collection. Field values are raw and may carry
/// markup.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Note {
    id: NoteId,
    note_type: String,
    /// Field names and values, in the note type's field order.
    fields: Vec<(String, String)>,
}

impl Note {
    pub fn new(id: NoteId, note_type: impl Into<String>, fields: Vec<(String, String)>) -> Self {
        Self {
            id,
            note_type: note_type.into(),
            fields,
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn note_type(&self) -> &str {
        &self.note_type
    }

    /// The value of the named field, or `None` if the note's type has no
    /// such field.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}
