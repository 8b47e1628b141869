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

/// A prompt and its answer, taken from two fields of one note. Both are
/// non-empty after trimming.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QaPair {
    pub note_id: NoteId,
    pub prompt: String,
    pub answer: String,
}

impl QaPair {
    /// Build a pair from raw field values. Returns `None` if either value is
    /// blank.
    pub fn new(note_id: NoteId, prompt: &str, answer: &str) -> Option<Self> {
        let prompt = prompt.trim();
        let answer = answer.trim();
        if prompt.is_empty() || answer.is_empty() {
            return None;
        }
        Some(Self {
            note_id,
            prompt: prompt.to_string(),
            answer: answer.to_string(),
        })
    }
}

/// One multiple-choice question.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QuizItem {
    pub note_id: NoteId,
    /// The prompt, verbatim.
    pub prompt: String,
    /// The correct answer, verbatim.
    pub correct_answer: String,
    /// The options in presentation order. Contains the correct answer.
    pub options: Vec<String>,
}
