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
use std::ops::Range;

use crate::error::Fallible;
use crate::error::fail;
use crate::text::same_answer;
use crate::types::note_id::NoteId;
use crate::types::quiz::QuizItem;

/// The state of one quiz: its items and the answers given so far.
#[derive(Default)]
pub struct QuizSession {
    items: Vec<QuizItem>,
    /// Chosen option text, keyed by item index.
    answers: BTreeMap<usize, String>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    /// The item was answered before; the new answer was ignored.
    AlreadyAnswered,
}

impl QuizSession {
    pub fn new(items: Vec<QuizItem>) -> Self {
        Self {
            items,
            answers: BTreeMap::new(),
        }
    }

    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Record the option chosen for an item. Only the first answer to an
    /// item counts.
    pub fn answer(&mut self, index: usize, choice: &str) -> Fallible<AnswerOutcome> {
        let Some(item) = self.items.get(index) else {
            return fail(format!("no question with index {index}."));
        };
        if self.answers.contains_key(&index) {
            return Ok(AnswerOutcome::AlreadyAnswered);
        }
        let correct = same_answer(choice, &item.correct_answer);
        self.answers.insert(index, choice.to_string());
        Ok(if correct {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect
        })
    }

    pub fn user_answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn is_correct(&self, index: usize) -> bool {
        match (self.items.get(index), self.answers.get(&index)) {
            (Some(item), Some(choice)) => same_answer(choice, &item.correct_answer),
            _ => false,
        }
    }

    pub fn correct_count(&self) -> usize {
        (0..self.items.len()).filter(|i| self.is_correct(*i)).count()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.items.len()
    }

    /// Split the item indices into pages of at most `per_page` items.
    pub fn pages(&self, per_page: usize) -> Vec<Range<usize>> {
        let per_page = per_page.max(1);
        (0..self.items.len())
            .step_by(per_page)
            .map(|start| start..(start + per_page).min(self.items.len()))
            .collect()
    }

    /// The notes quizzed in this session, in item order.
    pub fn note_ids(&self) -> Vec<NoteId> {
        self.items.iter().map(|item| item.note_id).collect()
    }
}
