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

//! Building multiple-choice quiz items from prompt/answer pairs.

use std::collections::HashSet;
use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::ErrorReport;
use crate::text::normalize;
use crate::types::quiz::QaPair;
use crate::types::quiz::QuizItem;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct QuizParams {
    /// Upper bound on the number of items.
    pub num_questions: usize,
    /// Options per item, the correct answer included. At least two.
    pub num_choices: usize,
    /// Whether to fill up short option lists by drawing answers again.
    pub allow_reuse: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SynthesisError {
    /// There are no prompt/answer pairs to build items from.
    EmptyPool,
    /// Fewer than two choices per item were requested.
    TooFewChoices(usize),
}

impl Display for SynthesisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthesisError::EmptyPool => write!(f, "no notes found to generate questions"),
            SynthesisError::TooFewChoices(n) => {
                write!(f, "at least 2 choices per question are required, got {n}")
            }
        }
    }
}

impl Error for SynthesisError {}

impl From<SynthesisError> for ErrorReport {
    fn from(value: SynthesisError) -> Self {
        ErrorReport::new(value.to_string())
    }
}

/// Build quiz items from a pool of pairs.
///
/// Returns `min(num_questions, pool.len())` items, drawn from the pool
/// without replacement. Distractors come from the answers of the whole
/// pool, deduplicated by normalized text and excluding the item's own
/// answer. Without reuse an item may end up with fewer than `num_choices`
/// options if the pool is short on distinct answers. With reuse, short
/// option lists are padded by drawing from all answers with replacement;
/// padding may repeat an option or the correct answer itself.
pub fn synthesize<R: Rng + ?Sized>(
    pool: &[QaPair],
    params: &QuizParams,
    rng: &mut R,
) -> Result<Vec<QuizItem>, SynthesisError> {
    if pool.is_empty() {
        return Err(SynthesisError::EmptyPool);
    }
    if params.num_choices < 2 {
        return Err(SynthesisError::TooFewChoices(params.num_choices));
    }

    let mut selected: Vec<&QaPair> = pool.iter().collect();
    selected.shuffle(rng);
    selected.truncate(params.num_questions.min(pool.len()));

    let all_answers: Vec<&str> = pool.iter().map(|pair| pair.answer.as_str()).collect();
    let distinct = distinct_answers(&all_answers);

    let items = selected
        .into_iter()
        .map(|pair| build_item(pair, &all_answers, &distinct, params, rng))
        .collect();
    Ok(items)
}

/// One representative per normalized answer, with its key, in order of
/// first occurrence.
fn distinct_answers<'a>(answers: &[&'a str]) -> Vec<(String, &'a str)> {
    let mut seen = HashSet::new();
    let mut distinct = Vec::new();
    for answer in answers {
        let key = normalize(answer);
        if seen.insert(key.clone()) {
            distinct.push((key, *answer));
        }
    }
    distinct
}

fn build_item<R: Rng + ?Sized>(
    pair: &QaPair,
    all_answers: &[&str],
    distinct: &[(String, &str)],
    params: &QuizParams,
    rng: &mut R,
) -> QuizItem {
    let correct_key = normalize(&pair.answer);
    let mut candidates: Vec<&str> = distinct
        .iter()
        .filter(|(key, _)| *key != correct_key)
        .map(|(_, answer)| *answer)
        .collect();
    candidates.shuffle(rng);
    candidates.truncate(params.num_choices - 1);

    let mut options: Vec<String> = Vec::with_capacity(params.num_choices);
    options.push(pair.answer.clone());
    options.extend(candidates.into_iter().map(str::to_string));
    if params.allow_reuse {
        while options.len() < params.num_choices {
            match all_answers.choose(rng) {
                Some(answer) => options.push(answer.to_string()),
                None => break,
            }
        }
    }
    options.truncate(params.num_choices);
    options.shuffle(rng);

    QuizItem {
        note_id: pair.note_id,
        prompt: pair.prompt.clone(),
        correct_answer: pair.answer.clone(),
        options,
    }
}
